//! Printable student roster.

use crate::html;
use crate::records::{ClassInfo, Student};

pub const ROSTER_HEADERS: [&str; 7] = ["번호", "이름", "학번", "인증코드", "학생 번호", "부모님 번호", "비고"];

/// `"{grade}학년 {class}반 학생 명렬표"`.
#[must_use]
pub fn roster_title(info: &ClassInfo) -> String {
    format!("{}학년 {}반 학생 명렬표", info.grade, info.class_num)
}

/// Standalone HTML roster for printing or saving as PDF. Every value is
/// escaped; the last column is left blank for handwritten notes.
#[must_use]
pub fn roster_html(students: &[Student], info: &ClassInfo) -> String {
    let title = html::escape(&roster_title(info));
    let header: String = ROSTER_HEADERS.iter().map(|h| format!("<th>{h}</th>")).collect();
    let rows: String = students
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let cells = [&s.name, &s.student_id, &s.auth_code, &s.phone_student, &s.phone_parent]
                .iter()
                .map(|v| format!("<td>{}</td>", html::escape(v)))
                .collect::<String>();
            format!("<tr><td>{}</td>{cells}<td></td></tr>\n", i + 1)
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif;padding:20px;font-size:12px}}h1{{font-size:18px}}\
         .header-right{{text-align:right;font-size:11px}}table{{width:100%;border-collapse:collapse}}\
         th,td{{border:1px solid #d1d5db;padding:8px 10px;text-align:left}}th{{background:#2563eb;color:#fff}}</style>\n\
         </head>\n<body>\n<h1>{title}</h1>\n\
         <div class=\"header-right\">담임교사: {teacher} (서명 또는 인)</div>\n\
         <table>\n<thead><tr>{header}</tr></thead>\n<tbody>\n{rows}</tbody>\n</table>\n</body>\n</html>\n",
        teacher = html::escape(&info.teacher_name),
    )
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
