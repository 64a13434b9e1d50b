//! Response grid projection.
//!
//! DESIGN
//! ======
//! A grid has three fixed columns (student id, student name, submission
//! time) followed by one column per schema field in schema order. Each
//! response becomes exactly one row; a row whose `answer_data` does not parse
//! simply has empty answer cells. Display, CSV export and the print document
//! all read the same cell strings.

use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::answer::AnswerMap;
use crate::html;
use crate::records::ResponseRow;
use crate::schema::FormSchema;

/// Offset used for submission timestamps unless configured otherwise.
pub const DEFAULT_UTC_OFFSET: UtcOffset = offset!(+9);

/// Shown when a form has no responses yet.
pub const EMPTY_GRID_MESSAGE: &str = "제출된 응답이 없습니다.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    StudentId,
    StudentName,
    SubmittedAt,
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub label: String,
}

impl Column {
    fn fixed(key: ColumnKey, label: &str) -> Self {
        Self { key, label: label.to_owned() }
    }
}

/// One response, projected onto the grid's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub response_id: String,
    pub student_id: String,
    pub answers: AnswerMap,
    /// Display strings, one per column.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseGrid {
    pub columns: Vec<Column>,
    pub rows: Vec<GridRow>,
}

impl ResponseGrid {
    /// Project `responses` onto the columns derived from `schema`.
    #[must_use]
    pub fn build(schema: Option<&FormSchema>, responses: &[ResponseRow], utc_offset: UtcOffset) -> Self {
        let mut columns = vec![
            Column::fixed(ColumnKey::StudentId, "학번"),
            Column::fixed(ColumnKey::StudentName, "이름"),
            Column::fixed(ColumnKey::SubmittedAt, "제출일시"),
        ];
        if let Some(schema) = schema {
            columns.extend(
                schema.fields.iter().map(|f| Column { key: ColumnKey::Field(f.id.clone()), label: f.label.clone() }),
            );
        }

        let rows = responses
            .iter()
            .map(|response| {
                let answers = response.answers();
                let cells = columns
                    .iter()
                    .map(|column| match &column.key {
                        ColumnKey::StudentId => response.student_id.clone(),
                        ColumnKey::StudentName => response.student_name.clone(),
                        ColumnKey::SubmittedAt => format_submitted_at(&response.submitted_at, utc_offset),
                        ColumnKey::Field(id) => answers.get(id).map(crate::Answer::display).unwrap_or_default(),
                    })
                    .collect();
                GridRow { response_id: response.response_id.clone(), student_id: response.student_id.clone(), answers, cells }
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row(&self, response_id: &str) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.response_id == response_id)
    }

    /// RFC 4180 CSV with a header row of column labels.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.label.as_str()).collect();
        push_csv_record(&mut out, &header);
        for row in &self.rows {
            let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
            push_csv_record(&mut out, &cells);
        }
        out
    }

    /// Standalone HTML document for printing or saving as PDF.
    #[must_use]
    pub fn to_print_html(&self, title: &str) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html::escape(title)));
        out.push_str(
            "<style>body{font-family:sans-serif;margin:24px}table{border-collapse:collapse;width:100%}\
             th,td{border:1px solid #999;padding:6px 8px;font-size:12px;text-align:left}th{background:#f3f4f6}</style>\n",
        );
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!("<h1>{} 응답 데이터</h1>\n", html::escape(title)));
        out.push_str("<table>\n<thead><tr>");
        for column in &self.columns {
            out.push_str(&format!("<th>{}</th>", html::escape(&column.label)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        if self.rows.is_empty() {
            out.push_str(&format!("<tr><td colspan=\"{}\">{EMPTY_GRID_MESSAGE}</td></tr>\n", self.columns.len()));
        }
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in &row.cells {
                out.push_str(&format!("<td>{}</td>", html::escape(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
        out
    }
}

fn push_csv_record(out: &mut String, fields: &[&str]) {
    let encoded: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&encoded.join(","));
    out.push_str("\r\n");
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Format a stored timestamp the way a Korean locale shows date-times, e.g.
/// `2026. 3. 5. 오후 2:07:09`.
///
/// RFC 3339 values are shifted to `utc_offset`; `YYYY-MM-DD HH:MM:SS` values
/// are taken as already local. Anything else is returned verbatim.
#[must_use]
pub fn format_submitted_at(raw: &str, utc_offset: UtcOffset) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let local = OffsetDateTime::parse(trimmed, &Rfc3339).map(|dt| dt.to_offset(utc_offset)).or_else(|_| {
        PrimitiveDateTime::parse(trimmed, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .map(|dt| dt.assume_offset(utc_offset))
    });
    match local {
        Ok(dt) => {
            let (meridiem, hour) = match dt.hour() {
                0 => ("오전", 12),
                h @ 1..=11 => ("오전", h),
                12 => ("오후", 12),
                h => ("오후", h - 12),
            };
            format!(
                "{}. {}. {}. {meridiem} {hour}:{:02}:{:02}",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.minute(),
                dt.second()
            )
        }
        Err(_) => raw.to_owned(),
    }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;
