//! Minimal HTML text helpers for notice bodies and print documents.

/// Escape text for use in element content or a quoted attribute.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape plain text and turn line breaks into `<br>`.
#[must_use]
pub fn text_to_html(text: &str) -> String {
    escape(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// Heuristic for "this body was authored as markup": some `<tag`, `</tag`
/// or `<!` opener followed later by a `>`.
#[must_use]
pub fn looks_like_html(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        *b == b'<'
            && bytes.get(i + 1).is_some_and(|next| next.is_ascii_alphabetic() || *next == b'/' || *next == b'!')
            && bytes[i + 1..].contains(&b'>')
    })
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
