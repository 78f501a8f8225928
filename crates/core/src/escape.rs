//! HTML escaping for values interpolated into email markup.

/// Escape the HTML-significant characters `&`, `<`, `>`, `"`, `'`.
///
/// Applied to each submission field before it is interpolated into the
/// HTML email body. Newline handling is the template's concern; this
/// function passes them through untouched.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
