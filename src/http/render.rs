//! HTML page served by the frontend.

use crate::greeting::Greeting;

/// Render the index page for `greeting`. Missing fields render empty.
pub fn render_index(greeting: &Greeting) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Hello cluster</title>
</head>
<body>
  <h1 id="message">{message}</h1>
  <p>Served by <span id="source">{source}</span></p>
</body>
</html>
"#,
        message = escape_html(greeting.message()),
        source = escape_html(greeting.source()),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
