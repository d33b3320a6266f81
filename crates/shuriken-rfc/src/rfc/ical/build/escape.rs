//! Text and parameter value escaping (RFC 5545 §3.3.11, §3.2).

/// Escapes a TEXT value for use as a property value.
///
/// Escapes backslash, comma, semicolon, and newline per RFC 5545 §3.3.11.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a parameter value, quoting it if it contains characters that
/// require DQUOTE per RFC 5545 §3.2, and caret-encoding embedded quotes and
/// newlines per RFC 6868.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    let needs_quoting = s.contains([':', ';', ',']);
    let needs_caret = s.contains(['"', '\n', '^']);

    if !needs_quoting && !needs_caret {
        return s.to_string();
    }

    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '^' => escaped.push_str("^^"),
            '\n' => escaped.push_str("^n"),
            '"' => escaped.push_str("^'"),
            _ => escaped.push(c),
        }
    }

    if needs_quoting || needs_caret {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_basic() {
        assert_eq!(escape_text("hello, world"), "hello\\, world");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn escape_param_value_quotes_on_colon() {
        assert_eq!(escape_param_value("https://example.com"), "\"https://example.com\"");
        assert_eq!(escape_param_value("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(escape_param_value("plain"), "plain");
    }
}
