//! Content line folding at 75 octets (RFC 5545 §3.1).

/// Folds a single content line (without its trailing CRLF) at 75 octets,
/// inserting `CRLF SPACE` before each continuation. Folding never splits a
/// UTF-8 multi-byte sequence.
#[must_use]
pub fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;

    if line.len() <= LIMIT {
        return line.to_string();
    }

    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut start = 0;
    let mut first = true;

    while start < bytes.len() {
        let budget = if first { LIMIT } else { LIMIT - 1 };
        let mut end = (start + budget).min(bytes.len());

        // Don't split a UTF-8 continuation byte.
        while end < bytes.len() && (bytes[end] & 0b1100_0000) == 0b1000_0000 {
            end -= 1;
        }

        if !first {
            out.push_str("\r\n ");
        }
        out.push_str(&line[start..end]);

        start = end;
        first = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_short_line_unchanged() {
        assert_eq!(fold_line("SUMMARY:Short"), "SUMMARY:Short");
    }

    #[test]
    fn fold_long_line_wraps() {
        let line = format!("SUMMARY:{}", "x".repeat(100));
        let folded = fold_line(&line);
        assert!(folded.contains("\r\n "));
        for segment in folded.split("\r\n ") {
            assert!(segment.len() <= 75);
        }
    }
}
