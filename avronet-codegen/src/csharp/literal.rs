//! C# literal and documentation text formatting.

/// Formats `s` as a regular C# string literal, quotes included.
#[must_use]
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Formats bytes as a C# `byte[]` creation expression.
#[must_use]
pub fn byte_array_literal(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "new byte[0]".to_string();
    }
    let items: Vec<String> = bytes.iter().map(|b| format!("0x{:02X}", b)).collect();
    format!("new byte[] {{ {} }}", items.join(", "))
}

/// Decodes an Avro JSON byte string, where each code point is one byte.
///
/// Returns `None` if a code point exceeds `U+00FF`.
#[must_use]
pub fn avro_bytes(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

/// Escapes text for an XML documentation comment.
#[must_use]
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders a `<summary>` documentation block, one `///` line per doc line.
///
/// Blank documentation produces no lines.
#[must_use]
pub fn summary_lines(doc: Option<&str>) -> Vec<String> {
    let Some(doc) = doc.filter(|d| !d.trim().is_empty()) else {
        return Vec::new();
    };
    let mut lines = vec!["/// <summary>".to_string()];
    for line in doc.lines() {
        let line = xml_escape(line.trim_end());
        if line.is_empty() {
            lines.push("///".to_string());
        } else {
            lines.push(format!("/// {}", line));
        }
    }
    lines.push("/// </summary>".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("plain"), "\"plain\"");
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("c:\\tmp"), "\"c:\\\\tmp\"");
        assert_eq!(string_literal("x\ny\tz"), "\"x\\ny\\tz\"");
        assert_eq!(string_literal("\u{1}"), "\"\\u0001\"");
        assert_eq!(string_literal("\u{2028}"), "\"\\u2028\"");
        assert_eq!(string_literal("\u{85}\u{1}"), "\"\\u0085\\u0001\"");
        assert_eq!(string_literal("é"), "\"é\"");
    }

    #[test]
    fn test_json_literal() {
        let json = r#"{"type":"record","name":"A","doc":"x\ny"}"#;
        assert_eq!(
            string_literal(json),
            r#""{\"type\":\"record\",\"name\":\"A\",\"doc\":\"x\\ny\"}""#
        );
    }

    #[test]
    fn test_byte_array_literal() {
        assert_eq!(byte_array_literal(&[]), "new byte[0]");
        assert_eq!(byte_array_literal(&[1, 255]), "new byte[] { 0x01, 0xFF }");
    }

    #[test]
    fn test_avro_bytes() {
        assert_eq!(avro_bytes("\u{0}\u{ff}A"), Some(vec![0, 255, 65]));
        assert_eq!(avro_bytes("\u{100}"), None);
    }

    #[test]
    fn test_summary_lines() {
        assert!(summary_lines(None).is_empty());
        assert!(summary_lines(Some("  ")).is_empty());
        assert_eq!(
            summary_lines(Some("First <b>\n\nA & B")),
            vec![
                "/// <summary>",
                "/// First &lt;b&gt;",
                "///",
                "/// A &amp; B",
                "/// </summary>",
            ]
        );
    }
}
