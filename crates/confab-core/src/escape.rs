//! Entity escaping for untrusted text.

/// Escapes text for direct insertion into a markup tree.
///
/// Every character that could open an element, attribute, or entity context
/// is replaced with its entity form, so the result renders as literal text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_tags_are_neutralized() {
        assert_eq!(
            escape("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_quotes_and_ampersands() {
        assert_eq!(escape(r#"a & b "c" 'd'"#), "a &amp; b &quot;c&quot; &#39;d&#39;");
    }

    #[test]
    fn test_already_escaped_input_is_escaped_again() {
        // Double-escaping is the safe direction for untrusted input.
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_unicode_is_preserved() {
        assert_eq!(escape("こんにちは 📈"), "こんにちは 📈");
    }
}
