//! Small HTML helpers for article bodies: tag stripping and entity decoding.

use std::sync::OnceLock;

use regex::Regex;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex must compile"))
}

/// Converts article HTML into plain searchable text.
///
/// Drops `<script>`/`<style>` blocks and comments, turns block-level tags into
/// line breaks, strips remaining tags, decodes entities and collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    static NEWLINES: OnceLock<Regex> = OnceLock::new();

    let text = regex(&SCRIPT, r"(?is)<script[^>]*>.*?</script>").replace_all(html, "");
    let text = regex(&STYLE, r"(?is)<style[^>]*>.*?</style>").replace_all(&text, "");
    let text = regex(&COMMENT, r"(?s)<!--.*?-->").replace_all(&text, "");
    let text = regex(
        &BLOCK,
        r"(?i)</?(div|p|br|h[1-6]|li|tr|blockquote|section|article|figure|figcaption)[^>]*>",
    )
    .replace_all(&text, "\n");
    let text = strip_tags(&text);
    let text = decode_entities(&text);
    let text = regex(&SPACES, r"[ \t\u{00a0}]+").replace_all(&text, " ");
    let text = regex(&NEWLINES, r"\s*\n\s*").replace_all(&text, "\n");
    text.trim().to_string()
}

/// Removes every tag, keeping inner text as-is.
pub fn strip_tags(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    regex(&TAG, r"<[^>]+>").replace_all(html, "").into_owned()
}

pub fn decode_entities(text: &str) -> String {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    static HEX: OnceLock<Regex> = OnceLock::new();

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'");

    let text = regex(&NUMERIC, r"&#(\d+);").replace_all(&text, |caps: &regex::Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_default()
    });
    let text = regex(&HEX, r"&#[xX]([0-9a-fA-F]+);").replace_all(&text, |caps: &regex::Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_default()
    });

    // &amp; last so "&amp;lt;" decodes to "&lt;" rather than "<"
    text.replace("&amp;", "&")
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncates to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_markup() {
        let html = "<h2 id=\"a\">見出し</h2><p>本文&nbsp;です &amp; more</p><script>alert(1)</script>";
        assert_eq!(html_to_text(html), "見出し\n本文 です & more");
    }

    #[test]
    fn test_decode_entities_handles_numeric_forms() {
        assert_eq!(decode_entities("&#12354;&#x3044;"), "あい");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("東京タワー", 2), "東京");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }
}
