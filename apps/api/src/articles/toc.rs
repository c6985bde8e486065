//! Table of contents generation from article HTML.
//!
//! `<h2>` and `<h3>` headings become TOC entries. Each heading needs an `id`
//! so the site can link to it; headings without one get `heading-{n}` (n is
//! the 1-based position among all h2/h3 headings) written back into the HTML.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::html::{decode_entities, escape_attr, strip_tags};
use crate::models::article::TocEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct TocResult {
    /// The input HTML with an id on every h2/h3.
    pub html: String,
    pub entries: Vec<TocEntry>,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<h([23])(\s[^>]*)?>(.*?)</h[23]\s*>").expect("heading regex")
    })
}

fn id_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("id regex")
    })
}

/// An `id` attribute found in a heading's attribute text.
struct IdAttr {
    /// Byte range of the attribute (with its leading whitespace) within the attrs.
    span: Range<usize>,
    value: String,
}

fn id_attr(attrs: &str) -> Option<IdAttr> {
    let caps = id_attr_re().captures(attrs)?;
    let whole = caps.get(0)?;
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(IdAttr {
        span: whole.range(),
        value,
    })
}

fn existing_id(attrs: &str) -> Option<String> {
    id_attr(attrs)
        .map(|attr| attr.value)
        .filter(|id| !id.is_empty())
}

pub fn build_toc(html: &str) -> TocResult {
    let re = heading_re();

    let taken: HashSet<String> = re
        .captures_iter(html)
        .filter_map(|c| c.get(2).and_then(|a| existing_id(a.as_str())))
        .collect();
    let mut assigned: HashSet<String> = HashSet::new();

    let mut out = String::with_capacity(html.len() + 64);
    let mut entries = Vec::new();
    let mut last_end = 0;

    for (index, caps) in re.captures_iter(html).enumerate() {
        let whole = caps.get(0).expect("capture 0 always present");
        let level: u8 = if &caps[1] == "2" { 2 } else { 3 };
        let attrs_m = caps.get(2);
        let attrs = attrs_m.map(|m| m.as_str()).unwrap_or("");
        let inner_m = caps.get(3).expect("heading body group always participates");
        let inner = inner_m.as_str();

        out.push_str(&html[last_end..whole.start()]);
        last_end = whole.end();

        let attr = id_attr(attrs);
        if let Some(id) = attr.as_ref().map(|a| a.value.clone()).filter(|v| !v.is_empty()) {
            out.push_str(whole.as_str());
            entries.push(TocEntry {
                id,
                text: heading_text(inner),
                level,
            });
            continue;
        }

        let base = format!("heading-{}", index + 1);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) || assigned.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        assigned.insert(candidate.clone());

        // Only the opening tag changes; body and closing tag are copied as-is.
        // A blank id attribute is dropped so the heading ends up with exactly one.
        let mut opening = html[whole.start()..inner_m.start()]
            .trim_end_matches('>')
            .to_string();
        if let (Some(attr), Some(attrs_m)) = (attr, attrs_m) {
            let offset = attrs_m.start() - whole.start();
            opening.replace_range(offset + attr.span.start..offset + attr.span.end, "");
        }
        out.push_str(&opening);
        out.push_str(&format!(" id=\"{}\">", escape_attr(&candidate)));
        out.push_str(&html[inner_m.start()..whole.end()]);

        entries.push(TocEntry {
            id: candidate,
            text: heading_text(inner),
            level,
        });
    }
    out.push_str(&html[last_end..]);

    // Headings with no visible text are kept in the HTML but not listed.
    entries.retain(|e| !e.text.is_empty());

    TocResult { html: out, entries }
}

fn heading_text(inner: &str) -> String {
    decode_entities(&strip_tags(inner))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigns_ids_in_document_order() {
        let html = "<p>intro</p><h2>First</h2><p>a</p><h3>Sub &amp; more</h3><h2>Second</h2>";
        let toc = build_toc(html);

        assert_eq!(
            toc.html,
            "<p>intro</p><h2 id=\"heading-1\">First</h2><p>a</p>\
             <h3 id=\"heading-2\">Sub &amp; more</h3><h2 id=\"heading-3\">Second</h2>"
        );
        let ids: Vec<_> = toc.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["heading-1", "heading-2", "heading-3"]);
        assert_eq!(toc.entries[1].text, "Sub & more");
        assert_eq!(toc.entries[1].level, 3);
    }

    #[test]
    fn test_keeps_existing_ids_and_attributes() {
        let html = r#"<h2 class="lead" id="intro">Intro</h2><h2 class='x'>Next</h2>"#;
        let toc = build_toc(html);

        assert_eq!(toc.entries[0].id, "intro");
        assert_eq!(toc.entries[1].id, "heading-2");
        assert!(toc
            .html
            .contains(r#"<h2 class='x' id="heading-2">Next</h2>"#));
        assert!(toc.html.starts_with(r#"<h2 class="lead" id="intro">Intro</h2>"#));
    }

    #[test]
    fn test_generated_id_avoids_collision_with_authored_id() {
        let html = r#"<h2>A</h2><h2 id="heading-1">B</h2>"#;
        let toc = build_toc(html);
        assert_eq!(toc.entries[0].id, "heading-1-2");
        assert_eq!(toc.entries[1].id, "heading-1");
    }

    #[test]
    fn test_strips_inline_markup_and_ignores_other_levels() {
        let html = "<h1>Title</h1><h2><strong>東京</strong>  の\n夜</h2><h4>deep</h4>";
        let toc = build_toc(html);
        assert_eq!(toc.entries.len(), 1);
        assert_eq!(toc.entries[0].text, "東京 の 夜");
        assert!(toc.html.contains("<h1>Title</h1>"));
        assert!(toc.html.contains("<h4>deep</h4>"));
    }

    #[test]
    fn test_empty_heading_not_listed() {
        let toc = build_toc("<h2></h2><h2>Real</h2>");
        assert_eq!(toc.entries.len(), 1);
        assert_eq!(toc.entries[0].id, "heading-2");
    }

    #[test]
    fn test_no_headings_leaves_html_untouched() {
        let html = "<p>plain</p>";
        let toc = build_toc(html);
        assert_eq!(toc.html, html);
        assert!(toc.entries.is_empty());
    }

    #[test]
    fn test_unquoted_id_is_kept() {
        let html = "<h2 id=intro>Intro</h2>";
        let toc = build_toc(html);
        assert_eq!(toc.html, html);
        assert_eq!(toc.entries[0].id, "intro");
    }

    #[test]
    fn test_blank_id_is_replaced_not_duplicated() {
        let toc = build_toc(r#"<h2 id="">Intro</h2>"#);
        assert_eq!(toc.html, r#"<h2 id="heading-1">Intro</h2>"#);
        assert_eq!(toc.html.matches("id=").count(), 1);
        assert_eq!(toc.entries[0].id, "heading-1");

        let toc = build_toc(r#"<h3 class="a" id='' data-x="y">Sub</h3>"#);
        assert_eq!(toc.html, r#"<h3 class="a" data-x="y" id="heading-1">Sub</h3>"#);
    }
}
