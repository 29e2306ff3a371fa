// SPDX-License-Identifier: PMPL-1.0-or-later
//! Regex-based tag and attribute scanning shared by the rules.
//!
//! Inputs are markup fragments, not necessarily well-formed documents, so
//! nothing here builds a tree. Spans are byte ranges into the scanned text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range as Span;
use std::path::Path;
use std::sync::LazyLock;

/// Attribute text of a tag: quoted values and `{...}` expressions (one level
/// of nested braces) may contain `>`
pub(crate) const TAG_BODY: &str = r#"(?:"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\}|[^"'>{])*"#;

static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)<([a-z][a-z0-9:.-]*)({})>", TAG_BODY)).expect("valid regex")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)<(/?)([a-z][a-z0-9:.-]*)({})>", TAG_BODY)).expect("valid regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([^\s"'<>/={}]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{((?:[^{}]|\{[^{}]*\})*)\}|([^\s"'=<>`{}]+)))?"#,
    )
    .expect("valid regex")
});

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Elements that never have content or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
];

/// Markup dialect of the text under analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// New attributes go right before a tag's closing `>`, after any `/`
    #[default]
    Html,
    /// JSX and TSX: new attributes go before the `/>` of a self-closing tag
    Jsx,
}

impl Syntax {
    /// Dialect implied by a file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jsx" | "tsx") => Syntax::Jsx,
            _ => Syntax::Html,
        }
    }
}

/// An opening (or self-closing) tag
#[derive(Debug, Clone)]
pub struct Tag<'a> {
    pub name: &'a str,
    /// Span of the whole `<...>` token
    pub span: Span<usize>,
    attrs: &'a str,
    attrs_offset: usize,
}

/// One attribute inside a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Unquoted value; for `{...}` the expression source
    pub value: Option<&'a str>,
    /// From the first character of the name to the end of the value
    pub span: Span<usize>,
    /// Value without quotes or braces; empty for `attr=""`
    pub value_span: Option<Span<usize>>,
    /// Value is a JSX expression, known only at runtime
    pub dynamic: bool,
}

impl<'a> Tag<'a> {
    /// Case-insensitive tag name comparison
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn is_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.is(n))
    }

    pub fn attributes(&self) -> Vec<Attribute<'a>> {
        ATTRIBUTE
            .captures_iter(self.attrs)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                let expression = caps.get(4);
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or(expression)
                    .or_else(|| caps.get(5));
                Some(Attribute {
                    name: name.as_str(),
                    value: value.map(|v| v.as_str()),
                    span: self.attrs_offset + whole.start()..self.attrs_offset + whole.end(),
                    value_span: value.map(|v| self.attrs_offset + v.start()..self.attrs_offset + v.end()),
                    dynamic: expression.is_some(),
                })
            })
            .collect()
    }

    /// First attribute called `name` (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<Attribute<'a>> {
        self.attributes().into_iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Value of `name`, or `""` for a bare attribute
    pub fn attr_value(&self, name: &str) -> Option<&'a str> {
        self.attr(name).map(|a| a.value.unwrap_or(""))
    }

    /// Raw attribute text between the tag name and `>`
    pub fn attrs_text(&self) -> &'a str {
        self.attrs
    }

    /// Offset of the closing `>`
    pub fn insertion_point(&self) -> usize {
        self.span.end - 1
    }

    /// Where a new attribute is inserted. HTML keeps the `/` of a
    /// self-closing tag in front of it (`<img/ alt="">`, which HTML parsers
    /// accept); JSX puts it ahead of the `/>`.
    pub fn insertion_point_for(&self, syntax: Syntax) -> usize {
        match (syntax, self.attrs.trim_end().strip_suffix('/')) {
            (Syntax::Jsx, Some(before)) => self.attrs_offset + before.trim_end().len(),
            _ => self.insertion_point(),
        }
    }

    pub fn is_self_closing(&self) -> bool {
        self.attrs.trim_end().ends_with('/')
    }

    pub fn is_void(&self) -> bool {
        self.is_any(VOID_ELEMENTS) || self.is_self_closing()
    }
}

/// Every opening tag in document order
pub fn start_tags(text: &str) -> impl Iterator<Item = Tag<'_>> {
    START_TAG.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(1)?;
        let attrs = caps.get(2)?;
        Some(Tag {
            name: name.as_str(),
            span: whole.range(),
            attrs: attrs.as_str(),
            attrs_offset: attrs.start(),
        })
    })
}

/// Opening tags called `name` in document order
pub fn tags_named<'a>(text: &'a str, name: &'a str) -> impl Iterator<Item = Tag<'a>> {
    start_tags(text).filter(move |t| t.is(name))
}

/// An element: its opening tag plus the extent of its content
#[derive(Debug, Clone)]
pub struct Element<'a> {
    pub tag: Tag<'a>,
    /// Content between the opening and closing tags (empty for void elements)
    pub content: Span<usize>,
    /// Span of the closing tag, when one was found
    pub closing: Option<Span<usize>>,
}

impl<'a> Element<'a> {
    /// Span from the opening `<` to the end of the closing tag (or opening tag)
    pub fn span(&self) -> Span<usize> {
        let end = self.closing.as_ref().map_or(self.tag.span.end, |c| c.end);
        self.tag.span.start..end
    }
}

/// Opening tags paired with their closing tags, built in one pass.
///
/// A closing tag pairs with the nearest unpaired opening tag of the same
/// name before it; opening tags left on a stack at the end are unclosed.
#[derive(Debug, Default)]
pub struct ElementIndex {
    /// Start of an opening tag to the span of its closing tag
    closings: HashMap<usize, Span<usize>>,
}

impl ElementIndex {
    pub fn new(text: &str) -> Self {
        let mut open: HashMap<String, Vec<usize>> = HashMap::new();
        let mut closings = HashMap::new();

        for caps in ANY_TAG.captures_iter(text) {
            let (Some(whole), Some(slash), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            let name = name.as_str().to_ascii_lowercase();
            if slash.as_str().is_empty() {
                if !caps.get(3).is_some_and(|a| a.as_str().trim_end().ends_with('/')) {
                    open.entry(name).or_default().push(whole.start());
                }
            } else if let Some(start) = open.get_mut(&name).and_then(Vec::pop) {
                closings.insert(start, whole.range());
            }
        }

        Self { closings }
    }

    /// Resolve the extent of the element opened by `tag`
    pub fn element<'a>(&self, tag: Tag<'a>) -> Element<'a> {
        if tag.is_void() {
            let at = tag.span.end;
            return Element { tag, content: at..at, closing: None };
        }
        let closing = self.closings.get(&tag.span.start).cloned();
        let content_end = closing.as_ref().map_or(tag.span.end, |c| c.start);
        Element { content: tag.span.end..content_end, closing, tag }
    }
}

/// Text a reader would see, with tags removed and whitespace collapsed
pub fn visible_text(fragment: &str) -> String {
    let stripped = START_TAG.replace_all(fragment, " ");
    let stripped = MARKUP.replace_all(&stripped, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `fragment` contains an image that provides a name
pub fn has_named_image(fragment: &str) -> bool {
    tags_named(fragment, "img").any(|img| {
        ["alt", "aria-label"]
            .iter()
            .any(|attr| img.attr_value(attr).is_some_and(|v| !v.trim().is_empty()))
    })
}

/// Whether the tag carries an attribute that gives an accessible name
pub fn has_name_attribute(tag: &Tag<'_>) -> bool {
    ["aria-label", "aria-labelledby", "title"].iter().any(|a| tag.has_attr(a))
}

/// Whether the element introduced by `tag` can receive keyboard focus
pub fn is_focusable(tag: &Tag<'_>) -> bool {
    if let Some(tabindex) = tag.attr_value("tabindex") {
        if let Ok(value) = tabindex.trim().parse::<i64>() {
            return value >= 0;
        }
    }
    if tag.has_attr("disabled") {
        return false;
    }
    if tag.is_any(&["a", "area"]) {
        return tag.has_attr("href");
    }
    if tag.is("input") {
        return !tag.attr_value("type").is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"));
    }
    if tag.is_any(&["button", "select", "textarea", "iframe", "summary"]) {
        return true;
    }
    tag.attr_value("contenteditable")
        .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"))
}

/// Values of every `<label for="...">` in the text
pub fn label_targets(text: &str) -> HashSet<&str> {
    tags_named(text, "label")
        .filter_map(|label| label.attr_value("for"))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Spans covered by `<label>...</label>` elements, merged into sorted,
/// disjoint ranges
pub fn label_spans(text: &str, elements: &ElementIndex) -> Vec<Span<usize>> {
    let mut merged: Vec<Span<usize>> = Vec::new();
    for span in tags_named(text, "label").map(|tag| elements.element(tag).span()) {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Whether `span` lies strictly inside one of the sorted, disjoint `spans`
pub fn is_within(spans: &[Span<usize>], span: &Span<usize>) -> bool {
    let i = spans.partition_point(|s| s.start < span.start);
    i > 0 && span.end <= spans[i - 1].end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_tags_skip_closing_and_comments() {
        let html = r#"<!DOCTYPE html><!-- note --><div class="a"><img src="x.png"/></div>"#;
        let names: Vec<_> = start_tags(html).map(|t| t.name).collect();
        assert_eq!(names, vec!["div", "img"]);
    }

    #[test]
    fn test_attributes_quoting_styles() {
        let html = r#"<input type="text" name='email' required size=20>"#;
        let tag = start_tags(html).next().expect("one tag");
        let attrs = tag.attributes();
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs[0].value, Some("text"));
        assert_eq!(attrs[1].value, Some("email"));
        assert_eq!(attrs[2].name, "required");
        assert_eq!(attrs[2].value, None);
        assert_eq!(attrs[3].value, Some("20"));
        assert_eq!(&html[attrs[1].span.clone()], "name='email'");
        assert_eq!(&html[attrs[1].value_span.clone().expect("value")], "email");
    }

    #[test]
    fn test_attr_lookup_is_case_insensitive() {
        let html = r#"<IMG SRC="a.png" ALT="">"#;
        let tag = start_tags(html).next().expect("one tag");
        assert!(tag.is("img"));
        assert_eq!(tag.attr_value("alt"), Some(""));
        assert_eq!(tag.attr_value("src"), Some("a.png"));
    }

    #[test]
    fn test_data_attributes_are_not_confused() {
        let html = r#"<div data-id="x">"#;
        let tag = start_tags(html).next().expect("one tag");
        assert!(tag.attr("id").is_none());
        assert!(tag.attr("data-id").is_some());
    }

    #[test]
    fn test_insertion_point() {
        let html = r#"<img src="hero.jpg"/>"#;
        let tag = start_tags(html).next().expect("one tag");
        assert_eq!(tag.insertion_point(), 20);
        assert!(tag.is_self_closing());
    }

    #[test]
    fn test_gt_inside_quoted_value_does_not_end_tag() {
        let html = r#"<img src="chart.png" data-note="a > b"><p>x</p>"#;
        let tag = start_tags(html).next().expect("one tag");
        assert_eq!(&html[tag.span.clone()], r#"<img src="chart.png" data-note="a > b">"#);
        assert_eq!(tag.attr_value("data-note"), Some("a > b"));
    }

    #[test]
    fn test_jsx_expression_attributes() {
        let html = r#"<input onChange={(e) => setName(e.target.value)} id="name" tabIndex={2} />"#;
        let tag = start_tags(html).next().expect("one tag");
        assert_eq!(tag.span, 0..html.len());
        assert!(tag.is_self_closing());

        let handler = tag.attr("onchange").expect("handler");
        assert!(handler.dynamic);
        assert_eq!(handler.value, Some("(e) => setName(e.target.value)"));
        assert_eq!(tag.attr_value("id"), Some("name"));
        assert_eq!(tag.attr_value("tabindex"), Some("2"));
    }

    #[test]
    fn test_nested_braces_in_expression() {
        let html = r#"<button onClick={() => { if (a > b) go(); }}>Go</button>"#;
        let tag = start_tags(html).next().expect("one tag");
        assert_eq!(&html[tag.span.clone()], r#"<button onClick={() => { if (a > b) go(); }}>"#);
        assert_eq!(visible_text(html), "Go");
    }

    #[test]
    fn test_insertion_point_by_syntax() {
        let html = r#"<img src={logo} />"#;
        let tag = start_tags(html).next().expect("one tag");
        assert_eq!(tag.insertion_point_for(Syntax::Html), html.len() - 1);
        assert_eq!(tag.insertion_point_for(Syntax::Jsx), html.find(" />").expect("slash"));

        let plain = r#"<img src="a.png">"#;
        let tag = start_tags(plain).next().expect("one tag");
        assert_eq!(tag.insertion_point_for(Syntax::Jsx), plain.len() - 1);
    }

    #[test]
    fn test_syntax_from_path() {
        assert_eq!(Syntax::from_path(Path::new("src/App.tsx")), Syntax::Jsx);
        assert_eq!(Syntax::from_path(Path::new("Nav.JSX")), Syntax::Jsx);
        assert_eq!(Syntax::from_path(Path::new("index.html")), Syntax::Html);
        assert_eq!(Syntax::from_path(Path::new("Card.vue")), Syntax::Html);
    }

    #[test]
    fn test_element_nesting() {
        let html = "<div><div>inner</div>tail</div>after";
        let tag = start_tags(html).next().expect("one tag");
        let el = ElementIndex::new(html).element(tag);
        assert_eq!(&html[el.content.clone()], "<div>inner</div>tail");
        assert_eq!(&html[el.span()], "<div><div>inner</div>tail</div>");
    }

    #[test]
    fn test_unclosed_element() {
        let html = "<button>Save";
        let tag = start_tags(html).next().expect("one tag");
        let el = ElementIndex::new(html).element(tag);
        assert!(el.closing.is_none());
        assert_eq!(el.span(), 0..8);
    }

    #[test]
    fn test_index_pairs_like_nesting() {
        let html = "<b>one<b>two</b>";
        let index = ElementIndex::new(html);
        let mut tags = start_tags(html);
        let outer = index.element(tags.next().expect("outer"));
        let inner = index.element(tags.next().expect("inner"));
        assert!(outer.closing.is_none());
        assert_eq!(&html[inner.span()], "<b>two</b>");
    }

    #[test]
    fn test_visible_text() {
        assert_eq!(visible_text("  <svg><path/></svg>  "), "");
        assert_eq!(visible_text("<span>Save</span>\n  <b>now</b>"), "Save now");
    }

    #[test]
    fn test_focusable() {
        let tags = r#"<a href="/"><a name="x"><input type="hidden"><input><div tabindex="0"><button tabindex="-1"><span contenteditable>"#;
        let focusable: Vec<bool> = start_tags(tags).map(|t| is_focusable(&t)).collect();
        assert_eq!(focusable, vec![true, false, false, true, true, false, true]);
    }

    #[test]
    fn test_labels() {
        let html = r#"<label for="email">Email</label><label>Name <input></label>"#;
        assert!(label_targets(html).contains("email"));
        let spans = label_spans(html, &ElementIndex::new(html));
        assert_eq!(spans.len(), 2);
        assert_eq!(&html[spans[1].clone()], "<label>Name <input></label>");

        let input = html.find("<input>").expect("input");
        assert!(is_within(&spans, &(input..input + 7)));
        assert!(!is_within(&spans, &(0..5)));
    }

    #[test]
    fn test_nested_labels_merge() {
        let html = "<label>a<label>b</label>c</label><label>d</label>";
        let spans = label_spans(html, &ElementIndex::new(html));
        assert_eq!(spans, vec![0..33, 33..49]);
    }
}
