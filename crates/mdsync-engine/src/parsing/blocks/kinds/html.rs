use std::sync::LazyLock;

use regex::Regex;

static DETAILS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*<details(\s+open(=\S*)?)?\s*>").expect("details regex")
});
static DETAILS_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*</details\s*>\s*$").expect("details close regex"));
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*<summary>(.*?)</summary>\s*$").expect("summary regex")
});
static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}</?([A-Za-z][A-Za-z0-9-]*)[\s/>]|^\s{0,3}</?([A-Za-z][A-Za-z0-9-]*)$").expect("tag regex"));

/// Tag names that open an HTML block (which then runs to the next blank line).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "iframe", "li", "main", "nav", "ol", "p", "pre", "script", "section", "style",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "video",
];

/// Raw HTML blocks and the `<details>` collapsible block.
pub struct HtmlSyntax;

/// How an HTML block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlEnd {
    /// A line containing `-->`.
    Comment,
    /// A blank line.
    Blank,
}

impl HtmlSyntax {
    pub const COMMENT_OPEN: &'static str = "<!--";
    pub const COMMENT_CLOSE: &'static str = "-->";

    /// Recognises the start of an HTML block.
    pub fn block_start(line: &str) -> Option<HtmlEnd> {
        if line.trim_start().starts_with(Self::COMMENT_OPEN) {
            return Some(HtmlEnd::Comment);
        }
        let caps = BLOCK_TAG.captures(line)?;
        let name = caps.get(1).or_else(|| caps.get(2))?.as_str().to_ascii_lowercase();
        BLOCK_TAGS.contains(&name.as_str()).then_some(HtmlEnd::Blank)
    }

    /// `<details>` / `<details open>`: returns the open state and the byte offset after the tag.
    pub fn details_open(line: &str) -> Option<(bool, usize)> {
        let caps = DETAILS_OPEN.captures(line)?;
        let whole = caps.get(0)?;
        Some((caps.get(1).is_some(), whole.end()))
    }

    pub fn is_details_close(line: &str) -> bool {
        DETAILS_CLOSE.is_match(line)
    }

    /// Text of a `<summary>...</summary>` line.
    pub fn summary(line: &str) -> Option<String> {
        SUMMARY
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}
