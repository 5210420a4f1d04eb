use std::sync::LazyLock;

use regex::Regex;

static AUTOLINK_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*)>").expect("autolink regex")
});
static AUTOLINK_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*)>")
        .expect("email regex")
});
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<[A-Za-z][A-Za-z0-9\-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:\-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*\s*/?>"#,
    )
    .expect("open tag regex")
});
static CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</[A-Za-z][A-Za-z0-9\-]*\s*>").expect("close tag regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--(?s:.*?)-->").expect("comment regex"));

/// Autolinks and raw inline HTML, both introduced by `<`.
pub struct AngleSyntax;

impl AngleSyntax {
    pub const OPEN: u8 = b'<';

    /// `<scheme:...>` or `<user@host>`; returns the destination and the match length.
    pub fn autolink(s: &str) -> Option<(String, usize)> {
        let caps = AUTOLINK_URI
            .captures(s)
            .or_else(|| AUTOLINK_EMAIL.captures(s))?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(0)?.end()))
    }

    /// Length of a raw HTML tag or comment at the start of `s`.
    pub fn raw_html(s: &str) -> Option<usize> {
        [&*OPEN_TAG, &*CLOSE_TAG, &*COMMENT]
            .iter()
            .find_map(|re| re.find(s))
            .map(|m| m.end())
    }
}
