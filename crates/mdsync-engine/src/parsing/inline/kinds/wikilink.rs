/// Wiki-style links `[[target|display]]` and embeds `![[target]]`.
pub struct WikiLink;

/// A parsed wiki link; ranges are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiMatch {
    pub target: String,
    pub display: Option<String>,
    /// Range of the text between the brackets.
    pub inner: (usize, usize),
    /// End of the closing `]]`.
    pub end: usize,
}

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const ALIAS: u8 = b'|';
    pub const EMBED: u8 = b'!';

    /// Parses a wiki link whose `[[` starts at `at`. The link may not span lines.
    pub fn parse(s: &str, at: usize, end: usize) -> Option<WikiMatch> {
        let b = s.as_bytes();
        if !b[at..end].starts_with(Self::OPEN) {
            return None;
        }
        let inner_start = at + Self::OPEN.len();
        let rel = s[inner_start..end].find("]]")?;
        let inner_end = inner_start + rel;
        let inner = &s[inner_start..inner_end];
        if inner.trim().is_empty() || inner.contains(['[', '\n']) {
            return None;
        }
        let (target, display) = match inner.split_once(Self::ALIAS as char) {
            Some((t, d)) => (t.trim().to_string(), Some(d.trim().to_string())),
            None => (inner.trim().to_string(), None),
        };
        Some(WikiMatch {
            target,
            display,
            inner: (inner_start, inner_end),
            end: inner_end + Self::CLOSE.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_and_aliased() {
        let s = "[[Page]] and [[Other|shown]]";
        let m = WikiLink::parse(s, 0, s.len()).unwrap();
        assert_eq!(m.target, "Page");
        assert_eq!(m.display, None);
        assert_eq!(m.end, 8);

        let m = WikiLink::parse(s, 13, s.len()).unwrap();
        assert_eq!(m.target, "Other");
        assert_eq!(m.display.as_deref(), Some("shown"));
    }

    #[test]
    fn rejects_empty_and_multiline() {
        assert_eq!(WikiLink::parse("[[]]", 0, 4), None);
        assert_eq!(WikiLink::parse("[[a\nb]]", 0, 7), None);
        assert_eq!(WikiLink::parse("[[open", 0, 6), None);
    }
}
