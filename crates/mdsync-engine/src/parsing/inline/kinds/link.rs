//! Standard links `[text](href "title")` and images `![alt](src)`.

use super::code_span::CodeSpan;

/// Link/image syntax.
pub struct LinkSyntax;

/// Destination and title following a closing `]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTail {
    pub href: String,
    pub title: Option<String>,
    /// Byte offset just after the closing `)`.
    pub end: usize,
}

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const IMAGE: u8 = b'!';

    /// Finds the `]` matching the `[` at `open`, skipping escapes, nested
    /// brackets and code spans. Stops at `end`.
    pub fn matching_close(s: &str, open: usize, end: usize) -> Option<usize> {
        let b = s.as_bytes();
        let mut depth = 0usize;
        let mut i = open;
        while i < end {
            match b[i] {
                b'\\' => i += 1,
                CodeSpan::TICK => {
                    let run = b[i..end].iter().take_while(|c| **c == CodeSpan::TICK).count();
                    match CodeSpan::find_close(&s[..end], i + run, run) {
                        Some(close) => i = close + run - 1,
                        None => i += run - 1,
                    }
                }
                Self::OPEN => depth += 1,
                Self::CLOSE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Parses `(dest "title")` starting at the `(` at `at`.
    pub fn tail(s: &str, at: usize, end: usize) -> Option<LinkTail> {
        let b = &s.as_bytes()[..end];
        if b.get(at) != Some(&b'(') {
            return None;
        }
        let mut i = skip_ws(b, at + 1);

        let href = if b.get(i) == Some(&b'<') {
            let close = i + 1 + b[i + 1..].iter().position(|c| *c == b'>' || *c == b'\n')?;
            if b[close] != b'>' {
                return None;
            }
            let href = unescape(&s[i + 1..close]);
            i = close + 1;
            href
        } else {
            let start = i;
            let mut parens = 0usize;
            while i < b.len() {
                match b[i] {
                    b'\\' if i + 1 < b.len() => i += 1,
                    b'(' => parens += 1,
                    b')' if parens == 0 => break,
                    b')' => parens -= 1,
                    c if c.is_ascii_whitespace() => break,
                    _ => {}
                }
                i += 1;
            }
            unescape(&s[start..i])
        };

        let after_href = i;
        i = skip_ws(b, i);
        let mut title = None;
        if i > after_href
            && let Some(&q) = b.get(i)
            && matches!(q, b'"' | b'\'' | b'(')
        {
            let closer = if q == b'(' { b')' } else { q };
            let mut j = i + 1;
            while j < b.len() && b[j] != closer {
                if b[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            if j >= b.len() {
                return None;
            }
            title = Some(unescape(&s[i + 1..j]));
            i = skip_ws(b, j + 1);
        }

        (b.get(i) == Some(&b')')).then(|| LinkTail {
            href,
            title,
            end: i + 1,
        })
    }
}

fn skip_ws(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Removes backslash escapes in front of ASCII punctuation.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&n) = chars.peek()
            && n.is_ascii_punctuation()
        {
            out.push(n);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_brackets_match() {
        let s = "[a [b] c](u)";
        assert_eq!(LinkSyntax::matching_close(s, 0, s.len()), Some(8));
    }

    #[test]
    fn brackets_in_code_are_ignored() {
        let s = "[a `]` b](u)";
        assert_eq!(LinkSyntax::matching_close(s, 0, s.len()), Some(8));
    }

    #[test]
    fn unmatched_bracket() {
        assert_eq!(LinkSyntax::matching_close("[abc", 0, 4), None);
    }

    #[test]
    fn tail_with_title() {
        let s = r#"(http://x.y "The title")"#;
        let t = LinkSyntax::tail(s, 0, s.len()).unwrap();
        assert_eq!(t.href, "http://x.y");
        assert_eq!(t.title.as_deref(), Some("The title"));
        assert_eq!(t.end, s.len());
    }

    #[test]
    fn tail_angle_destination_with_spaces() {
        let s = "(<a b.md>)";
        let t = LinkSyntax::tail(s, 0, s.len()).unwrap();
        assert_eq!(t.href, "a b.md");
    }

    #[test]
    fn tail_balanced_parens() {
        let s = "(https://en.wikipedia.org/wiki/Rust_(language))";
        let t = LinkSyntax::tail(s, 0, s.len()).unwrap();
        assert_eq!(t.href, "https://en.wikipedia.org/wiki/Rust_(language)");
    }

    #[test]
    fn tail_requires_close_paren() {
        assert_eq!(LinkSyntax::tail("(abc", 0, 4), None);
        assert_eq!(LinkSyntax::tail("abc)", 0, 4), None);
    }

    #[test]
    fn unescape_punctuation_only() {
        assert_eq!(unescape(r"a\_b\c"), r"a_b\c");
    }
}
