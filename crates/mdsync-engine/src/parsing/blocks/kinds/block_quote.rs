use crate::model::AlertKind;

/// Blockquote block type with owned delimiter constant.
///
/// All blockquote-related syntax knowledge lives here, not scattered in
/// classifier code. Alerts are blockquotes whose first line is `[!KIND]`.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles various forms: `> text`, `>> nested`, `> > spaced nested`.
    ///
    /// # Returns
    /// - `depth`: Number of `>` prefixes found (0 if not a blockquote)
    /// - `byte_offset`: Index into `s` where content begins after prefixes
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            while i < b.len() && b[i] == b' ' {
                i += 1;
            }
            if i < b.len() && b[i] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i += 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        if depth == 0 { (0, 0) } else { (depth, i) }
    }

    /// Strips exactly one `>` level. Returns the byte offset of the content.
    pub fn strip_one(s: &str) -> Option<usize> {
        let indent = s.len() - s.trim_start_matches(' ').len();
        if indent > 3 || s.as_bytes().get(indent) != Some(&(Self::PREFIX as u8)) {
            return None;
        }
        let mut i = indent + 1;
        if s.as_bytes().get(i) == Some(&b' ') {
            i += 1;
        }
        Some(i)
    }

    /// Recognises an alert marker line such as `[!NOTE]`.
    pub fn alert_kind(first_line: &str) -> Option<AlertKind> {
        let t = first_line.trim();
        let inner = t.strip_prefix("[!")?.strip_suffix(']')?;
        AlertKind::parse(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip_prefixes("hello"), (0, 0));
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(BlockQuote::strip_prefixes("> hello"), (1, 2));
    }

    #[test]
    fn strip_double_quote() {
        assert_eq!(BlockQuote::strip_prefixes("> > hello"), (2, 4));
    }

    #[test]
    fn strip_nested_quote_no_space() {
        assert_eq!(BlockQuote::strip_prefixes(">> hello"), (2, 3));
    }

    #[test]
    fn strip_one_level_only() {
        assert_eq!(BlockQuote::strip_one(">> hello"), Some(1));
        assert_eq!(BlockQuote::strip_one("  > x"), Some(4));
        assert_eq!(BlockQuote::strip_one("x > y"), None);
    }

    #[test]
    fn alert_markers() {
        assert_eq!(BlockQuote::alert_kind("[!NOTE]"), Some(AlertKind::Note));
        assert_eq!(BlockQuote::alert_kind("[!warning] "), Some(AlertKind::Warning));
        assert_eq!(BlockQuote::alert_kind("[!BOGUS]"), None);
        assert_eq!(BlockQuote::alert_kind("[!NOTE] text"), None);
    }
}
