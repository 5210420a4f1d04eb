use crate::model::Mark;

/// Emphasis-like delimiter characters and their pairing rules.
pub struct Delimiter;

impl Delimiter {
    pub const CHARS: [u8; 5] = [b'*', b'_', b'~', b'=', b'^'];

    pub fn is_delimiter(b: u8) -> bool {
        Self::CHARS.contains(&b)
    }

    /// Whether a run of `len` can stand as a delimiter at all (a lone `=` is text).
    pub fn valid_run(ch: u8, len: usize) -> bool {
        !(ch == b'=' && len < 2)
    }

    /// Opening/closing ability of a run given the characters around it.
    ///
    /// A run is left-flanking if not followed by whitespace and right-flanking
    /// if not preceded by whitespace; `_` additionally may not sit inside a word.
    pub fn flanking(ch: u8, before: Option<char>, after: Option<char>) -> (bool, bool) {
        let ws = |c: Option<char>| c.is_none_or(char::is_whitespace);
        let left = !ws(after);
        let right = !ws(before);
        if ch == b'_' {
            let alnum = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
            (left && !alnum(before), right && !alnum(after))
        } else {
            (left, right)
        }
    }

    /// How many characters an opener/closer pair with these remaining
    /// lengths consumes, and the resulting mark. `None` if they cannot pair.
    pub fn pair(ch: u8, open: usize, close: usize) -> Option<(usize, Mark)> {
        let both2 = open >= 2 && close >= 2;
        match ch {
            b'*' | b'_' if both2 => Some((2, Mark::Bold)),
            b'*' | b'_' => Some((1, Mark::Italic)),
            b'~' if both2 => Some((2, Mark::Strike)),
            b'~' => Some((1, Mark::Subscript)),
            b'=' if both2 => Some((2, Mark::Highlight)),
            b'^' => Some((1, Mark::Superscript)),
            _ => None,
        }
    }
}
