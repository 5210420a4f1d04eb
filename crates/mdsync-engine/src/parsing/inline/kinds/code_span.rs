/// Code span inline type with owned delimiter constant.
///
/// Code spans are "raw zones": no other inline parsing occurs inside them.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Finds a closing run of exactly `n` backticks at or after `from`.
    ///
    /// Returns the byte index where the closing run starts.
    pub fn find_close(s: &str, from: usize, n: usize) -> Option<usize> {
        let b = s.as_bytes();
        let mut i = from;
        while i < b.len() {
            if b[i] == Self::TICK {
                let run = b[i..].iter().take_while(|c| **c == Self::TICK).count();
                if run == n {
                    return Some(i);
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }

    /// Content normalisation: line endings become spaces and one surrounding
    /// space is stripped when both ends have one (and the content is not all spaces).
    pub fn normalize(raw: &str) -> String {
        let s = raw.replace('\n', " ");
        let b = s.as_bytes();
        if b.len() >= 2 && b[0] == b' ' && b[b.len() - 1] == b' ' && !s.trim().is_empty() {
            s[1..s.len() - 1].to_string()
        } else {
            s
        }
    }
}
