/// Inline math `$...$`.
pub struct InlineMath;

impl InlineMath {
    pub const DOLLAR: u8 = b'$';

    /// Finds the closing `$` for an opener at `at`. Returns its byte index.
    ///
    /// Content must be non-empty with no whitespace just inside either
    /// delimiter, and the closer may not be followed by a digit, so prices
    /// like `$5 and $6` stay text.
    pub fn find_close(s: &str, at: usize, end: usize) -> Option<usize> {
        let b = &s.as_bytes()[..end];
        if b.get(at + 1).is_none_or(|c| *c == Self::DOLLAR || c.is_ascii_whitespace()) {
            return None;
        }
        let mut i = at + 1;
        while i < b.len() {
            match b[i] {
                b'\\' => i += 1,
                Self::DOLLAR => {
                    let inner_ok = !b[i - 1].is_ascii_whitespace();
                    let next_ok = b.get(i + 1).is_none_or(|c| !c.is_ascii_digit());
                    return (inner_ok && next_ok).then_some(i);
                }
                _ => {}
            }
            i += 1;
        }
        None
    }
}
