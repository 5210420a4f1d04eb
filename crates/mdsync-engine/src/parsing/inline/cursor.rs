/// A cursor for byte-by-byte inline scanning.
///
/// Operates over a string slice that ends where the scanned range ends, so
/// `eof` doubles as "end of this range" when scanning link text recursively.
/// Positions are byte offsets into the slice.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned (already cut at the range end).
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Creates a cursor positioned at `i`.
    pub fn starting_at(s: &'a str, i: usize) -> Self {
        Self { s, i: i.min(s.len()) }
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current position.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i.min(self.s.len())..].starts_with(pat)
    }

    /// Length of the run of `b` starting at the current position.
    pub fn run_of(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .iter()
            .take_while(|c| **c == b)
            .count()
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes, never past the end.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Moves to `i`, never past the end.
    pub fn jump_to(&mut self, i: usize) {
        self.i = i.min(self.s.len());
    }
}
