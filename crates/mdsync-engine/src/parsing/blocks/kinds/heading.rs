/// ATX heading block type with owned delimiter constant.
pub struct Heading;

/// A recognised heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine {
    pub level: u8,
    /// Byte range of the heading text within the line.
    pub content: (usize, usize),
}

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Recognises `#`×1–6 followed by a space (or end of line).
    ///
    /// An optional closing `#` sequence preceded by a space is not content.
    pub fn parse(line: &str) -> Option<HeadingLine> {
        let b = line.as_bytes();
        let indent = b.iter().take_while(|c| **c == b' ').count();
        if indent > 3 {
            return None;
        }
        let hashes = b[indent..].iter().take_while(|c| **c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL {
            return None;
        }
        let after = indent + hashes;
        match b.get(after) {
            None => {
                return Some(HeadingLine {
                    level: hashes as u8,
                    content: (after, after),
                });
            }
            Some(b' ' | b'\t') => {}
            Some(_) => return None,
        }

        let rest = &line[after..];
        let start = after + (rest.len() - rest.trim_start().len());
        let mut end = after + rest.trim_end().len();
        end = end.max(start);

        // Closing sequence: trailing #'s preceded by whitespace (or the whole content).
        let body = &line[start..end];
        let without = body.trim_end_matches('#');
        if without.len() < body.len() && (without.is_empty() || without.ends_with([' ', '\t'])) {
            end = start + without.trim_end().len();
        }

        Some(HeadingLine {
            level: hashes as u8,
            content: (start, end),
        })
    }
}
