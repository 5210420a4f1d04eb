use crate::model::FenceKind;

/// What a fence opener line looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Number of fence characters.
    pub len: usize,
    /// Columns of indentation before the fence (0..=3).
    pub indent: usize,
    /// Trimmed info string after the fence.
    pub info: String,
}

/// Fenced code block type with owned delimiter constants.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Recognises a fence opener: up to 3 spaces, then 3+ backticks or tildes.
    pub fn sig(line: &str) -> Option<FenceSig> {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let rest = &line[indent..];
        let ch = *rest.as_bytes().first()?;
        let kind = match ch {
            Self::BACKTICK => FenceKind::Backticks,
            Self::TILDE => FenceKind::Tildes,
            _ => return None,
        };
        let len = rest.bytes().take_while(|b| *b == ch).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = rest[len..].trim();
        // A backtick info string may not contain backticks (it would be a code span).
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        Some(FenceSig {
            kind,
            len,
            indent,
            info: info.to_string(),
        })
    }

    /// A closer uses the opener's character, at least as many of them, and nothing else.
    pub fn closes(open: &FenceSig, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let ch = open.kind.char() as u8;
        let rest = &line[indent..];
        let len = rest.bytes().take_while(|b| *b == ch).count();
        len >= open.len && rest[len..].trim().is_empty()
    }
}
