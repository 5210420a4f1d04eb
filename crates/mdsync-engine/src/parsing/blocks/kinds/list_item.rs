/// A list item marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// `-`, `*`, `+` for bullets, `.` or `)` for ordered items.
    pub marker: char,
    /// Number of an ordered item.
    pub number: Option<u64>,
    /// Spaces before the marker.
    pub indent: usize,
    /// Byte offset where the item content starts.
    pub content: usize,
}

impl ListMarker {
    pub fn ordered(&self) -> bool {
        self.number.is_some()
    }

    /// Two markers belong to the same list when they have the same type and character.
    pub fn same_list(&self, other: &ListMarker) -> bool {
        self.ordered() == other.ordered() && self.marker == other.marker
    }
}

/// List item syntax: bullets, ordered numbers and task checkboxes.
pub struct ListItemSyntax;

impl ListItemSyntax {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const ORDERED_DELIMS: [u8; 2] = [b'.', b')'];
    pub const MAX_DIGITS: usize = 9;

    /// Recognises `indent + marker + space`. A marker at end of line opens an empty item.
    pub fn marker(line: &str) -> Option<ListMarker> {
        let b = line.as_bytes();
        let indent = b.iter().take_while(|c| **c == b' ').count();
        let first = *b.get(indent)?;

        let (marker, number, after) = if Self::BULLETS.contains(&first) {
            (first as char, None, indent + 1)
        } else if first.is_ascii_digit() {
            let digits = b[indent..].iter().take_while(|c| c.is_ascii_digit()).count();
            if digits > Self::MAX_DIGITS {
                return None;
            }
            let delim = *b.get(indent + digits)?;
            if !Self::ORDERED_DELIMS.contains(&delim) {
                return None;
            }
            let number = line[indent..indent + digits].parse().ok()?;
            (delim as char, Some(number), indent + digits + 1)
        } else {
            return None;
        };

        let content = match b.get(after) {
            None => after,
            Some(b' ' | b'\t') => {
                let spaces = b[after..].iter().take_while(|c| **c == b' ').count();
                // Five or more spaces: content is indented code; only one belongs to the marker.
                if spaces == 0 || spaces > 4 || after + spaces == b.len() {
                    after + 1
                } else {
                    after + spaces
                }
            }
            Some(_) => return None,
        };

        Some(ListMarker {
            marker,
            number,
            indent,
            content: content.min(b.len()),
        })
    }

    /// Recognises a task checkbox `[ ]`, `[x]` or `[X]` followed by a space or end of line.
    ///
    /// Returns the checked state and the byte length consumed (including the space).
    pub fn checkbox(content: &str) -> Option<(bool, usize)> {
        let b = content.as_bytes();
        if b.len() < 3 || b[0] != b'[' || b[2] != b']' {
            return None;
        }
        let checked = match b[1] {
            b' ' => false,
            b'x' | b'X' => true,
            _ => return None,
        };
        match b.get(3) {
            None => Some((checked, 3)),
            Some(b' ') => Some((checked, 4)),
            Some(_) => None,
        }
    }
}
