/// Horizontal rule: 3+ of the same `-`, `*` or `_`, optionally spaced, alone on a line.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const CHARS: [u8; 3] = [b'-', b'*', b'_'];
    pub const MIN_COUNT: usize = 3;

    pub fn matches(line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let body = line.trim();
        let Some(first) = body.bytes().next() else {
            return false;
        };
        if !Self::CHARS.contains(&first) {
            return false;
        }
        let mut count = 0;
        for b in body.bytes() {
            match b {
                b' ' | b'\t' => {}
                c if c == first => count += 1,
                _ => return false,
            }
        }
        count >= Self::MIN_COUNT
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("---", true)]
    #[case("***", true)]
    #[case("___", true)]
    #[case(" - - -", true)]
    #[case("*****  ", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("--- x", false)]
    #[case("    ---", false)]
    #[case("", false)]
    fn thematic_breaks(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(line), expected);
    }
}
