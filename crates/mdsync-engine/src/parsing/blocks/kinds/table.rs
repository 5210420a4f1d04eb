use std::sync::LazyLock;

use regex::Regex;

use crate::model::Alignment;

/// Separator row: cells of `-` with optional `:` on either side, split by `|`.
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("separator regex")
});

/// Pipe table syntax.
pub struct TableSyntax;

impl TableSyntax {
    pub const PIPE: u8 = b'|';

    /// True if the line contains an unescaped `|`.
    pub fn has_pipe(line: &str) -> bool {
        Self::pipes(line).next().is_some()
    }

    /// Byte offsets of unescaped `|` characters.
    pub fn pipes(line: &str) -> impl Iterator<Item = usize> + '_ {
        let b = line.as_bytes();
        (0..b.len()).filter(move |&i| b[i] == Self::PIPE && !escaped(b, i))
    }

    pub fn is_separator(line: &str) -> bool {
        line.contains('|') && SEPARATOR.is_match(line)
    }

    pub fn alignments(separator: &str) -> Vec<Alignment> {
        Self::cells(separator)
            .into_iter()
            .map(|(s, e)| {
                let cell = separator[s..e].trim();
                match (cell.starts_with(':'), cell.ends_with(':')) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::None,
                }
            })
            .collect()
    }

    /// Byte ranges of the trimmed cell contents of a row.
    ///
    /// A leading and a trailing pipe are optional and do not open empty cells.
    pub fn cells(line: &str) -> Vec<(usize, usize)> {
        let mut bounds: Vec<usize> = Self::pipes(line).collect();
        let lead = line.len() - line.trim_start().len();
        let trail = line.trim_end().len();

        let start = match bounds.first() {
            Some(&p) if p == lead => {
                bounds.remove(0);
                p + 1
            }
            _ => lead,
        };
        let end = match bounds.last() {
            Some(&p) if p + 1 == trail && p + 1 > start => {
                bounds.pop();
                p
            }
            _ => trail,
        };

        let mut out = Vec::with_capacity(bounds.len() + 1);
        let mut cell_start = start;
        for p in bounds.into_iter().chain(std::iter::once(end)) {
            let p = p.max(cell_start);
            out.push(trim_range(line, cell_start, p));
            cell_start = p + 1;
        }
        out
    }
}

fn escaped(b: &[u8], i: usize) -> bool {
    let slashes = b[..i].iter().rev().take_while(|c| **c == b'\\').count();
    slashes % 2 == 1
}

fn trim_range(line: &str, start: usize, end: usize) -> (usize, usize) {
    let s = &line[start..end];
    let lead = s.len() - s.trim_start().len();
    let body = s.trim().len();
    (start + lead, start + lead + body)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts(line: &str) -> Vec<&str> {
        TableSyntax::cells(line)
            .into_iter()
            .map(|(s, e)| &line[s..e])
            .collect()
    }

    #[test]
    fn cells_with_outer_pipes() {
        assert_eq!(texts("| a | b |"), vec!["a", "b"]);
    }

    #[test]
    fn cells_without_outer_pipes() {
        assert_eq!(texts("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn escaped_pipe_stays_in_cell() {
        assert_eq!(texts(r"| a \| b | c |"), vec![r"a \| b", "c"]);
    }

    #[test]
    fn empty_cells_are_kept() {
        assert_eq!(texts("| | x |"), vec!["", "x"]);
    }

    #[test]
    fn separator_detection() {
        assert!(TableSyntax::is_separator("|---|:---:|"));
        assert!(TableSyntax::is_separator("--- | ---"));
        assert!(!TableSyntax::is_separator("---"));
        assert!(!TableSyntax::is_separator("| a | b |"));
    }

    #[test]
    fn separator_alignments() {
        assert_eq!(
            TableSyntax::alignments("| :-- | :-: | --: | --- |"),
            vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ]
        );
    }

    #[test]
    fn unescaped_pipe_detection() {
        assert!(TableSyntax::has_pipe("a | b"));
        assert!(!TableSyntax::has_pipe(r"a \| b"));
        assert!(TableSyntax::has_pipe(r"a \\| b"));
    }
}
