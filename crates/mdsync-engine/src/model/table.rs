//! Tables and the column-count invariant.
//!
//! Every row of a [`Table`] has exactly `alignments.len()` cells after any
//! mutating operation. Rows that come in too short are padded with empty
//! cells, rows that are too long are truncated.

use serde::{Deserialize, Serialize};

use super::{inline::Inline, span::Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// One entry per column.
    pub alignments: Vec<Alignment>,
    /// `rows[0]` is the header row.
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub content: Vec<Inline>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl TableCell {
    pub fn new(content: Vec<Inline>) -> Self {
        Self {
            content,
            span: None,
        }
    }
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells, span: None }
    }

    fn empty(columns: usize) -> Self {
        Self::new(vec![TableCell::default(); columns])
    }
}

impl Table {
    /// Builds a table; rows are padded/truncated to the alignment count.
    pub fn new(alignments: Vec<Alignment>, rows: Vec<TableRow>) -> Self {
        let mut t = Self { alignments, rows };
        t.normalize();
        t
    }

    pub fn column_count(&self) -> usize {
        self.alignments.len()
    }

    /// Returns true if every row has `column_count()` cells.
    pub fn is_rectangular(&self) -> bool {
        let n = self.column_count();
        self.rows.iter().all(|r| r.cells.len() == n)
    }

    /// Pads or truncates every row to the column count.
    ///
    /// Returns the number of rows that had to be changed.
    pub fn normalize(&mut self) -> usize {
        let n = self.column_count();
        let mut changed = 0;
        for row in &mut self.rows {
            if row.cells.len() != n {
                row.cells.resize_with(n, TableCell::default);
                changed += 1;
            }
        }
        changed
    }

    /// Inserts an empty row at `index` (clamped to the row count).
    ///
    /// Inserting at 0 pushes a new empty header row.
    pub fn insert_row(&mut self, index: usize) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, TableRow::empty(self.column_count()));
    }

    /// Removes the row at `index`. Returns the removed row, if any.
    pub fn remove_row(&mut self, index: usize) -> Option<TableRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Inserts an empty column at `index` (clamped) in every row.
    pub fn insert_column(&mut self, index: usize, alignment: Alignment) {
        let index = index.min(self.column_count());
        self.alignments.insert(index, alignment);
        for row in &mut self.rows {
            let at = index.min(row.cells.len());
            row.cells.insert(at, TableCell::default());
        }
        self.normalize();
    }

    /// Removes the column at `index` from every row. Refuses to remove the
    /// last remaining column.
    pub fn remove_column(&mut self, index: usize) -> bool {
        if index >= self.column_count() || self.column_count() == 1 {
            return false;
        }
        self.alignments.remove(index);
        for row in &mut self.rows {
            if index < row.cells.len() {
                row.cells.remove(index);
            }
        }
        self.normalize();
        true
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn table(cols: usize, row_lens: &[usize]) -> Table {
        Table {
            alignments: vec![Alignment::None; cols],
            rows: row_lens
                .iter()
                .map(|&n| TableRow::new(vec![TableCell::new(vec![Inline::text("x")]); n]))
                .collect(),
        }
    }

    #[test]
    fn new_pads_and_truncates() {
        let t = Table::new(
            vec![Alignment::Left, Alignment::Right],
            vec![
                TableRow::new(vec![TableCell::default()]),
                TableRow::new(vec![TableCell::default(); 4]),
            ],
        );
        assert!(t.is_rectangular());
        assert_eq!(t.rows[0].cells.len(), 2);
        assert_eq!(t.rows[1].cells.len(), 2);
    }

    #[rstest]
    #[case::row_insert_front(0)]
    #[case::row_insert_middle(1)]
    #[case::row_insert_past_end(99)]
    fn insert_row_keeps_rectangular(#[case] at: usize) {
        let mut t = table(3, &[3, 3]);
        t.insert_row(at);
        assert_eq!(t.rows.len(), 3);
        assert!(t.is_rectangular());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(10)]
    fn insert_column_keeps_rectangular(#[case] at: usize) {
        let mut t = table(2, &[2, 1, 3]);
        t.insert_column(at, Alignment::Center);
        assert_eq!(t.column_count(), 3);
        assert!(t.is_rectangular());
    }

    #[test]
    fn remove_column_keeps_rectangular() {
        let mut t = table(3, &[3, 2, 3]);
        assert!(t.remove_column(1));
        assert_eq!(t.column_count(), 2);
        assert!(t.is_rectangular());
    }

    #[test]
    fn remove_last_column_is_refused() {
        let mut t = table(1, &[1]);
        assert!(!t.remove_column(0));
        assert_eq!(t.column_count(), 1);
    }

    #[test]
    fn remove_row_out_of_range() {
        let mut t = table(2, &[2]);
        assert!(t.remove_row(5).is_none());
        assert!(t.remove_row(0).is_some());
        assert!(t.rows.is_empty());
    }
}
