//! Pipe tables with cells padded to each column's widest content.

use unicode_width::UnicodeWidthStr;

use crate::model::{Alignment, Inline, Span, Table};

use super::{
    SerializeOptions,
    inline::{InlineMode, emit_inlines},
    writer::MdWriter,
};

/// Minimum column width, so every separator can hold its alignment colons.
const MIN_WIDTH: usize = 3;

pub fn emit_table(w: &mut MdWriter, table: &mut Table, opts: &SerializeOptions) {
    if table.rows.is_empty() {
        table.insert_row(0);
    }

    // Render cells first: padding needs every width in the column.
    let mut rendered: Vec<Vec<String>> = Vec::with_capacity(table.rows.len());
    for row in &mut table.rows {
        let mut texts = Vec::with_capacity(row.cells.len());
        for cell in &mut row.cells {
            let mut sub = MdWriter::new();
            emit_inlines(&mut sub, &mut cell.content, opts, InlineMode::Cell);
            texts.push(sub.finish());
        }
        rendered.push(texts);
    }

    let mut widths = vec![MIN_WIDTH; table.alignments.len()];
    for texts in &rendered {
        for (width, text) in widths.iter_mut().zip(texts) {
            *width = (*width).max(text.width());
        }
    }

    for (r, (row, texts)) in table.rows.iter_mut().zip(&rendered).enumerate() {
        if r == 1 {
            separator(w, &table.alignments, &widths);
            w.newline();
        }
        let row_start = w.content_start();
        w.write("|");
        for ((cell, text), width) in row.cells.iter_mut().zip(texts).zip(&widths) {
            w.write(" ");
            let at = w.content_start();
            w.write(text);
            shift(&mut cell.content, at);
            cell.span = Some(Span::new(at, at + text.len()));
            let pad = width.saturating_sub(text.width());
            w.write(&format!("{} |", " ".repeat(pad)));
        }
        row.span = Some(Span::new(row_start, w.content_end()));
        if r + 1 < rendered.len() {
            w.newline();
        }
    }
    if rendered.len() == 1 {
        w.newline();
        separator(w, &table.alignments, &widths);
    }
}

fn separator(w: &mut MdWriter, alignments: &[Alignment], widths: &[usize]) {
    let mut line = String::from("|");
    for (align, &width) in alignments.iter().zip(widths) {
        let dashes = match align {
            Alignment::None => "-".repeat(width),
            Alignment::Left => format!(":{}", "-".repeat(width - 1)),
            Alignment::Right => format!("{}:", "-".repeat(width - 1)),
            Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
        };
        line.push_str(&format!(" {dashes} |"));
    }
    w.write(&line);
}

/// Moves spans assigned by a scratch writer to their place in the output.
fn shift(inlines: &mut [Inline], by: usize) {
    for i in inlines {
        i.span = i.span.map(|s| s.offset_by(by));
        if let Some(children) = i.children_mut() {
            shift(children, by);
        }
    }
}
