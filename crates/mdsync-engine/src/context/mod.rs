//! # Cursor Context
//!
//! Classifies a caret position in markdown text: which block construct it is
//! in (fence, table, list, quote, heading), which inline construct encloses
//! it and which formatting is active there.
//!
//! No full parse happens here. The analyzer tokenizes a bounded window of
//! lines around the caret ([`scanner`]) and runs the inline scanner over the
//! caret's line only ([`line`]), so it is cheap enough to call on every
//! selection change. In pathological documents (a fence opened further above
//! than the window reaches) the answer can differ from the parser's.
//!
//! ## Boundaries
//!
//! A block covers `[first line start, last line end)`: a caret right after a
//! closing fence is outside the fence. On the table separator line the caret
//! is in no row.

pub mod line;
pub mod scanner;

use serde::{Deserialize, Serialize};

use crate::{
    model::{ListKind, Mark, Span},
    parsing::{
        blocks::kinds::{BlockQuote, Heading, ListItemSyntax, TableSyntax},
        rope::slice::floor_char_boundary,
    },
};

use scanner::{LineRole, Window, roles};

/// How far the analyzer looks around the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    /// Lines scanned above and below the caret's line.
    pub window_lines: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self { window_lines: 400 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceContext {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableContext {
    /// Header is row 0.
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListContext {
    pub kind: ListKind,
    /// 0 for a top-level list.
    pub depth: usize,
}

/// An inline construct around the caret: its whole span and the span of its
/// content (link text, alt text, math source, footnote label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineContext {
    pub span: Span,
    pub content: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorContext {
    pub code_fence: Option<FenceContext>,
    pub table: Option<TableContext>,
    pub list: Option<ListContext>,
    /// Blockquote depth.
    pub blockquote: Option<u8>,
    /// Heading level.
    pub heading: Option<u8>,
    pub link: Option<InlineContext>,
    pub image: Option<InlineContext>,
    pub inline_math: Option<InlineContext>,
    pub footnote: Option<InlineContext>,
    /// Innermost mark first.
    pub active_formats: Vec<Mark>,
    pub at_line_start: bool,
    pub at_blank_line: bool,
    pub word_range: Option<Span>,
    pub near_whitespace: bool,
    pub near_punctuation: bool,
    pub has_selection: bool,
}

/// Context of a caret with default limits.
pub fn compute_context(text: &str, offset: usize) -> CursorContext {
    compute_context_with(text, offset, &ContextLimits::default())
}

/// Context of a selection, computed at its start.
pub fn compute_context_for_selection(
    text: &str,
    start: usize,
    end: usize,
    limits: &ContextLimits,
) -> CursorContext {
    let mut ctx = compute_context_with(text, start.min(end), limits);
    ctx.has_selection = start != end;
    ctx
}

pub fn compute_context_with(text: &str, offset: usize, limits: &ContextLimits) -> CursorContext {
    let caret = floor_char_boundary(text, offset);
    let window = Window::around(text, caret, limits.window_lines);
    let line_span = window.caret_span();
    let line_text = window.line(window.caret_line);
    let col = caret - line_span.start;
    let content = line_content(line_text);

    let mut ctx = CursorContext {
        at_line_start: col <= content.start || line_text[content.start..col].trim().is_empty(),
        at_blank_line: line_text.trim().is_empty(),
        word_range: line::word_range(line_text, col, line_span.start),
        near_whitespace: line::near_whitespace(line_text, col),
        near_punctuation: line::near_punctuation(line_text, col),
        ..CursorContext::default()
    };

    match roles(&window).swap_remove(window.caret_line) {
        LineRole::FenceOpen(sig) | LineRole::FenceBody(sig) => {
            ctx.code_fence = Some(fence_context(&sig.info));
        }
        LineRole::FenceClose(sig) if caret < line_span.end => {
            ctx.code_fence = Some(fence_context(&sig.info));
        }
        LineRole::TableSeparator => {}
        LineRole::TableHeader => table_line(&mut ctx, line_text, line_span.start, caret, 0),
        LineRole::TableRow(row) => table_line(&mut ctx, line_text, line_span.start, caret, row),
        LineRole::FenceClose(_) | LineRole::Plain => {
            ctx.heading = content.heading;
            if (content.start..=content.end).contains(&col) {
                let inline = &line_text[content.start..content.end];
                apply_inlines(&mut ctx, inline, line_span.start + content.start, caret);
            }
        }
    }

    if ctx.code_fence.is_none() {
        ctx.blockquote = (content.quote_depth > 0).then_some(content.quote_depth);
        ctx.list = list_context(&window);
    }
    ctx
}

/// Where a line's inline content sits, past quote, list and heading syntax.
struct LineContent {
    quote_depth: u8,
    heading: Option<u8>,
    start: usize,
    end: usize,
}

fn line_content(line: &str) -> LineContent {
    let (quote_depth, quote_end) = BlockQuote::strip_prefixes(line);
    let rest = &line[quote_end..];
    if let Some(h) = Heading::parse(rest) {
        return LineContent {
            quote_depth,
            heading: Some(h.level),
            start: quote_end + h.content.0,
            end: quote_end + h.content.1,
        };
    }
    let mut start = quote_end;
    if let Some(m) = ListItemSyntax::marker(rest) {
        start += m.content;
        if let Some((_, len)) = ListItemSyntax::checkbox(&rest[m.content..]) {
            start += len;
        }
    }
    LineContent {
        quote_depth,
        heading: None,
        start,
        end: line.len(),
    }
}

fn table_line(ctx: &mut CursorContext, line: &str, abs: usize, caret: usize, row: usize) {
    let col = caret - abs;
    ctx.table = Some(TableContext {
        row,
        col: table_column(line, col),
    });
    if let Some((s, e)) = cell_around(line, col) {
        apply_inlines(ctx, &line[s..e], abs + s, caret);
    }
}

fn fence_context(info: &str) -> FenceContext {
    let language = info.split_whitespace().next().map(str::to_string);
    FenceContext { language }
}

fn apply_inlines(ctx: &mut CursorContext, content: &str, abs: usize, caret: usize) {
    let found = line::scan(content, abs, caret);
    ctx.link = found.link;
    ctx.image = found.image;
    ctx.inline_math = found.math;
    ctx.footnote = found.footnote;
    ctx.active_formats = found.formats;
}

/// Column index: unescaped pipes before the caret, not counting a leading one.
fn table_column(line: &str, col: usize) -> usize {
    let lead = line.len() - line.trim_start().len();
    TableSyntax::pipes(line)
        .take_while(|&p| p < col)
        .filter(|&p| p != lead)
        .count()
}

/// Byte range of the cell content the caret is in.
fn cell_around(line: &str, col: usize) -> Option<(usize, usize)> {
    TableSyntax::cells(line)
        .into_iter()
        .find(|&(s, e)| s <= col && col <= e)
}

/// List item the caret's line belongs to: the nearest marker above within the
/// same non-blank run, with one level of depth per shallower marker above it.
fn list_context(window: &Window<'_>) -> Option<ListContext> {
    let mut found: Option<(ListKind, usize)> = None;
    let mut depth = 0;
    for i in (0..=window.caret_line).rev() {
        let line = window.line(i);
        let (_, at) = BlockQuote::strip_prefixes(line);
        let line = &line[at..];
        if line.trim().is_empty() {
            break;
        }
        // Continuation and lazy lines belong to the nearest item above.
        let Some(m) = ListItemSyntax::marker(line) else {
            continue;
        };
        match found {
            None => {
                let kind = if m.ordered() {
                    ListKind::Ordered
                } else if ListItemSyntax::checkbox(&line[m.content..]).is_some() {
                    ListKind::Task
                } else {
                    ListKind::Unordered
                };
                found = Some((kind, m.indent));
            }
            Some((kind, indent)) if m.indent < indent => {
                depth += 1;
                found = Some((kind, m.indent));
            }
            Some(_) => {}
        }
    }
    found.map(|(kind, _)| ListContext { kind, depth })
}
