//! Bounded local block tokenizer.
//!
//! Assigns every line of a window around the caret a [`LineRole`] with a
//! three-state machine (neutral, inside a fence, inside a table) run forward
//! from the window's first line. A construct opened above the window is not
//! seen; that is the price of staying O(window).

use crate::{
    model::Span,
    parsing::blocks::kinds::{BlockQuote, CodeFence, FenceSig, ListItemSyntax, TableSyntax},
};

/// Lines around the caret, as absolute spans without their newline.
#[derive(Debug)]
pub struct Window<'t> {
    text: &'t str,
    lines: Vec<Span>,
    /// Index of the caret's line within `lines`.
    pub caret_line: usize,
}

impl<'t> Window<'t> {
    /// Collects up to `radius` lines above and below the line holding `offset`.
    pub fn around(text: &'t str, offset: usize, radius: usize) -> Self {
        let line_start = |end: usize| text[..end].rfind('\n').map_or(0, |i| i + 1);
        let line_end = |start: usize| text[start..].find('\n').map_or(text.len(), |i| start + i);

        let first = line_start(offset);
        let mut above = Vec::new();
        let mut start = first;
        while start > 0 && above.len() < radius {
            let prev = line_start(start - 1);
            above.push(Span::new(prev, start - 1));
            start = prev;
        }
        above.reverse();

        let caret_line = above.len();
        let mut lines = above;
        let mut end = line_end(first);
        lines.push(Span::new(first, end));
        let mut below = 0;
        while end < text.len() && below < radius {
            let next = end + 1;
            end = line_end(next);
            lines.push(Span::new(next, end));
            below += 1;
        }

        Self {
            text,
            lines,
            caret_line,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn span(&self, i: usize) -> Span {
        self.lines[i]
    }

    pub fn line(&self, i: usize) -> &'t str {
        let s = self.lines[i];
        &self.text[s.start..s.end]
    }

    pub fn caret_span(&self) -> Span {
        self.span(self.caret_line)
    }
}

/// What a line is, block-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRole {
    Plain,
    FenceOpen(FenceSig),
    FenceBody(FenceSig),
    FenceClose(FenceSig),
    TableHeader,
    TableSeparator,
    /// Body row; the header is row 0.
    TableRow(usize),
}

#[derive(Debug, Clone)]
enum State {
    Neutral,
    Fence(FenceSig),
    Table { rows: usize },
}

/// Strips quote prefixes and a list marker: what remains is where fences and
/// table rows are recognised. Indentation past the prefix is kept, so an
/// indented-code line is not taken for a fence.
pub fn structural(line: &str) -> &str {
    let (depth, at) = BlockQuote::strip_prefixes(line);
    let at = if depth == 0 {
        0
    } else {
        // Only one space after the last `>` belongs to the prefix.
        let last = line[..at].rfind(BlockQuote::PREFIX).map_or(0, |i| i + 1);
        last + usize::from(line[last..].starts_with(' '))
    };
    let rest = &line[at..];
    match ListItemSyntax::marker(rest) {
        Some(m) => &rest[m.content..],
        None => rest,
    }
}

/// Runs the tokenizer over the window and returns the role of every line.
pub fn roles(window: &Window<'_>) -> Vec<LineRole> {
    let mut out = Vec::with_capacity(window.len());
    let mut state = State::Neutral;
    for i in 0..window.len() {
        let line = structural(window.line(i));
        let (role, next) = step(state, line, || {
            (i + 1 < window.len()).then(|| structural(window.line(i + 1)))
        });
        out.push(role);
        state = next;
    }
    out
}

fn step<'a>(state: State, line: &str, next_line: impl FnOnce() -> Option<&'a str>) -> (LineRole, State) {
    match state {
        State::Fence(sig) => {
            if CodeFence::closes(&sig, line) {
                (LineRole::FenceClose(sig), State::Neutral)
            } else {
                (LineRole::FenceBody(sig.clone()), State::Fence(sig))
            }
        }
        State::Table { rows } if rows == 0 => (LineRole::TableSeparator, State::Table { rows: 1 }),
        State::Table { rows } if TableSyntax::has_pipe(line) => {
            (LineRole::TableRow(rows), State::Table { rows: rows + 1 })
        }
        State::Neutral | State::Table { .. } => {
            if let Some(sig) = CodeFence::sig(line) {
                (LineRole::FenceOpen(sig.clone()), State::Fence(sig))
            } else if TableSyntax::has_pipe(line) && next_line().is_some_and(TableSyntax::is_separator) {
                (LineRole::TableHeader, State::Table { rows: 0 })
            } else {
                (LineRole::Plain, State::Neutral)
            }
        }
    }
}
