//! Cooperative chunked parsing for large documents.
//!
//! The same block parser runs over the same line table, but stops after a
//! budget of lines and only ever between top-level blocks, so no block (and
//! no inline delimiter run) is split across a suspension point.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use xi_rope::Rope;

use crate::{
    error::ParseError,
    model::{Block, Degradation, Document},
};

use super::{
    ParseOptions, assemble,
    blocks::{BlockParser, Ctx},
    rope::{Line, line_table},
};

/// Lines parsed per step when no budget is configured.
pub const DEFAULT_CHUNK_LINES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldingProgress {
    /// Lines consumed so far.
    pub consumed: usize,
    pub total: usize,
}

/// A parse that can be advanced in steps, or awaited as a [`Future`] that
/// yields back to the executor between chunks.
#[derive(Debug)]
pub struct YieldingParse {
    src: String,
    lines: Vec<Line>,
    next: usize,
    options: ParseOptions,
    chunk_lines: usize,
    blocks: Vec<Block>,
    degradations: Vec<Degradation>,
    cancelled: bool,
}

impl YieldingParse {
    pub fn new(text: &str, options: ParseOptions) -> Self {
        Self::from_rope(&Rope::from(text), options)
    }

    pub fn from_rope(rope: &Rope, options: ParseOptions) -> Self {
        Self {
            src: rope.slice_to_cow(..).into_owned(),
            lines: line_table(rope),
            next: 0,
            options,
            chunk_lines: DEFAULT_CHUNK_LINES,
            blocks: Vec::new(),
            degradations: Vec::new(),
            cancelled: false,
        }
    }

    /// Lines per step when polled as a future (at least 1).
    #[must_use]
    pub fn with_chunk_lines(mut self, lines: usize) -> Self {
        self.chunk_lines = lines.max(1);
        self
    }

    pub fn progress(&self) -> YieldingProgress {
        YieldingProgress {
            consumed: self.next,
            total: self.lines.len(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.lines.len()
    }

    /// Stops the parse; the next step or poll returns [`ParseError::Cancelled`].
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Parses whole top-level blocks until at least `budget` lines are consumed.
    ///
    /// Returns `Ok(true)` once the whole input has been parsed.
    pub fn step(&mut self, budget: usize) -> Result<bool, ParseError> {
        if self.cancelled {
            let p = self.progress();
            return Err(ParseError::Cancelled {
                consumed: p.consumed,
                total: p.total,
            });
        }

        let stop = self.next.saturating_add(budget.max(1));
        let mut parser = BlockParser::new(&self.src, self.options.preserve_line_breaks);
        while self.next < stop {
            match parser.next_block(&self.lines, &mut self.next, Ctx::document()) {
                Some(block) => self.blocks.push(block),
                None => break,
            }
        }
        self.degradations.extend(parser.finish());

        log::trace!(
            "yielding parse: {}/{} lines, {} blocks",
            self.next,
            self.lines.len(),
            self.blocks.len()
        );
        Ok(self.is_done())
    }

    /// Runs the remaining steps without yielding.
    pub fn finish(mut self) -> Result<Document, ParseError> {
        while !self.step(self.chunk_lines)? {}
        Ok(self.take_document())
    }

    fn take_document(&mut self) -> Document {
        assemble(
            std::mem::take(&mut self.blocks),
            std::mem::take(&mut self.degradations),
            self.src.len(),
        )
    }
}

impl Future for YieldingParse {
    type Output = Result<Document, ParseError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.step(this.chunk_lines) {
            Err(e) => Poll::Ready(Err(e)),
            Ok(true) => Poll::Ready(Ok(this.take_document())),
            Ok(false) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}
