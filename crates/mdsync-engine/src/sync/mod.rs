//! # Synchronization
//!
//! Keeps a text surface and a rich-document surface showing the same
//! document. The controller never touches either surface: hosts feed it
//! change notifications and a clock, and apply the [`SyncEffect`]s it returns.
//!
//! ```text
//! tree edit  ─► PendingFlush   ─(deadline)─► Flushing  ─► Idle   WriteText
//! text edit  ─► PendingReparse ─(deadline)─► Reparsing ─► Idle   PushTree
//! ```
//!
//! A newer edit from either side discards whatever is still scheduled. Writes
//! to the text surface carry an [`EchoToken`] so their change notification is
//! not mistaken for a user edit. Carets are carried across each sync through
//! the position mapper and fall back to the document start when stale.

pub mod echo;
pub mod schedule;

use std::{
    ops::Range,
    time::{Duration, Instant},
};

use xi_rope::Rope;

use crate::{
    error::SerializeError,
    model::Document,
    parsing::{ParseOptions, YieldingParse, parse_rope},
    position::{TreeLocation, to_text_offset, to_tree_location},
    serialize::{SerializeOptions, Serialized, serialize_tracked},
};

pub use echo::{EchoGuard, EchoToken};
pub use schedule::{DebounceTier, ParseMode, SyncConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    PendingFlush,
    Flushing,
    PendingReparse,
    Reparsing,
}

/// What the host must do after a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEffect {
    /// Call [`SyncController::poll`] again at `at`.
    Wake { at: Instant },
    /// Replace the text surface's contents and selection.
    WriteText {
        text: String,
        selection: Range<usize>,
        token: EchoToken,
    },
    /// Hand a freshly parsed tree and caret to the rich surface.
    PushTree {
        document: Document,
        caret: TreeLocation,
    },
    /// Serialization failed; the text surface keeps the last good text.
    SerializeFailed(SerializeError),
}

#[derive(Debug)]
struct InFlight {
    parse: YieldingParse,
    text: Rope,
    caret: usize,
    chunk_lines: usize,
}

#[derive(Debug)]
pub struct SyncController {
    config: SyncConfig,
    parse_options: ParseOptions,
    serialize_options: SerializeOptions,
    phase: SyncPhase,
    deadline: Option<Instant>,
    /// Last text known to be on the text surface.
    text: Rope,
    /// Last good tree, spans against `text`.
    document: Document,
    pending_text: Option<(Rope, usize)>,
    pending_tree: Option<(Document, Option<TreeLocation>)>,
    in_flight: Option<InFlight>,
    echo: EchoGuard,
    version: u64,
}

impl SyncController {
    pub fn new(
        text: &str,
        config: SyncConfig,
        parse_options: ParseOptions,
        serialize_options: SerializeOptions,
    ) -> Self {
        let text = Rope::from(text);
        let document = parse_rope(&text, &parse_options);
        Self {
            config,
            parse_options,
            serialize_options,
            phase: SyncPhase::Idle,
            deadline: None,
            text,
            document,
            pending_text: None,
            pending_tree: None,
            in_flight: None,
            echo: EchoGuard::new(),
            version: 0,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn text(&self) -> String {
        self.text.slice_to_cow(..).into_owned()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of completed syncs.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The text surface changed (user typing or an external reload).
    pub fn text_changed(&mut self, text: &str, selection: Range<usize>, now: Instant) -> Vec<SyncEffect> {
        if self.echo.is_echo(text) {
            return Vec::new();
        }
        self.cancel_reparse();
        if self.text.slice_to_cow(..) == text {
            log::debug!("text unchanged since last sync, nothing to reparse");
            if self.pending_tree.is_none() {
                self.settle();
            }
            return Vec::new();
        }
        if self.pending_tree.take().is_some() {
            log::debug!("text edit discards pending flush");
        }

        let delay = self.config.delay_for(text.len());
        log::debug!("reparse of {} bytes scheduled in {delay:?}", text.len());
        self.pending_text = Some((Rope::from(text), selection.start));
        self.phase = SyncPhase::PendingReparse;
        self.schedule(now, delay)
    }

    /// The rich surface has a new tree; `caret` is its caret, if any.
    pub fn tree_changed(
        &mut self,
        document: Document,
        caret: Option<TreeLocation>,
        now: Instant,
    ) -> Vec<SyncEffect> {
        if self.pending_text.is_some() || self.in_flight.is_some() {
            log::debug!("tree edit discards pending reparse");
            self.cancel_reparse();
        }
        if self.pending_tree.is_some() {
            log::debug!("tree edit pre-empts pending flush");
        }

        let delay = self.config.delay_for(self.text.len());
        self.pending_tree = Some((document, caret));
        self.phase = SyncPhase::PendingFlush;
        self.schedule(now, delay)
    }

    /// Runs whatever is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<SyncEffect> {
        if self.deadline.is_some_and(|d| now < d) {
            return Vec::new();
        }
        match self.phase {
            SyncPhase::PendingFlush => self.flush(),
            SyncPhase::PendingReparse => self.start_reparse(now, false),
            SyncPhase::Reparsing => self.step_reparse(now),
            SyncPhase::Idle | SyncPhase::Flushing => Vec::new(),
        }
    }

    /// Completes any pending or running sync immediately, so the other
    /// surface is current before it takes focus.
    pub fn switch_mode(&mut self, now: Instant) -> Vec<SyncEffect> {
        match self.phase {
            SyncPhase::PendingFlush => self.flush(),
            SyncPhase::PendingReparse => self.start_reparse(now, true),
            SyncPhase::Reparsing => match self.in_flight.take() {
                Some(f) => self.finish_in_flight(f),
                None => self.settle_with(Vec::new()),
            },
            SyncPhase::Idle | SyncPhase::Flushing => Vec::new(),
        }
    }

    fn schedule(&mut self, now: Instant, delay: Duration) -> Vec<SyncEffect> {
        let at = now + delay;
        self.deadline = Some(at);
        vec![SyncEffect::Wake { at }]
    }

    fn settle(&mut self) {
        self.phase = SyncPhase::Idle;
        self.deadline = None;
    }

    fn settle_with(&mut self, effects: Vec<SyncEffect>) -> Vec<SyncEffect> {
        self.settle();
        effects
    }

    fn cancel_reparse(&mut self) {
        self.pending_text = None;
        if let Some(mut f) = self.in_flight.take() {
            f.parse.cancel();
            let p = f.parse.progress();
            log::debug!("cancelled yielding parse at {}/{} lines", p.consumed, p.total);
        }
    }

    fn flush(&mut self) -> Vec<SyncEffect> {
        let Some((tree, caret)) = self.pending_tree.take() else {
            return self.settle_with(Vec::new());
        };
        self.phase = SyncPhase::Flushing;

        let serialized = match serialize_tracked(&tree, &self.serialize_options) {
            Ok(done) => done,
            Err(e) => {
                // Already logged by the serializer; the next tree edit retries.
                return self.settle_with(vec![SyncEffect::SerializeFailed(e)]);
            }
        };

        // The caret path points into the tree as sent, not as emitted.
        let offset = caret
            .as_ref()
            .and_then(|c| {
                let path = serialized.remap(&c.path)?;
                to_text_offset(&path, c.node_offset, &serialized.document)
            })
            .unwrap_or(0);
        let Serialized { text, document, .. } = serialized;
        self.document = document;
        self.version += 1;

        if self.text.slice_to_cow(..) == text.as_str() {
            log::debug!("flush reproduced the current text, nothing to write");
            return self.settle_with(Vec::new());
        }
        self.text = Rope::from(text.as_str());
        let token = self.echo.issue(&text);
        self.settle_with(vec![SyncEffect::WriteText {
            text,
            selection: offset..offset,
            token,
        }])
    }

    fn start_reparse(&mut self, now: Instant, blocking: bool) -> Vec<SyncEffect> {
        let Some((text, caret)) = self.pending_text.take() else {
            return self.settle_with(Vec::new());
        };
        let mode = if blocking {
            ParseMode::Blocking
        } else {
            self.config.parse_mode(text.len())
        };
        match mode {
            ParseMode::Blocking => {
                self.phase = SyncPhase::Reparsing;
                let document = parse_rope(&text, &self.parse_options);
                self.apply_reparse(text, caret, document)
            }
            ParseMode::Yielding { chunk_lines } => {
                log::debug!("yielding reparse of {} bytes, {chunk_lines} lines per step", text.len());
                let parse = YieldingParse::from_rope(&text, self.parse_options).with_chunk_lines(chunk_lines);
                self.in_flight = Some(InFlight {
                    parse,
                    text,
                    caret,
                    chunk_lines,
                });
                self.phase = SyncPhase::Reparsing;
                self.step_reparse(now)
            }
        }
    }

    fn step_reparse(&mut self, now: Instant) -> Vec<SyncEffect> {
        let Some(mut f) = self.in_flight.take() else {
            return self.settle_with(Vec::new());
        };
        match f.parse.step(f.chunk_lines) {
            Ok(true) => self.finish_in_flight(f),
            Ok(false) => {
                self.in_flight = Some(f);
                let delay = self.config.frame_interval();
                self.schedule(now, delay)
            }
            Err(e) => {
                log::debug!("{e}");
                self.settle_with(Vec::new())
            }
        }
    }

    fn finish_in_flight(&mut self, f: InFlight) -> Vec<SyncEffect> {
        match f.parse.finish() {
            Ok(document) => self.apply_reparse(f.text, f.caret, document),
            Err(e) => {
                log::debug!("{e}");
                self.settle_with(Vec::new())
            }
        }
    }

    fn apply_reparse(&mut self, text: Rope, caret: usize, document: Document) -> Vec<SyncEffect> {
        let caret = to_tree_location(caret, &document).unwrap_or_default();
        self.text = text;
        self.document = document.clone();
        self.version += 1;
        self.settle_with(vec![SyncEffect::PushTree { document, caret }])
    }
}
