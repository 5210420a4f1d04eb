//! # Markdown Serialization
//!
//! [`Document`] back to text. The inverse of [`crate::parsing::parse`] up to
//! normalization: sibling blocks are separated by one blank line (list items
//! of tight lists by none), table columns are re-padded, footnote definitions
//! move to the end in first-reference order with numeric labels.
//!
//! [`serialize_with_spans`] also returns the emitted tree with spans pointing
//! into the new text, which is how renderer-built nodes acquire spans.

pub mod inline;
pub mod table;
pub mod writer;

use serde::{Deserialize, Serialize};

use crate::{
    error::SerializeError,
    model::{
        AlertKind, Block, BlockKind, Document, List, ListKind, NodePath, Span,
        footnotes::{Renumbered, renumber},
        validate,
    },
};

use inline::{InlineMode, emit_inlines};
use writer::MdWriter;

/// How hard line breaks are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardBreakStyle {
    /// A trailing `\`.
    Backslash,
    /// Two trailing spaces.
    Spaces,
    /// Whatever style the break was parsed from (spaces for new breaks).
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Write preserved single-newline breaks as plain newlines.
    pub preserve_line_breaks: bool,
    pub hard_break_style: HardBreakStyle,
}

/// Serializes `doc` to markdown.
///
/// Ragged tables are repaired first; any other structural violation fails
/// with [`SerializeError`].
pub fn serialize(doc: &Document, opts: &SerializeOptions) -> Result<String, SerializeError> {
    serialize_with_spans(doc, opts).map(|(text, _)| text)
}

/// Serializes `doc` and returns the emitted tree, its spans set against the text.
///
/// The returned tree is in emission order (footnote definitions last) and
/// carries the renumbered footnote labels.
pub fn serialize_with_spans(
    doc: &Document,
    opts: &SerializeOptions,
) -> Result<(String, Document), SerializeError> {
    serialize_tracked(doc, opts).map(|s| (s.text, s.document))
}

/// Output of [`serialize_tracked`].
#[derive(Debug, Clone, PartialEq)]
pub struct Serialized {
    pub text: String,
    /// The emitted tree, spans set against `text`.
    pub document: Document,
    /// `placement[i]` is the emitted index of the input's top-level block `i`.
    pub placement: Vec<usize>,
}

impl Serialized {
    /// Rewrites a path into the input tree as a path into [`Self::document`].
    pub fn remap(&self, path: &NodePath) -> Option<NodePath> {
        let mut out = path.clone();
        if let Some(first) = out.0.first_mut() {
            *first = *self.placement.get(*first)?;
        }
        Some(out)
    }
}

/// [`serialize_with_spans`] plus where each top-level input block ended up,
/// so paths into the input tree can be followed into the emitted one.
pub fn serialize_tracked(doc: &Document, opts: &SerializeOptions) -> Result<Serialized, SerializeError> {
    if let Err(e) = validate::check(doc) {
        log::error!("serialize failed: {e}");
        return Err(e.into());
    }
    let mut repaired = doc.clone();
    validate::repair(&mut repaired);

    let Renumbered {
        document,
        definition_order,
        ..
    } = renumber(&repaired);
    let (mut blocks, placement) = emission_order(document.blocks, &definition_order);

    let mut e = Emitter {
        w: MdWriter::new(),
        opts,
        quote_depth: 0,
        list_depth: 0,
    };
    e.blocks(&mut blocks, false);

    let mut text = e.w.finish();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    log::trace!("serialized {} blocks into {} bytes", blocks.len(), text.len());

    let document = Document {
        blocks,
        span: Some(Span::new(0, text.len())),
        degradations: Vec::new(),
    };
    Ok(Serialized {
        text,
        document,
        placement,
    })
}

/// Body blocks in order, then top-level footnote definitions in `definitions`
/// order. Also returns the emitted index of every input block.
fn emission_order(blocks: Vec<Block>, definitions: &[usize]) -> (Vec<Block>, Vec<usize>) {
    let mut placement = vec![0; blocks.len()];
    let mut slots: Vec<Option<Block>> = blocks.into_iter().map(Some).collect();
    let mut defs = Vec::with_capacity(definitions.len());
    for &i in definitions {
        if let Some(b) = slots.get_mut(i).and_then(Option::take) {
            defs.push((i, b));
        }
    }
    let mut out = Vec::with_capacity(slots.len() + defs.len());
    for (i, b) in slots.into_iter().enumerate() {
        if let Some(b) = b.filter(|b| !matches!(b.kind, BlockKind::FootnoteDefinition { .. })) {
            placement[i] = out.len();
            out.push(b);
        }
    }
    for (i, b) in defs {
        placement[i] = out.len();
        out.push(b);
    }
    (out, placement)
}

/// What the previous sibling looked like, for choosing the next separator.
#[derive(Debug, Clone, Copy, Default)]
struct Emitted {
    paragraph: bool,
    /// `(ordered, marker)` of a list.
    list: Option<(bool, char)>,
}

struct Emitter<'o> {
    w: MdWriter,
    opts: &'o SerializeOptions,
    quote_depth: u8,
    list_depth: usize,
}

impl Emitter<'_> {
    fn blocks(&mut self, blocks: &mut [Block], tight: bool) {
        let mut prev: Option<Emitted> = None;
        for b in blocks.iter_mut() {
            if let Some(p) = prev {
                // Inside tight items a paragraph would swallow a following
                // paragraph or a list that cannot interrupt it.
                let merges = p.paragraph
                    && match &b.kind {
                        BlockKind::Paragraph(_) => true,
                        BlockKind::List(l) => l.kind == ListKind::Ordered && l.start != 1,
                        _ => false,
                    };
                if tight && !merges {
                    self.w.newline();
                } else {
                    self.w.blank_line();
                }
            }
            prev = Some(self.block(b, prev.and_then(|p| p.list)));
        }
    }

    fn block(&mut self, b: &mut Block, prev_list: Option<(bool, char)>) -> Emitted {
        let mut emitted = Emitted::default();
        let start = self.w.content_start();
        let span = match &mut b.kind {
            BlockKind::Paragraph(content) => {
                emitted.paragraph = true;
                emit_inlines(&mut self.w, content, self.opts, InlineMode::Flow);
                Span::new(start, self.w.content_end().max(start))
            }
            BlockKind::Heading { level, content } => {
                self.w.write(&"#".repeat(usize::from(*level)));
                if !content.is_empty() {
                    self.w.write(" ");
                    emit_inlines(&mut self.w, content, self.opts, InlineMode::Heading);
                }
                Span::new(start, self.w.content_end())
            }
            BlockKind::CodeFence {
                fence,
                language,
                code,
            } => {
                fence.len = fence_len(fence.kind.char(), fence.len, code);
                let marker = fence.kind.char().to_string().repeat(fence.len);
                self.w.write(&marker);
                if let Some(lang) = language {
                    self.w.write(lang);
                }
                self.w.newline();
                let body = code.strip_suffix('\n').unwrap_or(code);
                if !code.is_empty() {
                    self.w.write_lines(body);
                    self.w.newline();
                }
                self.w.write(&marker);
                Span::new(start, self.w.content_end())
            }
            BlockKind::BlockQuote { depth, children } => {
                self.quote_depth = self.quote_depth.saturating_add(1);
                *depth = self.quote_depth;
                let span = self.quoted(children, None);
                self.quote_depth -= 1;
                span
            }
            BlockKind::Alert { kind, children } => {
                self.quote_depth = self.quote_depth.saturating_add(1);
                let span = self.quoted(children, Some(*kind));
                self.quote_depth -= 1;
                span
            }
            BlockKind::Details {
                open,
                summary,
                children,
            } => {
                self.w.write(if *open { "<details open>" } else { "<details>" });
                self.w.newline();
                self.w
                    .write(&format!("<summary>{}</summary>", summary.replace('\n', " ")));
                if children.is_empty() {
                    self.w.newline();
                } else {
                    self.w.blank_line();
                    self.blocks(children, false);
                    self.w.blank_line();
                }
                self.w.write("</details>");
                Span::new(start, self.w.content_end())
            }
            BlockKind::FrontMatter(yaml) => {
                self.w.write("---");
                self.w.newline();
                if !yaml.is_empty() {
                    self.w.write_lines(yaml);
                    self.w.newline();
                }
                self.w.write("---");
                Span::new(start, self.w.content_end())
            }
            BlockKind::FootnoteDefinition { label, children } => {
                self.w.push_prefix(format!("[^{label}]: "), "    ");
                let start = self.w.container_start();
                self.blocks(children, false);
                if children.is_empty() {
                    self.w.content_start();
                }
                let end = self.w.content_end().max(start);
                self.w.pop_prefix();
                Span::new(start, end)
            }
            BlockKind::HtmlBlock(raw) => {
                self.w.write_lines(raw);
                Span::new(start, self.w.content_end())
            }
            BlockKind::MathBlock(latex) => {
                self.w.write("$$");
                self.w.newline();
                self.w.write_lines(latex);
                self.w.newline();
                self.w.write("$$");
                Span::new(start, self.w.content_end())
            }
            BlockKind::HorizontalRule => {
                // `- ---` is itself a rule, and `---` on the first line opens front matter.
                let rule = if self.list_depth > 0 {
                    "___"
                } else if start == 0 {
                    "***"
                } else {
                    "---"
                };
                self.w.write(rule);
                Span::new(start, self.w.content_end())
            }
            BlockKind::Table(t) => {
                table::emit_table(&mut self.w, t, self.opts);
                Span::new(start, self.w.content_end())
            }
            BlockKind::List(list) => {
                let span = self.list(list, prev_list);
                emitted.list = Some((list.kind == ListKind::Ordered, list.marker));
                span
            }
        };
        b.span = Some(span);
        emitted
    }

    /// Blockquote or alert body under a `> ` prefix.
    fn quoted(&mut self, children: &mut [Block], alert: Option<AlertKind>) -> Span {
        self.w.push_prefix("> ", "> ");
        let start = self.w.container_start();
        if let Some(kind) = alert {
            self.w.write(&format!("[!{}]", kind.as_str()));
            if !children.is_empty() {
                self.w.newline();
            }
        }
        self.blocks(children, false);
        if children.is_empty() && alert.is_none() {
            self.w.content_start();
        }
        let end = self.w.content_end().max(start);
        self.w.pop_prefix();
        Span::new(start, end)
    }

    fn list(&mut self, list: &mut List, prev_list: Option<(bool, char)>) -> Span {
        let ordered = list.kind == ListKind::Ordered;
        let mut marker = match (ordered, list.marker) {
            (true, m @ ('.' | ')')) | (false, m @ ('-' | '*' | '+')) => m,
            (true, _) => '.',
            (false, _) => '-',
        };
        // A following list with the same marker would merge into the previous one.
        if prev_list == Some((ordered, marker)) {
            marker = match marker {
                '.' => ')',
                ')' => '.',
                '-' => '*',
                _ => '-',
            };
        }
        list.marker = marker;
        list.depth = self.list_depth;

        let mut list_start = None;
        self.list_depth += 1;
        for (n, item) in list.items.iter_mut().enumerate() {
            if n > 0 {
                if list.tight {
                    self.w.newline();
                } else {
                    self.w.blank_line();
                }
            }
            let bullet = if ordered {
                format!("{}{marker} ", list.start + n as u64)
            } else {
                format!("{marker} ")
            };
            let rest = " ".repeat(bullet.len());
            self.w.push_prefix(bullet, rest);
            let item_start = self.w.container_start();
            list_start.get_or_insert(item_start);

            match item.checked {
                Some(true) => self.w.write("[x] "),
                Some(false) => self.w.write("[ ] "),
                None => {}
            }
            self.blocks(&mut item.children, list.tight);
            if item.children.is_empty() && item.checked.is_none() {
                self.w.content_start();
            }
            item.span = Some(Span::new(item_start, self.w.content_end().max(item_start)));
            self.w.pop_prefix();
        }
        self.list_depth -= 1;

        let start = list_start.unwrap_or_else(|| self.w.content_start());
        Span::new(start, self.w.content_end().max(start))
    }
}

/// Fence length that no line of `code` can close early.
fn fence_len(ch: char, len: usize, code: &str) -> usize {
    code.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.chars().all(|c| c == ch))
        .map(|l| l.chars().count() + 1)
        .fold(len.max(3), usize::max)
}
