use crate::{
    model::{
        Block, BlockKind, Degradation, DegradationKind, Fence, Inline, List, ListItem, ListKind,
        Span, Table, TableCell, TableRow,
    },
    parsing::{
        inline::parse_inline,
        rope::{Line, preview},
    },
};

use super::{
    content::ContentView,
    kinds::{
        BlockQuote, CodeFence, FenceSig, HtmlEnd, HtmlSyntax, ListItemSyntax, ListMarker, MathBlock,
        TableSyntax, ThematicBreak,
    },
    open::{BlockOpen, front_matter_end, try_open},
};

/// Where the parser currently is in the container hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ctx {
    /// Number of enclosing `>` levels.
    pub quote_depth: u8,
    /// Number of enclosing lists.
    pub list_depth: usize,
    /// True only for the document's own block sequence.
    pub top_level: bool,
}

impl Ctx {
    pub fn document() -> Self {
        Self {
            top_level: true,
            ..Self::default()
        }
    }

    fn nested(self) -> Self {
        Self {
            top_level: false,
            ..self
        }
    }
}

/// Recursive block parser over line views.
///
/// Containers (quotes, alerts, list items, details, footnote definitions)
/// collect their lines with one level of prefix stripped and recurse; leaves
/// are built directly. [`BlockParser::next_block`] parses exactly one block so
/// callers can stop between top-level blocks.
pub struct BlockParser<'s> {
    src: &'s str,
    preserve_line_breaks: bool,
    degradations: Vec<Degradation>,
}

impl<'s> BlockParser<'s> {
    pub fn new(src: &'s str, preserve_line_breaks: bool) -> Self {
        Self {
            src,
            preserve_line_breaks,
            degradations: Vec::new(),
        }
    }

    /// Degradations recorded so far.
    pub fn finish(self) -> Vec<Degradation> {
        self.degradations
    }

    pub fn parse_blocks(&mut self, lines: &[Line], ctx: Ctx) -> Vec<Block> {
        let mut i = 0;
        let mut out = Vec::new();
        while let Some(b) = self.next_block(lines, &mut i, ctx) {
            out.push(b);
        }
        out
    }

    /// Parses the block starting at or after `*i`, advancing `*i` past it.
    pub fn next_block(&mut self, lines: &[Line], i: &mut usize, ctx: Ctx) -> Option<Block> {
        while *i < lines.len() && lines[*i].is_blank(self.src) {
            *i += 1;
        }
        if *i >= lines.len() {
            return None;
        }
        let document_start = ctx.top_level && lines[*i].raw.start == 0;

        let block = match try_open(self.src, lines, *i, document_start) {
            Some(BlockOpen::FrontMatter) => self.front_matter(lines, i),
            Some(BlockOpen::Fence(sig)) => self.fence(lines, i, sig),
            Some(BlockOpen::Math) => self.math(lines, i),
            Some(BlockOpen::MathLine(s, e)) => {
                let line = lines[*i];
                *i += 1;
                let latex = line.text(self.src)[s..e].trim().to_string();
                Block::new(BlockKind::MathBlock(latex)).with_span(line.content())
            }
            Some(BlockOpen::Table) => self.table(lines, i),
            Some(BlockOpen::Alert(kind)) => {
                let (mut inner, span) = self.quote_lines(lines, i);
                // The `[!KIND]` line belongs to the alert, not its body.
                inner.remove(0);
                let children = self.parse_blocks(&inner, quoted(ctx));
                Block::new(BlockKind::Alert { kind, children }).with_span(span)
            }
            Some(BlockOpen::Quote) => {
                let (inner, span) = self.quote_lines(lines, i);
                let children = self.parse_blocks(&inner, quoted(ctx));
                Block::new(BlockKind::BlockQuote {
                    depth: ctx.quote_depth.saturating_add(1),
                    children,
                })
                .with_span(span)
            }
            Some(BlockOpen::Details { open, after }) => self.details(lines, i, open, after, ctx),
            Some(BlockOpen::Html(end)) => self.html(lines, i, end),
            Some(BlockOpen::Footnote { label, content }) => {
                self.footnote(lines, i, label, content, ctx)
            }
            Some(BlockOpen::List(marker)) => self.list(lines, i, marker, ctx),
            Some(BlockOpen::Heading(h)) => {
                let line = lines[*i];
                *i += 1;
                let (s, e) = h.content;
                let view = ContentView::contiguous(&line.text(self.src)[s..e], line.start + s);
                let content = self.inlines(&view);
                Block::new(BlockKind::Heading {
                    level: h.level,
                    content,
                })
                .with_span(line.content())
            }
            Some(BlockOpen::ThematicBreak) => {
                let line = lines[*i];
                *i += 1;
                Block::new(BlockKind::HorizontalRule).with_span(line.content())
            }
            None => self.paragraph(lines, i),
        };
        Some(block)
    }

    fn inlines(&mut self, view: &ContentView) -> Vec<Inline> {
        let scan = parse_inline(view, self.preserve_line_breaks);
        self.degradations.extend(scan.degradations);
        scan.nodes
    }

    fn degrade(&mut self, kind: DegradationKind, span: Span) {
        log::debug!("{kind:?} at {}..{}: {:?}", span.start, span.end, preview(self.src, span, 40));
        self.degradations.push(Degradation { span, kind });
    }

    fn paragraph(&mut self, lines: &[Line], i: &mut usize) -> Block {
        let src = self.src;
        let mut run = vec![lines[*i].trim_start(src)];
        *i += 1;
        while let Some(line) = lines.get(*i) {
            if line.is_blank(src) {
                break;
            }
            let interrupted = try_open(src, lines, *i, false)
                .is_some_and(|open| open.interrupts_paragraph());
            if interrupted {
                break;
            }
            run.push(line.trim_start(src));
            *i += 1;
        }
        if let Some(last) = run.last_mut() {
            let trimmed = last.text(src).trim_end().len();
            last.end = last.start + trimmed;
        }

        let span = Span::new(run[0].start, run[run.len() - 1].end);
        let view = ContentView::from_lines(src, &run);
        let content = self.inlines(&view);
        Block::paragraph(content).with_span(span)
    }

    fn front_matter(&mut self, lines: &[Line], i: &mut usize) -> Block {
        let start = *i;
        let end = front_matter_end(self.src, lines, start).unwrap_or(lines.len() - 1);
        *i = end + 1;
        let yaml = join(self.src, &lines[start + 1..end]);
        Block::new(BlockKind::FrontMatter(yaml))
            .with_span(Span::new(lines[start].start, lines[end].end))
    }

    fn fence(&mut self, lines: &[Line], i: &mut usize, sig: FenceSig) -> Block {
        let src = self.src;
        let open = lines[*i];
        *i += 1;
        let mut code = String::new();
        let mut last = open;
        let mut closed = false;
        while let Some(line) = lines.get(*i) {
            *i += 1;
            last = *line;
            if CodeFence::closes(&sig, line.text(src)) {
                closed = true;
                break;
            }
            code.push_str(line.dedent(src, sig.indent).text(src));
            code.push('\n');
        }
        let span = Span::new(open.start, last.end);
        if !closed {
            self.degrade(DegradationKind::UnterminatedFence, span);
        }
        Block::new(BlockKind::CodeFence {
            fence: Fence {
                kind: sig.kind,
                len: sig.len,
            },
            language: (!sig.info.is_empty()).then_some(sig.info),
            code,
        })
        .with_span(span)
    }

    fn math(&mut self, lines: &[Line], i: &mut usize) -> Block {
        let src = self.src;
        let open = lines[*i];
        *i += 1;
        let body_start = *i;
        let mut last = open;
        let mut body_end = lines.len();
        while let Some(line) = lines.get(*i) {
            *i += 1;
            last = *line;
            if MathBlock::closes(line.text(src)) {
                body_end = *i - 1;
                break;
            }
        }
        let span = Span::new(open.start, last.end);
        if body_end == lines.len() {
            self.degrade(DegradationKind::UnterminatedMath, span);
        }
        Block::new(BlockKind::MathBlock(join(src, &lines[body_start..body_end]))).with_span(span)
    }

    fn table(&mut self, lines: &[Line], i: &mut usize) -> Block {
        let src = self.src;
        let header = lines[*i];
        let alignments = TableSyntax::alignments(lines[*i + 1].text(src));
        let mut row_lines = vec![header];
        *i += 2;
        while let Some(line) = lines.get(*i) {
            let text = line.text(src);
            if line.is_blank(src) || !TableSyntax::has_pipe(text) || CodeFence::sig(text).is_some()
            {
                break;
            }
            row_lines.push(*line);
            *i += 1;
        }

        let mut rows = Vec::with_capacity(row_lines.len());
        for line in &row_lines {
            let text = line.text(src);
            let mut cells = Vec::new();
            for (s, e) in TableSyntax::cells(text) {
                let at = line.start + s;
                let view = ContentView::contiguous(&text[s..e], at);
                cells.push(TableCell {
                    content: self.inlines(&view),
                    span: Some(Span::new(at, line.start + e)),
                });
            }
            // Short rows are padded with empty cells anchored at the line end.
            while cells.len() < alignments.len() {
                cells.push(TableCell {
                    content: Vec::new(),
                    span: Some(Span::new(line.end, line.end)),
                });
            }
            rows.push(TableRow {
                cells,
                span: Some(line.content()),
            });
        }

        let last = row_lines.last().copied().unwrap_or(header);
        Block::new(BlockKind::Table(Table::new(alignments, rows)))
            .with_span(Span::new(header.start, last.end))
    }

    /// Collects a blockquote's lines with one `>` level stripped.
    ///
    /// Lazy continuation: an unprefixed line that would continue a paragraph
    /// stays inside the quote.
    fn quote_lines(&mut self, lines: &[Line], i: &mut usize) -> (Vec<Line>, Span) {
        let src = self.src;
        let first = lines[*i];
        let mut inner = Vec::new();
        let mut last = first;
        while let Some(line) = lines.get(*i) {
            let text = line.text(src);
            if let Some(at) = BlockQuote::strip_one(text) {
                inner.push(line.skip(at));
            } else if !line.is_blank(src)
                && inner.last().is_some_and(|l: &Line| !l.is_blank(src))
                && ends_in_paragraph(src, &inner)
                && try_open(src, lines, *i, false).is_none()
            {
                inner.push(*line);
            } else {
                break;
            }
            last = *line;
            *i += 1;
        }
        let start = first.start + first.indent(src).min(3);
        (inner, Span::new(start, last.end))
    }

    fn details(
        &mut self,
        lines: &[Line],
        i: &mut usize,
        open: bool,
        after: usize,
        ctx: Ctx,
    ) -> Block {
        let src = self.src;
        let first = lines[*i];
        *i += 1;

        let rest = &first.text(src)[after..];
        let mut summary = HtmlSyntax::summary(rest);
        if summary.is_none()
            && let Some(s) = lines.get(*i).and_then(|l| HtmlSyntax::summary(l.text(src)))
        {
            summary = Some(s);
            *i += 1;
        }

        let body_start = *i;
        let mut nesting = 0usize;
        let mut body_end = None;
        while let Some(line) = lines.get(*i) {
            let text = line.text(src);
            if HtmlSyntax::details_open(text).is_some() {
                nesting += 1;
            } else if HtmlSyntax::is_details_close(text) {
                if nesting == 0 {
                    body_end = Some(*i);
                    *i += 1;
                    break;
                }
                nesting -= 1;
            }
            *i += 1;
        }

        let end_line = lines[*i - 1];
        let span = Span::new(first.start, end_line.end);
        let body = match body_end {
            Some(end) => &lines[body_start..end],
            None => {
                self.degrade(DegradationKind::UnclosedDetails, span);
                &lines[body_start..]
            }
        };
        let children = self.parse_blocks(body, ctx.nested());
        Block::new(BlockKind::Details {
            open,
            summary: summary.unwrap_or_default(),
            children,
        })
        .with_span(span)
    }

    fn html(&mut self, lines: &[Line], i: &mut usize, end: HtmlEnd) -> Block {
        let src = self.src;
        let start = *i;
        while let Some(line) = lines.get(*i) {
            let text = line.text(src);
            match end {
                HtmlEnd::Blank if line.is_blank(src) => break,
                HtmlEnd::Comment if text.contains(HtmlSyntax::COMMENT_CLOSE) => {
                    *i += 1;
                    break;
                }
                _ => *i += 1,
            }
        }
        let body = &lines[start..*i];
        let span = Span::new(body[0].start, body[body.len() - 1].end);
        Block::new(BlockKind::HtmlBlock(join(src, body))).with_span(span)
    }

    fn footnote(
        &mut self,
        lines: &[Line],
        i: &mut usize,
        label: String,
        content: usize,
        ctx: Ctx,
    ) -> Block {
        let src = self.src;
        let first = lines[*i];
        let mut inner = vec![first.skip(content)];
        *i += 1;
        self.continuation(lines, i, 4, &mut inner);

        let last = inner.iter().rev().find(|l| !l.is_blank(src)).copied().unwrap_or(first);
        let children = self.parse_blocks(&inner, ctx.nested());
        Block::new(BlockKind::FootnoteDefinition { label, children })
            .with_span(Span::new(first.start, last.end.max(first.end)))
    }

    /// Collects the continuation lines of a container item whose content
    /// starts at column `indent`: indented lines, blank lines followed by
    /// indented lines, and lazy paragraph continuations.
    ///
    /// Returns true if a blank line was absorbed.
    fn continuation(
        &mut self,
        lines: &[Line],
        i: &mut usize,
        indent: usize,
        inner: &mut Vec<Line>,
    ) -> bool {
        let src = self.src;
        let mut saw_blank = false;
        while let Some(line) = lines.get(*i) {
            if line.is_blank(src) {
                let next = (*i..lines.len()).find(|&k| !lines[k].is_blank(src));
                match next {
                    Some(k) if lines[k].indent(src) >= indent => {
                        inner.extend(lines[*i..k].iter().map(|l| l.dedent(src, indent)));
                        saw_blank = true;
                        *i = k;
                        continue;
                    }
                    _ => break,
                }
            }
            if line.indent(src) >= indent {
                inner.push(line.dedent(src, indent));
            } else if inner.last().is_some_and(|l| !l.is_blank(src))
                && ends_in_paragraph(src, inner)
                && try_open(src, lines, *i, false).is_none()
            {
                inner.push(line.trim_start(src));
            } else {
                break;
            }
            *i += 1;
        }
        saw_blank
    }

    fn list(&mut self, lines: &[Line], i: &mut usize, first: ListMarker, ctx: Ctx) -> Block {
        let src = self.src;
        let mut items = Vec::new();
        let mut tight = true;
        let mut any_checkbox = false;
        let mut marker = first;
        let list_start = lines[*i].start + first.indent;

        loop {
            let line = lines[*i];
            let mut first_line = line.skip(marker.content);
            // An empty item's content column sits one space past the marker.
            let content_col = if first_line.is_blank(src) {
                marker.content + 1
            } else {
                marker.content
            };

            let checked = ListItemSyntax::checkbox(first_line.text(src)).map(|(checked, n)| {
                first_line = first_line.skip(n);
                checked
            });
            any_checkbox |= checked.is_some();

            let mut inner = vec![first_line];
            *i += 1;
            if self.continuation(lines, i, content_col, &mut inner) {
                tight = false;
            }

            let item_end = inner
                .iter()
                .rev()
                .find(|l| !l.is_blank(src))
                .map_or(line.end, |l| l.end.max(line.end));
            let children = self.parse_blocks(
                &inner,
                Ctx {
                    list_depth: ctx.list_depth + 1,
                    ..ctx.nested()
                },
            );
            items.push(ListItem {
                checked,
                children,
                span: Some(Span::new(line.start + marker.indent, item_end)),
            });

            // Next sibling, possibly after blank lines (which loosen the list).
            let next = (*i..lines.len()).find(|&k| !lines[k].is_blank(src));
            match next.and_then(|k| sibling(src, &lines[k], &first).map(|m| (k, m))) {
                Some((k, m)) => {
                    if k > *i {
                        tight = false;
                    }
                    *i = k;
                    marker = m;
                }
                None => break,
            }
        }

        let kind = if first.ordered() {
            ListKind::Ordered
        } else if any_checkbox {
            ListKind::Task
        } else {
            ListKind::Unordered
        };
        let list_end = items
            .last()
            .and_then(|item| item.span)
            .map_or(list_start, |s| s.end);
        let mut list = List::new(kind, ctx.list_depth, first.number.unwrap_or(1), items);
        list.marker = first.marker;
        list.tight = tight;
        Block::new(BlockKind::List(list)).with_span(Span::new(list_start, list_end))
    }
}

fn quoted(ctx: Ctx) -> Ctx {
    Ctx {
        quote_depth: ctx.quote_depth.saturating_add(1),
        ..ctx.nested()
    }
}

/// A marker that continues the list opened by `first`.
fn sibling(src: &str, line: &Line, first: &ListMarker) -> Option<ListMarker> {
    let text = line.text(src);
    if ThematicBreak::matches(text) {
        return None;
    }
    let m = ListItemSyntax::marker(text)?;
    (m.same_list(first) && m.indent < first.content).then_some(m)
}

/// Whether the last non-blank collected line is paragraph text, so a lazy
/// continuation line may join it.
fn ends_in_paragraph(src: &str, inner: &[Line]) -> bool {
    let Some(idx) = inner.iter().rposition(|l| !l.is_blank(src)) else {
        return false;
    };
    let text = inner[idx].text(src);
    CodeFence::sig(text).is_none() && !ThematicBreak::matches(text) && !MathBlock::opens(text)
}

fn join(src: &str, lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| l.text(src))
        .collect::<Vec<_>>()
        .join("\n")
}
