use crate::{
    model::{BreakStyle, Degradation, DegradationKind, Inline, InlineKind, Mark, Marks, plain_text},
    parsing::blocks::{ContentView, kinds::Footnote},
};

use super::{
    cursor::Cursor,
    kinds::{AngleSyntax, CodeSpan, Delimiter, InlineMath, LinkSyntax, WikiLink},
    types::{Construct, ConstructKind, InlineScan, MarkPair},
};

/// Parses a run of inline content.
///
/// Resolution order at any position: escapes, code spans, images/links,
/// wiki links/embeds, inline math, footnote references, delimiter runs,
/// autolinks/raw HTML. Anything that fails to parse stays literal text.
pub fn parse_inline(view: &ContentView, preserve_line_breaks: bool) -> InlineScan {
    let mut scanner = Scanner {
        view,
        text: &view.text,
        preserve_line_breaks,
        pairs: Vec::new(),
        constructs: Vec::new(),
        degradations: Vec::new(),
    };
    let nodes = scanner.scan(0, view.text.len(), false);

    InlineScan {
        nodes,
        pairs: scanner.pairs,
        constructs: scanner.constructs,
        degradations: scanner.degradations,
    }
}

#[derive(Debug)]
enum Piece {
    Text {
        start: usize,
        end: usize,
        text: String,
    },
    Atom {
        start: usize,
        end: usize,
        node: Inline,
    },
    Delim(DelimRun),
}

#[derive(Debug, Clone, Copy)]
struct DelimRun {
    ch: u8,
    start: usize,
    len: usize,
    can_open: bool,
    can_close: bool,
    /// Characters consumed from the end of the run by openers.
    open_used: usize,
    /// Characters consumed from the start of the run by closers.
    close_used: usize,
}

impl DelimRun {
    fn remaining(&self) -> usize {
        self.len - self.open_used - self.close_used
    }
}

struct Scanner<'a> {
    view: &'a ContentView,
    text: &'a str,
    preserve_line_breaks: bool,
    pairs: Vec<MarkPair>,
    constructs: Vec<Construct>,
    degradations: Vec<Degradation>,
}

impl Scanner<'_> {
    /// Scans `[start, end)` of the content into inline nodes.
    fn scan(&mut self, start: usize, end: usize, in_link: bool) -> Vec<Inline> {
        let mut pieces = self.tokenize(start, end, in_link);
        let matched = self.resolve(&mut pieces);
        self.build(pieces, &matched)
    }

    fn tokenize(&mut self, start: usize, end: usize, in_link: bool) -> Vec<Piece> {
        let text = self.text;
        let mut pieces = Vec::new();
        let mut cur = Cursor::starting_at(&text[..end], start);
        let mut lit = start;

        while let Some(c) = cur.peek() {
            let p = cur.i;
            match c {
                b'\\' => match cur.peek_at(1) {
                    Some(b'\n') => {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(atom(p, p + 2, InlineKind::HardBreak(BreakStyle::Backslash)));
                        cur.bump_n(2);
                        lit = cur.i;
                    }
                    Some(n) if n.is_ascii_punctuation() => {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(Piece::Text {
                            start: p,
                            end: p + 2,
                            text: (n as char).to_string(),
                        });
                        cur.bump_n(2);
                        lit = cur.i;
                    }
                    _ => {
                        cur.bump();
                    }
                },
                CodeSpan::TICK => {
                    let run = cur.run_of(CodeSpan::TICK);
                    match CodeSpan::find_close(&text[..end], p + run, run) {
                        Some(close) => {
                            flush(&mut pieces, text, lit, p);
                            let content = CodeSpan::normalize(&text[p + run..close]);
                            pieces.push(Piece::Atom {
                                start: p,
                                end: close + run,
                                node: Inline::code(content),
                            });
                            self.construct(ConstructKind::Code, (p, close + run), (p + run, close));
                            cur.jump_to(close + run);
                            lit = cur.i;
                        }
                        None => {
                            log::debug!("unclosed code span at {p}");
                            self.degrade(DegradationKind::UnclosedCodeSpan, p, p + run);
                            cur.bump_n(run);
                        }
                    }
                }
                LinkSyntax::IMAGE if cur.peek_at(1) == Some(LinkSyntax::OPEN) => {
                    if let Some(m) = (cur.peek_at(2) == Some(LinkSyntax::OPEN))
                        .then(|| WikiLink::parse(text, p + 1, end))
                        .flatten()
                    {
                        flush(&mut pieces, text, lit, p);
                        let target = text[m.inner.0..m.inner.1].trim().to_string();
                        pieces.push(atom(p, m.end, InlineKind::WikiEmbed { target }));
                        self.construct(ConstructKind::WikiEmbed, (p, m.end), m.inner);
                        cur.jump_to(m.end);
                        lit = cur.i;
                    } else if let Some((node, close, tail_end)) = self.try_link(p + 1, end, true) {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(Piece::Atom {
                            start: p,
                            end: tail_end,
                            node,
                        });
                        self.construct(ConstructKind::Image, (p, tail_end), (p + 2, close));
                        cur.jump_to(tail_end);
                        lit = cur.i;
                    } else {
                        cur.bump();
                    }
                }
                LinkSyntax::OPEN => {
                    if let Some((node, close, tail_end)) =
                        (!in_link).then(|| self.try_link(p, end, false)).flatten()
                    {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(Piece::Atom {
                            start: p,
                            end: tail_end,
                            node,
                        });
                        self.construct(ConstructKind::Link, (p, tail_end), (p + 1, close));
                        cur.jump_to(tail_end);
                        lit = cur.i;
                    } else if let Some(m) = WikiLink::parse(text, p, end) {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(atom(
                            p,
                            m.end,
                            InlineKind::WikiLink {
                                target: m.target,
                                display: m.display,
                            },
                        ));
                        self.construct(ConstructKind::WikiLink, (p, m.end), m.inner);
                        cur.jump_to(m.end);
                        lit = cur.i;
                    } else if let Some(len) = footnote_label(text, p, end) {
                        flush(&mut pieces, text, lit, p);
                        let label = text[p + 2..p + 2 + len].to_string();
                        let close = p + 2 + len + 1;
                        pieces.push(atom(p, close, InlineKind::FootnoteRef { label }));
                        self.construct(ConstructKind::FootnoteRef, (p, close), (p + 2, close - 1));
                        cur.jump_to(close);
                        lit = cur.i;
                    } else {
                        if !text[p..end].contains(LinkSyntax::CLOSE as char) {
                            log::debug!("unmatched bracket at {p}");
                            self.degrade(DegradationKind::UnmatchedBracket, p, p + 1);
                        }
                        cur.bump();
                    }
                }
                InlineMath::DOLLAR => {
                    if cur.peek_at(1) == Some(InlineMath::DOLLAR) {
                        cur.bump_n(2);
                    } else if let Some(close) = InlineMath::find_close(text, p, end) {
                        flush(&mut pieces, text, lit, p);
                        let latex = text[p + 1..close].to_string();
                        pieces.push(atom(p, close + 1, InlineKind::Math(latex)));
                        self.construct(ConstructKind::Math, (p, close + 1), (p + 1, close));
                        cur.jump_to(close + 1);
                        lit = cur.i;
                    } else {
                        cur.bump();
                    }
                }
                AngleSyntax::OPEN => {
                    let rest = &text[p..end];
                    if let Some((href, len)) = AngleSyntax::autolink(rest) {
                        flush(&mut pieces, text, lit, p);
                        let inner = (p + 1, p + len - 1);
                        let label = Inline::text(href.clone())
                            .with_span(self.view.span(inner.0, inner.1));
                        pieces.push(atom(
                            p,
                            p + len,
                            InlineKind::Link {
                                href,
                                title: None,
                                children: vec![label],
                                autolink: true,
                            },
                        ));
                        self.construct(ConstructKind::Link, (p, p + len), inner);
                        cur.jump_to(p + len);
                        lit = cur.i;
                    } else if let Some(len) = AngleSyntax::raw_html(rest) {
                        flush(&mut pieces, text, lit, p);
                        pieces.push(atom(p, p + len, InlineKind::Html(rest[..len].to_string())));
                        cur.jump_to(p + len);
                        lit = cur.i;
                    } else {
                        cur.bump();
                    }
                }
                b'\n' => {
                    let pending = &text[lit..p];
                    let spaces = pending.len() - pending.trim_end_matches(' ').len();
                    let style = if spaces >= 2 {
                        Some(BreakStyle::Spaces)
                    } else if self.preserve_line_breaks {
                        Some(BreakStyle::Newline)
                    } else {
                        None
                    };
                    match style {
                        Some(style) => {
                            flush(&mut pieces, text, lit, p - spaces);
                            pieces.push(atom(p - spaces, p + 1, InlineKind::HardBreak(style)));
                            cur.bump();
                            lit = cur.i;
                        }
                        None => {
                            cur.bump();
                        }
                    }
                }
                c if Delimiter::is_delimiter(c) => {
                    let run = cur.run_of(c);
                    if !Delimiter::valid_run(c, run) {
                        cur.bump_n(run);
                        continue;
                    }
                    flush(&mut pieces, text, lit, p);
                    let before = text[..p].chars().next_back();
                    let after = text[p + run..].chars().next();
                    let (can_open, can_close) = Delimiter::flanking(c, before, after);
                    log::trace!(
                        "delimiter run {:?}x{run} at {p}: open={can_open} close={can_close}",
                        c as char
                    );
                    pieces.push(Piece::Delim(DelimRun {
                        ch: c,
                        start: p,
                        len: run,
                        can_open,
                        can_close,
                        open_used: 0,
                        close_used: 0,
                    }));
                    cur.bump_n(run);
                    lit = cur.i;
                }
                _ => {
                    cur.bump();
                }
            }
        }
        flush(&mut pieces, text, lit, end);
        pieces
    }

    /// `[text](href)` when `image` is false, `![alt](src)` (with `open` at the `[`) otherwise.
    ///
    /// Returns the node, the index of the closing `]`, and the end of the construct.
    fn try_link(&mut self, open: usize, end: usize, image: bool) -> Option<(Inline, usize, usize)> {
        let close = LinkSyntax::matching_close(self.text, open, end)?;
        let tail = LinkSyntax::tail(self.text, close + 1, end)?;
        let children = self.scan(open + 1, close, true);
        let kind = if image {
            InlineKind::Image {
                src: tail.href,
                alt: plain_text(&children),
                title: tail.title,
            }
        } else {
            InlineKind::Link {
                href: tail.href,
                title: tail.title,
                children,
                autolink: false,
            }
        };
        Some((Inline::new(kind), close, tail.end))
    }

    /// Pairs delimiter runs, closers left to right against the nearest opener.
    ///
    /// Returns `(opener piece, closer piece, mark)` for every pair.
    fn resolve(&mut self, pieces: &mut [Piece]) -> Vec<(usize, usize, Mark)> {
        let mut matched = Vec::new();
        for c in 0..pieces.len() {
            loop {
                let Some(closer) = delim(pieces, c) else { break };
                if !closer.can_close || closer.remaining() == 0 {
                    break;
                }
                let found = (0..c).rev().find_map(|o| {
                    let op = delim(pieces, o)?;
                    if op.ch != closer.ch || !op.can_open || op.remaining() == 0 {
                        return None;
                    }
                    Delimiter::pair(op.ch, op.remaining(), closer.remaining())
                        .map(|(k, mark)| (o, k, mark))
                });
                let Some((o, k, mark)) = found else { break };

                let (open_span, close_span) = {
                    let op = delim_mut(pieces, o);
                    let op_end = op.start + op.len - op.open_used;
                    op.open_used += k;
                    let open_span = (op_end - k, op_end);

                    let cl = delim_mut(pieces, c);
                    let cl_start = cl.start + cl.close_used;
                    cl.close_used += k;
                    (open_span, (cl_start, cl_start + k))
                };
                self.pairs.push(MarkPair {
                    mark,
                    open: self.view.span(open_span.0, open_span.1),
                    close: self.view.span(close_span.0, close_span.1),
                });
                matched.push((o, c, mark));

                // Runs between a matched pair can no longer pair with anything.
                for piece in &mut pieces[o + 1..c] {
                    if let Piece::Delim(d) = piece {
                        d.can_open = false;
                        d.can_close = false;
                    }
                }
            }
        }
        matched
    }

    fn build(&mut self, pieces: Vec<Piece>, matched: &[(usize, usize, Mark)]) -> Vec<Inline> {
        let mut depth = vec![[0i32; Mark::ALL.len()]; pieces.len() + 1];
        for &(o, c, mark) in matched {
            depth[o + 1][mark as usize] += 1;
            depth[c][mark as usize] -= 1;
        }

        let mut out: Vec<(usize, usize, Inline)> = Vec::with_capacity(pieces.len());
        let mut running = [0i32; Mark::ALL.len()];
        for (i, piece) in pieces.into_iter().enumerate() {
            for (r, d) in running.iter_mut().zip(depth[i]) {
                *r += d;
            }
            let marks = Marks::of(
                &Mark::ALL
                    .into_iter()
                    .filter(|m| running[*m as usize] > 0)
                    .collect::<Vec<_>>(),
            );

            let (start, end, mut node) = match piece {
                Piece::Text { start, end, text } => (start, end, Inline::text(text)),
                Piece::Atom { start, end, node } => (start, end, node),
                Piece::Delim(d) => {
                    let s = d.start + d.close_used;
                    let e = d.start + d.len - d.open_used;
                    if s >= e {
                        continue;
                    }
                    (s, e, Inline::text(&self.text[s..e]))
                }
            };
            node.marks = node.marks.union(marks);

            if let Some((_, prev_end, prev)) = out.last_mut()
                && *prev_end == start
                && prev.marks == node.marks
                && !node.marks.contains(Mark::Code)
                && let (InlineKind::Text(a), InlineKind::Text(b)) = (&mut prev.kind, &node.kind)
            {
                a.push_str(b);
                *prev_end = end;
                continue;
            }
            out.push((start, end, node));
        }

        out.into_iter()
            .map(|(start, end, node)| node.with_span(self.view.span(start, end)))
            .collect()
    }

    fn construct(&mut self, kind: ConstructKind, span: (usize, usize), content: (usize, usize)) {
        self.constructs.push(Construct {
            kind,
            span: self.view.span(span.0, span.1),
            content: self.view.span(content.0, content.1),
        });
    }

    fn degrade(&mut self, kind: DegradationKind, start: usize, end: usize) {
        self.degradations.push(Degradation {
            span: self.view.span(start, end),
            kind,
        });
    }
}

fn atom(start: usize, end: usize, kind: InlineKind) -> Piece {
    Piece::Atom {
        start,
        end,
        node: Inline::new(kind),
    }
}

fn flush(pieces: &mut Vec<Piece>, text: &str, start: usize, end: usize) {
    if start < end {
        pieces.push(Piece::Text {
            start,
            end,
            text: text[start..end].to_string(),
        });
    }
}

fn delim(pieces: &[Piece], i: usize) -> Option<DelimRun> {
    match pieces.get(i) {
        Some(Piece::Delim(d)) => Some(*d),
        _ => None,
    }
}

fn delim_mut(pieces: &mut [Piece], i: usize) -> &mut DelimRun {
    match &mut pieces[i] {
        Piece::Delim(d) => d,
        _ => unreachable!("resolve only pairs delimiter pieces"),
    }
}

/// `[^label]` at `p`; returns the label length.
fn footnote_label(text: &str, p: usize, end: usize) -> Option<usize> {
    let rest = &text[p..end];
    let after = rest.strip_prefix(Footnote::OPEN)?;
    Footnote::label_len(after)
}
