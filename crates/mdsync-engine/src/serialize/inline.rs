//! Inline emission: mark stack, escaping and span assignment.

use crate::{
    model::{BreakStyle, Inline, InlineKind, Mark, Marks, Span},
    parsing::blocks::kinds::{
        BlockQuote, CodeFence, Footnote, Heading, HtmlSyntax, ListItemSyntax, MathBlock,
        ThematicBreak,
    },
};

use super::{HardBreakStyle, SerializeOptions, writer::MdWriter};

/// Where a run of inlines is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineMode {
    /// Paragraph text; may span lines.
    Flow,
    /// Heading text; one line.
    Heading,
    /// Table cell; one line, `|` escaped.
    Cell,
}

impl InlineMode {
    fn single_line(self) -> bool {
        self != InlineMode::Flow
    }
}

/// Writes `inlines` and assigns each node the span of its output.
///
/// Marks are opened and closed with a stack so shared marks stay open across
/// neighbouring nodes: `**a *b***` rather than `**a*****b***`.
pub fn emit_inlines(
    w: &mut MdWriter,
    inlines: &mut Vec<Inline>,
    opts: &SerializeOptions,
    mode: InlineMode,
) {
    *inlines = normalize_runs(std::mem::take(inlines));

    let mut stack: Vec<Mark> = Vec::new();
    for node in inlines.iter_mut() {
        let target = node.marks.without(Mark::Code);
        if let Some(pos) = stack.iter().position(|m| !target.contains(*m)) {
            while stack.len() > pos {
                if let Some(m) = stack.pop() {
                    w.write(m.delimiter());
                }
            }
        }
        for m in target.iter() {
            if !stack.contains(&m) {
                w.write(m.delimiter());
                stack.push(m);
            }
        }
        emit_node(w, node, opts, mode);
    }
    while let Some(m) = stack.pop() {
        w.write(m.delimiter());
    }
}

fn emit_node(w: &mut MdWriter, node: &mut Inline, opts: &SerializeOptions, mode: InlineMode) {
    let start = w.content_start();
    match &mut node.kind {
        InlineKind::Text(s) if node.marks.contains(Mark::Code) => w.write(&code_span(s)),
        InlineKind::Text(s) => emit_text(w, s, mode),
        InlineKind::Link {
            href,
            title,
            children,
            autolink,
        } => {
            if *autolink {
                w.write("<");
                let at = w.content_start();
                w.write(href);
                let label = Inline::text(href.clone()).with_span(Span::new(at, w.content_end()));
                *children = vec![label];
                w.write(">");
            } else {
                w.write("[");
                emit_inlines(w, children, opts, mode);
                w.write("](");
                w.write(&destination(href, title.as_deref()));
                w.write(")");
            }
        }
        InlineKind::Image { src, alt, title } => {
            w.write("![");
            w.write(&escape(alt, mode));
            w.write("](");
            w.write(&destination(src, title.as_deref()));
            w.write(")");
        }
        InlineKind::WikiLink { target, display } => match display {
            Some(d) => w.write(&format!("[[{target}|{d}]]")),
            None => w.write(&format!("[[{target}]]")),
        },
        InlineKind::WikiEmbed { target } => w.write(&format!("![[{target}]]")),
        InlineKind::FootnoteRef { label } => w.write(&format!("{}{label}]", Footnote::OPEN)),
        InlineKind::Math(latex) => w.write(&format!("${latex}$")),
        InlineKind::Html(raw) => w.write_lines(raw),
        InlineKind::HardBreak(style) => {
            if mode.single_line() {
                w.write(" ");
            } else {
                let keep_newline = *style == BreakStyle::Newline && opts.preserve_line_breaks;
                if !keep_newline {
                    w.write(hard_break_marker(*style, opts.hard_break_style));
                }
                w.newline();
                node.span = Some(Span::new(start, w.offset()));
                return;
            }
        }
    }
    node.span = Some(Span::new(start, w.content_end().max(start)));
}

fn hard_break_marker(original: BreakStyle, style: HardBreakStyle) -> &'static str {
    let backslash = match style {
        HardBreakStyle::Backslash => true,
        HardBreakStyle::Spaces => false,
        HardBreakStyle::Auto => original == BreakStyle::Backslash,
    };
    if backslash { "\\" } else { "  " }
}

fn emit_text(w: &mut MdWriter, s: &str, mode: InlineMode) {
    if mode.single_line() {
        let flat = s.replace('\n', " ");
        let mut out = escape(&flat, mode);
        if w.at_line_start() {
            out = escape_line_start(out.trim_start());
        }
        w.write(&out);
        return;
    }

    let segments: Vec<&str> = s.split('\n').collect();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            w.newline();
        }
        // Trailing spaces before a soft break would read back as a hard break.
        let seg = if i + 1 < segments.len() {
            seg.trim_end()
        } else {
            seg
        };
        let mut out = escape(seg, mode);
        if w.at_line_start() {
            out = escape_line_start(out.trim_start());
        }
        w.write(&out);
    }
}

/// Backslash-escapes characters that would otherwise start inline syntax.
pub fn escape(s: &str, mode: InlineMode) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let needs = match c {
            '\\' | '`' | '*' | '[' | ']' | '$' | '<' | '~' | '^' => true,
            '_' => {
                let intraword = prev.is_some_and(char::is_alphanumeric)
                    && next.is_some_and(char::is_alphanumeric);
                !intraword
            }
            '=' => prev == Some('=') || next == Some('='),
            '|' => mode == InlineMode::Cell,
            '#' => mode == InlineMode::Heading,
            _ => false,
        };
        if needs {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes a line that would otherwise be read as the start of a block.
fn escape_line_start(line: &str) -> String {
    if !opens_block(line) {
        return line.to_string();
    }
    // `1. x` escapes the delimiter, everything else its first character.
    let at = line.bytes().take_while(u8::is_ascii_digit).count();
    let mut out = String::with_capacity(line.len() + 1);
    out.push_str(&line[..at]);
    out.push('\\');
    out.push_str(&line[at..]);
    out
}

fn opens_block(line: &str) -> bool {
    Heading::parse(line).is_some()
        || BlockQuote::strip_one(line).is_some()
        || ThematicBreak::matches(line)
        || ListItemSyntax::marker(line).is_some()
        || Footnote::definition(line).is_some()
        || HtmlSyntax::block_start(line).is_some()
        || HtmlSyntax::details_open(line).is_some()
        || CodeFence::sig(line).is_some()
        || MathBlock::opens(line)
        || MathBlock::single_line(line).is_some()
}

/// Backtick-delimited code, with a fence longer than any run inside.
fn code_span(s: &str) -> String {
    let s = s.replace('\n', " ");
    if s.is_empty() {
        return String::new();
    }
    let longest = s.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let ticks = "`".repeat(longest + 1);
    let pad = s.starts_with('`')
        || s.ends_with('`')
        || (s.starts_with(' ') && s.ends_with(' ') && !s.trim().is_empty());
    let pad = if pad { " " } else { "" };
    format!("{ticks}{pad}{s}{pad}{ticks}")
}

/// `href "title"` as written between the parentheses of a link.
fn destination(href: &str, title: Option<&str>) -> String {
    let mut out = if href.is_empty() || href.contains(char::is_whitespace) {
        format!("<{href}>")
    } else {
        let mut d = String::with_capacity(href.len());
        for c in href.chars() {
            if matches!(c, '(' | ')' | '\\' | '<') {
                d.push('\\');
            }
            d.push(c);
        }
        d
    };
    if let Some(t) = title {
        out.push_str(" \"");
        for c in t.chars() {
            if matches!(c, '"' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    }
    out
}

/// Prepares a run for emission: whitespace at the edge of a marked text run
/// moves outside the mark (delimiters must not touch whitespace on their
/// inner side), hard breaks only keep marks shared with what precedes them,
/// and adjacent text with equal marks is merged.
fn normalize_runs(nodes: Vec<Inline>) -> Vec<Inline> {
    let marks: Vec<Marks> = nodes.iter().map(|n| n.marks).collect();
    let mut split = Vec::with_capacity(nodes.len());
    for (i, mut node) in nodes.into_iter().enumerate() {
        let prev = i.checked_sub(1).map_or(Marks::NONE, |p| marks[p]);
        let next = marks.get(i + 1).copied().unwrap_or(Marks::NONE);
        match &node.kind {
            InlineKind::HardBreak(_) => {
                node.marks = node.marks.intersection(prev);
                split.push(node);
            }
            InlineKind::Text(s) if !node.marks.is_empty() && !node.marks.contains(Mark::Code) => {
                let core = s.trim();
                if core.is_empty() {
                    node.marks = node.marks.intersection(prev);
                    split.push(node);
                    continue;
                }
                let lead = &s[..s.len() - s.trim_start().len()];
                let trail = &s[s.trim_end().len()..];
                if !lead.is_empty() {
                    split.push(Inline::marked(lead, node.marks.intersection(prev)));
                }
                split.push(Inline::marked(core, node.marks));
                if !trail.is_empty() {
                    split.push(Inline::marked(trail, node.marks.intersection(next)));
                }
            }
            InlineKind::Text(s) if s.is_empty() => {}
            _ => split.push(node),
        }
    }

    let mut out: Vec<Inline> = Vec::with_capacity(split.len());
    for node in split {
        if let Some(prev) = out.last_mut()
            && prev.marks == node.marks
            && !node.marks.contains(Mark::Code)
            && let (InlineKind::Text(a), InlineKind::Text(b)) = (&mut prev.kind, &node.kind)
        {
            a.push_str(b);
            continue;
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn render(mut inlines: Vec<Inline>) -> String {
        let mut w = MdWriter::new();
        emit_inlines(&mut w, &mut inlines, &SerializeOptions::default(), InlineMode::Flow);
        w.finish()
    }

    #[rstest]
    #[case("a*b", "a\\*b")]
    #[case("snake_case", "snake_case")]
    #[case("_lead", "\\_lead")]
    #[case("a = b", "a = b")]
    #[case("a == b", "a \\=\\= b")]
    #[case("costs $5", "costs \\$5")]
    #[case("[x]", "\\[x\\]")]
    fn escapes_inline_syntax(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(render(vec![Inline::text(text)]), expected);
    }

    #[rstest]
    #[case("# not a heading", "\\# not a heading")]
    #[case("- not a list", "\\- not a list")]
    #[case("1. not a list", "1\\. not a list")]
    #[case("> not a quote", "\\> not a quote")]
    #[case("plain", "plain")]
    fn escapes_block_openers_at_line_start(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(render(vec![Inline::text(text)]), expected);
    }

    #[test]
    fn shared_marks_stay_open() {
        let out = render(vec![
            Inline::marked("a ", Marks::of(&[Mark::Bold])),
            Inline::marked("b", Marks::of(&[Mark::Bold, Mark::Italic])),
        ]);
        assert_eq!(out, "**a *b***");
    }

    #[test]
    fn edge_whitespace_moves_outside_marks() {
        let out = render(vec![
            Inline::marked("bold ", Marks::of(&[Mark::Bold])),
            Inline::text("plain"),
        ]);
        assert_eq!(out, "**bold** plain");
    }

    #[rstest]
    #[case("x", "`x`")]
    #[case("a`b", "``a`b``")]
    #[case("`x", "`` `x ``")]
    fn code_spans(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(render(vec![Inline::code(code)]), expected);
    }

    #[test]
    fn link_destination_and_title() {
        let link = Inline::new(InlineKind::Link {
            href: "a b".into(),
            title: Some("say \"hi\"".into()),
            children: vec![Inline::text("t")],
            autolink: false,
        });
        assert_eq!(render(vec![link]), "[t](<a b> \"say \\\"hi\\\"\")");
    }

    #[rstest]
    #[case(HardBreakStyle::Auto, BreakStyle::Backslash, "a\\\nb")]
    #[case(HardBreakStyle::Auto, BreakStyle::Spaces, "a  \nb")]
    #[case(HardBreakStyle::Backslash, BreakStyle::Spaces, "a\\\nb")]
    #[case(HardBreakStyle::Spaces, BreakStyle::Backslash, "a  \nb")]
    fn hard_break_styles(
        #[case] style: HardBreakStyle,
        #[case] original: BreakStyle,
        #[case] expected: &str,
    ) {
        let opts = SerializeOptions {
            hard_break_style: style,
            ..SerializeOptions::default()
        };
        let mut inlines = vec![
            Inline::text("a"),
            Inline::new(InlineKind::HardBreak(original)),
            Inline::text("b"),
        ];
        let mut w = MdWriter::new();
        emit_inlines(&mut w, &mut inlines, &opts, InlineMode::Flow);
        let out = w.finish();
        assert_eq!(out, expected);
        // the break spans its marker and the newline
        let after_newline = expected.find('\n').map_or(0, |n| n + 1);
        assert_eq!(inlines[1].span, Some(Span::new(1, after_newline)));
    }

    #[test]
    fn spans_point_into_output() {
        let mut inlines = vec![
            Inline::text("See"),
            Inline::footnote_ref("1"),
            Inline::marked("bold", Marks::of(&[Mark::Bold])),
        ];
        let mut w = MdWriter::new();
        emit_inlines(&mut w, &mut inlines, &SerializeOptions::default(), InlineMode::Flow);
        assert_eq!(w.finish(), "See[^1]**bold**");
        let spans: Vec<_> = inlines.iter().map(|i| i.span).collect();
        assert_eq!(
            spans,
            vec![
                Some(Span::new(0, 3)),
                Some(Span::new(3, 7)),
                Some(Span::new(9, 13)),
            ]
        );
    }
}
