//! Tests for the parsing module.
//!
//! Tree shapes are checked with inline `insta` snapshots of the outline dump;
//! every parse also runs through the span invariants in [`invariants`].


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{
    model::{
        AlertKind, Alignment, Block, BlockKind, BreakStyle, DegradationKind, Document, Inline,
        InlineKind, ListKind, Mark, Marks, Span, outline,
    },
    parsing::{ParseOptions, YieldingParse, parse},
};

fn md(text: &str) -> Document {
    let doc = parse(text, &ParseOptions::default());
    invariants::check(text, &doc);
    doc
}

fn only_block(doc: &Document) -> &Block {
    assert_eq!(doc.blocks.len(), 1, "expected one block: {doc:#?}");
    &doc.blocks[0]
}

fn inlines(text: &str) -> Vec<Inline> {
    let doc = md(text);
    match &only_block(&doc).kind {
        BlockKind::Paragraph(content) => content.clone(),
        other => panic!("expected paragraph, got {other:?}"),
    }
}

fn text_of(i: &Inline) -> &str {
    match &i.kind {
        InlineKind::Text(s) => s,
        other => panic!("expected text, got {other:?}"),
    }
}

// Whole-document shapes

#[test]
fn heading_paragraph_and_footnote() {
    let doc = md("# Title\n\nSee[^1] note.\n\n[^1]: ref");
    insta::assert_snapshot!(outline(&doc), @r#"
    Heading(1) @0..7
      Text "Title" @2..7
    Paragraph @9..22
      Text "See" @9..12
      FootnoteRef "1" @12..16
      Text " note." @16..22
    FootnoteDefinition "1" @24..33
      Paragraph @30..33
        Text "ref" @30..33
    "#);
}

#[test]
fn emphasis_family() {
    let doc = md("**bold** and *it* ~~s~~ ==h== ^sup^ ~sub~");
    insta::assert_snapshot!(outline(&doc), @r#"
    Paragraph @0..41
      Text "bold" [Bold] @2..6
      Text " and " @8..13
      Text "it" [Italic] @14..16
      Text " " @17..18
      Text "s" [Strike] @20..21
      Text " " @23..24
      Text "h" [Highlight] @26..27
      Text " " @29..30
      Text "sup" [Superscript] @31..34
      Text " " @35..36
      Text "sub" [Subscript] @37..40
    "#);
}

#[test]
fn front_matter_then_heading() {
    let doc = md("---\ntitle: x\n---\n# H\n");
    match &doc.blocks[0].kind {
        BlockKind::FrontMatter(yaml) => assert_eq!(yaml, "title: x"),
        other => panic!("expected front matter, got {other:?}"),
    }
    assert_eq!(doc.blocks[0].span, Some(Span::new(0, 16)));
    assert!(matches!(doc.blocks[1].kind, BlockKind::Heading { level: 1, .. }));
}

#[test]
fn front_matter_only_at_document_start() {
    let doc = md("text\n\n---\na: b\n---\n");
    assert!(
        !doc.blocks
            .iter()
            .any(|b| matches!(b.kind, BlockKind::FrontMatter(_)))
    );
}

#[test]
fn fenced_code_is_lossless() {
    let doc = md("```rust\nfn x() {}\n```\n");
    match &only_block(&doc).kind {
        BlockKind::CodeFence {
            fence,
            language,
            code,
        } => {
            assert_eq!(fence.len, 3);
            assert_eq!(language.as_deref(), Some("rust"));
            assert_eq!(code, "fn x() {}\n");
        }
        other => panic!("expected fence, got {other:?}"),
    }
}

#[test]
fn unterminated_fence_runs_to_end_and_degrades() {
    let doc = md("```\ncode\nmore");
    let b = only_block(&doc);
    assert_eq!(b.span, Some(Span::new(0, 13)));
    assert_eq!(doc.degradations.len(), 1);
    assert_eq!(doc.degradations[0].kind, DegradationKind::UnterminatedFence);
}

#[test]
fn fence_content_is_not_inline_parsed() {
    let doc = md("```\n**not bold** [[x]]\n```");
    match &only_block(&doc).kind {
        BlockKind::CodeFence { code, .. } => assert_eq!(code, "**not bold** [[x]]\n"),
        other => panic!("expected fence, got {other:?}"),
    }
}

#[rstest]
#[case("$$\nx^2\n$$", "x^2")]
#[case("$$ a + b $$", "a + b")]
fn display_math(#[case] input: &str, #[case] latex: &str) {
    let doc = md(input);
    match &only_block(&doc).kind {
        BlockKind::MathBlock(s) => assert_eq!(s, latex),
        other => panic!("expected math block, got {other:?}"),
    }
}

#[test]
fn table_alignment_and_padding() {
    let doc = md("| a | b |\n|:--|--:|\n| 1 |\n");
    match &only_block(&doc).kind {
        BlockKind::Table(t) => {
            assert_eq!(t.alignments, vec![Alignment::Left, Alignment::Right]);
            assert_eq!(t.rows.len(), 2);
            assert!(t.is_rectangular());
            assert_eq!(text_of(&t.rows[1].cells[0].content[0]), "1");
            assert!(t.rows[1].cells[1].content.is_empty());
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn pipes_without_separator_are_a_paragraph() {
    let doc = md("a | b\nc | d");
    assert!(matches!(only_block(&doc).kind, BlockKind::Paragraph(_)));
}

#[test]
fn nested_quotes_track_depth() {
    let doc = md("> a\n> > b");
    insta::assert_snapshot!(outline(&doc), @r#"
    BlockQuote(1) @0..9
      Paragraph @2..3
        Text "a" @2..3
      BlockQuote(2) @6..9
        Paragraph @8..9
          Text "b" @8..9
    "#);
}

#[test]
fn lazy_quote_continuation() {
    let doc = md("> a\nb");
    match &only_block(&doc).kind {
        BlockKind::BlockQuote { children, .. } => match &children[0].kind {
            BlockKind::Paragraph(content) => {
                assert_eq!(text_of(&content[0]), "a\nb");
            }
            other => panic!("expected paragraph, got {other:?}"),
        },
        other => panic!("expected quote, got {other:?}"),
    }
}

#[test]
fn alert_drops_marker_line() {
    let doc = md("> [!WARNING]\n> Careful");
    match &only_block(&doc).kind {
        BlockKind::Alert { kind, children } => {
            assert_eq!(*kind, AlertKind::Warning);
            assert_eq!(children.len(), 1);
            assert!(matches!(children[0].kind, BlockKind::Paragraph(_)));
        }
        other => panic!("expected alert, got {other:?}"),
    }
}

#[test]
fn details_block_with_summary() {
    let doc = md("<details open>\n<summary>More</summary>\n\nHidden text\n\n</details>\n");
    match &only_block(&doc).kind {
        BlockKind::Details {
            open,
            summary,
            children,
        } => {
            assert!(*open);
            assert_eq!(summary, "More");
            assert_eq!(children.len(), 1);
        }
        other => panic!("expected details, got {other:?}"),
    }
    assert!(doc.degradations.is_empty());
}

#[test]
fn unclosed_details_degrades() {
    let doc = md("<details>\n<summary>S</summary>\nbody\n");
    assert!(matches!(only_block(&doc).kind, BlockKind::Details { .. }));
    assert_eq!(doc.degradations[0].kind, DegradationKind::UnclosedDetails);
}

#[test]
fn html_block_ends_at_blank_line() {
    let doc = md("<div>\nraw *x*\n</div>\n\npara");
    assert_eq!(doc.blocks.len(), 2);
    match &doc.blocks[0].kind {
        BlockKind::HtmlBlock(raw) => assert_eq!(raw, "<div>\nraw *x*\n</div>"),
        other => panic!("expected html block, got {other:?}"),
    }
    assert!(matches!(doc.blocks[1].kind, BlockKind::Paragraph(_)));
}

#[rstest]
#[case("---")]
#[case("***")]
#[case("- - -")]
fn thematic_breaks(#[case] input: &str) {
    let doc = md(input);
    assert_eq!(only_block(&doc).kind, BlockKind::HorizontalRule);
}

#[test]
fn setext_underline_is_not_a_heading() {
    let doc = md("Title\n\n---");
    assert!(matches!(doc.blocks[0].kind, BlockKind::Paragraph(_)));
    assert_eq!(doc.blocks[1].kind, BlockKind::HorizontalRule);
}

// Lists

#[test]
fn task_list_with_nested_list() {
    let doc = md("- a\n- [x] b\n  - nested\n");
    insta::assert_snapshot!(outline(&doc), @r#"
    List(Task, depth=0, start=1, marker='-', tight=true) @0..22
      Item @0..3
        Paragraph @2..3
          Text "a" @2..3
      Item(checked=true) @4..22
        Paragraph @10..11
          Text "b" @10..11
        List(Unordered, depth=1, start=1, marker='-', tight=true) @14..22
          Item @14..22
            Paragraph @16..22
              Text "nested" @16..22
    "#);
}

#[test]
fn ordered_list_keeps_start_number() {
    let doc = md("3. a\n4. b");
    match &only_block(&doc).kind {
        BlockKind::List(list) => {
            assert_eq!(list.kind, ListKind::Ordered);
            assert_eq!(list.start, 3);
            assert_eq!(list.items.len(), 2);
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[rstest]
#[case("- a\n- b", true)]
#[case("- a\n\n- b", false)]
#[case("- a\n\n  more\n- b", false)]
fn list_tightness(#[case] input: &str, #[case] tight: bool) {
    let doc = md(input);
    match &only_block(&doc).kind {
        BlockKind::List(list) => {
            assert_eq!(list.tight, tight);
            assert_eq!(list.items.len(), 2);
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn different_bullet_starts_a_new_list() {
    let doc = md("- a\n* b");
    assert_eq!(doc.blocks.len(), 2);
}

#[test]
fn year_at_line_start_does_not_interrupt_paragraph() {
    let doc = md("text\n2019. was a year");
    assert!(matches!(only_block(&doc).kind, BlockKind::Paragraph(_)));
}

// Inline content

#[test]
fn bold_italic_combined() {
    let nodes = inlines("***both***");
    assert_eq!(nodes.len(), 1);
    assert_eq!(text_of(&nodes[0]), "both");
    assert_eq!(nodes[0].marks, Marks::of(&[Mark::Bold, Mark::Italic]));
    assert_eq!(nodes[0].span, Some(Span::new(3, 7)));
}

#[test]
fn link_with_title_and_formatted_text() {
    let nodes = inlines("[a *b*](u \"t\")");
    match &nodes[0].kind {
        InlineKind::Link {
            href,
            title,
            children,
            autolink,
        } => {
            assert_eq!(href, "u");
            assert_eq!(title.as_deref(), Some("t"));
            assert!(!autolink);
            assert_eq!(children.len(), 2);
            assert_eq!(text_of(&children[0]), "a ");
            assert_eq!(text_of(&children[1]), "b");
            assert_eq!(children[1].marks, Marks::of(&[Mark::Italic]));
        }
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn image_alt_is_plain_text() {
    let nodes = inlines("![alt *x*](i.png)");
    assert_eq!(
        nodes[0].kind,
        InlineKind::Image {
            src: "i.png".to_string(),
            alt: "alt x".to_string(),
            title: None,
        }
    );
}

#[test]
fn wiki_link_and_embed() {
    let nodes = inlines("[[Page|Shown]] and ![[Embed]]");
    assert_eq!(
        nodes[0].kind,
        InlineKind::WikiLink {
            target: "Page".to_string(),
            display: Some("Shown".to_string()),
        }
    );
    assert_eq!(text_of(&nodes[1]), " and ");
    assert_eq!(
        nodes[2].kind,
        InlineKind::WikiEmbed {
            target: "Embed".to_string()
        }
    );
}

#[test]
fn inline_math_needs_tight_dollars() {
    let nodes = inlines("$x^2$ costs $5");
    assert_eq!(nodes[0].kind, InlineKind::Math("x^2".to_string()));
    assert_eq!(text_of(&nodes[1]), " costs $5");
}

#[test]
fn code_span_suppresses_markup() {
    let nodes = inlines("`[[not a link]]`");
    assert_eq!(nodes.len(), 1);
    assert_eq!(text_of(&nodes[0]), "[[not a link]]");
    assert!(nodes[0].marks.contains(Mark::Code));
}

#[test]
fn hard_breaks() {
    let nodes = inlines("a  \nb\\\nc");
    let kinds: Vec<_> = nodes.iter().map(|n| n.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            InlineKind::Text("a".into()),
            InlineKind::HardBreak(BreakStyle::Spaces),
            InlineKind::Text("b".into()),
            InlineKind::HardBreak(BreakStyle::Backslash),
            InlineKind::Text("c".into()),
        ]
    );
}

#[test]
fn preserved_line_breaks() {
    let opts = ParseOptions {
        preserve_line_breaks: true,
    };
    let doc = parse("a\nb", &opts);
    invariants::check("a\nb", &doc);
    let content = doc.blocks[0].inlines().unwrap_or_default();
    assert_eq!(content.len(), 3);
    assert_eq!(content[1].kind, InlineKind::HardBreak(BreakStyle::Newline));

    // Without the option the newline stays in the text.
    assert_eq!(text_of(&inlines("a\nb")[0]), "a\nb");
}

#[test]
fn escapes_are_literal() {
    let nodes = inlines("\\*not\\*");
    assert_eq!(nodes.len(), 1);
    assert_eq!(text_of(&nodes[0]), "*not*");
    assert!(nodes[0].marks.is_empty());
}

#[test]
fn autolink_and_raw_html() {
    let nodes = inlines("<https://x.io> <b>hi</b>");
    assert!(matches!(
        &nodes[0].kind,
        InlineKind::Link { href, autolink: true, .. } if href == "https://x.io"
    ));
    assert_eq!(nodes[2].kind, InlineKind::Html("<b>".into()));
    assert_eq!(text_of(&nodes[3]), "hi");
    assert_eq!(nodes[4].kind, InlineKind::Html("</b>".into()));
}

#[test]
fn malformed_inline_syntax_degrades_to_text() {
    let doc = md("[[unclosed and `also unclosed");
    let content = doc.blocks[0].inlines().unwrap_or_default();
    assert_eq!(content.len(), 1);
    assert_eq!(text_of(&content[0]), "[[unclosed and `also unclosed");

    let kinds: Vec<_> = doc.degradations.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DegradationKind::UnmatchedBracket,
            DegradationKind::UnmatchedBracket,
            DegradationKind::UnclosedCodeSpan,
        ]
    );
    assert_eq!(doc.degradations[2].span, Span::new(15, 16));
}

#[test]
fn quoted_inline_spans_skip_prefixes() {
    let doc = md("> **a\n> b**");
    let BlockKind::BlockQuote { children, .. } = &doc.blocks[0].kind else {
        panic!("expected quote");
    };
    let content = children[0].inlines().unwrap_or_default();
    assert_eq!(content.len(), 1);
    assert_eq!(text_of(&content[0]), "a\nb");
    assert_eq!(content[0].marks, Marks::of(&[Mark::Bold]));
    assert_eq!(content[0].span, Some(Span::new(4, 9)));
}

// Span invariants across a mixed corpus

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("plain")]
#[case("# H1\n## H2 *x*\n")]
#[case("> quote\n> > deeper **b**\n>\n> back")]
#[case("- a\n  - b\n    - c\n- d\n")]
#[case("1. one\n2. two\n\n   para\n")]
#[case("| h | i |\n|---|---|\n| `c|d` | [l](u) |\n")]
#[case("> [!NOTE]\n> - item\n> - item 2\n")]
#[case("<details>\n<summary>s</summary>\n\n- x\n\n</details>")]
#[case("<!-- a\ncomment -->\ntext")]
#[case("[^n]: first\n    second para\n\nafter")]
#[case("Ünïcödé **bøld** ~~ß~~ [[Wïki]]")]
#[case("~~~\n```\n~~~\n")]
#[case("text with trailing spaces   \nnext\n")]
fn spans_are_well_formed(#[case] input: &str) {
    md(input);
}

// Yielding parse

const LARGE_UNIT: &str = "# Section\n\nSome *text* with [[links]].\n\n- item\n- item\n\n```\ncode\n```\n\n";

#[tokio::test]
async fn yielding_parse_matches_direct_parse() {
    let text = LARGE_UNIT.repeat(200);
    let direct = parse(&text, &ParseOptions::default());
    let yielded = YieldingParse::new(&text, ParseOptions::default())
        .with_chunk_lines(64)
        .await
        .expect("not cancelled");
    assert_eq!(yielded, direct);
}

#[test]
fn step_advances_progress() {
    let text = LARGE_UNIT.repeat(20);
    let mut p = YieldingParse::new(&text, ParseOptions::default()).with_chunk_lines(10);
    let total = p.progress().total;
    assert_eq!(p.progress().consumed, 0);

    assert_eq!(p.step(10), Ok(false));
    let after = p.progress().consumed;
    assert!(after >= 10 && after < total);

    while !p.step(10).expect("not cancelled") {}
    assert!(p.is_done());
    assert_eq!(
        p.finish().expect("not cancelled"),
        parse(&text, &ParseOptions::default())
    );
}

#[test]
fn cancelled_parse_reports_progress() {
    let text = LARGE_UNIT.repeat(20);
    let mut p = YieldingParse::new(&text, ParseOptions::default());
    assert_eq!(p.step(5), Ok(false));
    p.cancel();
    let err = p.finish().expect_err("cancelled");
    assert!(matches!(
        err,
        crate::error::ParseError::Cancelled { consumed, total } if consumed < total
    ));
}
