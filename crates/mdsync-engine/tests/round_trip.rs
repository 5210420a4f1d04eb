use mdsync_engine::{
    ParseOptions, SerializeOptions, compute_context, parse, serialize, serialize_with_spans,
    to_text_offset, to_tree_location,
};
use pretty_assertions::assert_eq;

#[test]
fn fixture_mixed() {
    assert_fixture("combos/mixed");
}

#[test]
fn fixture_nested_containers() {
    assert_fixture("combos/nested_containers");
}

#[test]
fn fixture_footnotes() {
    assert_fixture("combos/footnotes");
}

#[test]
fn fixture_tables() {
    assert_fixture("combos/tables");
}

#[test]
fn fixture_wikilinks_raw_zones() {
    assert_fixture("combos/wikilinks_raw_zones");
}

fn load(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn assert_fixture(name: &str) {
    let md = load(name);
    let opts = SerializeOptions::default();

    // Idempotent after one normalization pass.
    let doc = parse(&md, &ParseOptions::default());
    let once = serialize(&doc, &opts).unwrap();
    let twice = serialize(&parse(&once, &ParseOptions::default()), &opts).unwrap();
    assert_eq!(once, twice, "{name} is not stable under round trip");

    // The tree returned with the text is the tree a reparse produces, and
    // every span it carries slices the emitted text.
    let (text, spanned) = serialize_with_spans(&doc, &opts).unwrap();
    assert_eq!(text, once);
    assert_eq!(
        spanned.detached(),
        parse(&text, &ParseOptions::default()).detached()
    );
    for b in &spanned.blocks {
        let span = b.span.unwrap();
        assert!(text.get(span.start..span.end).is_some());
    }

    // Every caret survives text -> tree -> text, and context never panics.
    for offset in (0..=md.len()).filter(|&o| md.is_char_boundary(o)) {
        let loc = to_tree_location(offset, &doc).unwrap();
        assert_eq!(to_text_offset(&loc.path, loc.node_offset, &doc), Some(offset));
        let _ = compute_context(&md, offset);
    }
}

#[test]
fn footnotes_are_renumbered_by_first_reference() {
    let out = serialize(
        &parse(&load("combos/footnotes"), &ParseOptions::default()),
        &SerializeOptions::default(),
    )
    .unwrap();
    insta::assert_snapshot!(out, @r"
    First reference[^1], then[^2], then again[^1].

    [^1]: Defined before use.

    [^2]: Alpha note
        with a continuation line.

    [^3]: Nobody points here.
    ");
}

#[test]
fn ragged_table_is_padded_on_output() {
    let out = serialize(
        &parse(&load("combos/tables"), &ParseOptions::default()),
        &SerializeOptions::default(),
    )
    .unwrap();
    insta::assert_snapshot!(out, @r"
    | Name  | Align  | Notes    |
    | :---- | :----: | -------: |
    | a     | b      | c        |
    | `xy`  | [l](u) | **bold** |
    | short |        |          |

    Text after the table.
    ");
}
