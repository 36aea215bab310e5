//! Integration tests for the parsing module.
//!
//! Fixtures (.md) and snapshots (.snap) are co-located in `fixtures/`.


use pretty_assertions::assert_eq;

use crate::models::{CodeListing, Document, ProseText, RepoLink, Segment};
use crate::parsing::{ParseError, parse_document};

// Fixture-based snapshot tests

#[test]
fn fixture_listings_and_links() {
    assert_fixture("listings_and_links");
}

#[test]
fn fixture_decorated_link() {
    assert_fixture("decorated_link");
}

#[test]
fn fixture_unchecked_languages() {
    assert_fixture("unchecked_languages");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let doc = parse_document(md.as_str()).unwrap();
    invariants::check(&doc);

    let snap = normalize::normalize(&doc);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, snap);
    });
}

// Behaviour tests

#[test]
fn segments_come_out_in_document_order() {
    let doc = parse_document("intro\n```python\n# a.py\npass\n```\nmore\n").unwrap();
    let listing = CodeListing::from_block("```python\n# a.py\npass\n```\n", 2).unwrap();

    assert_eq!(
        doc.segments(),
        &[
            Segment::Prose(ProseText::new("intro\n")),
            Segment::Listing(listing),
            Segment::Prose(ProseText::new("more\n")),
        ]
    );
    let listing = doc.code_listings().next().unwrap();
    assert_eq!(listing.language(), "python");
    assert_eq!(listing.source_file_name(), Some("a.py"));
    assert_eq!(listing.code(), "pass\n");
}

#[test]
fn decorated_link_block_is_canonicalized() {
    let doc = parse_document("%%\n  code:   https://example.com/x\n%%\n").unwrap();
    assert_eq!(
        doc.segments(),
        &[Segment::RepoLink(RepoLink::new("https://example.com/x"))]
    );
    assert_eq!(doc.serialize(), "%%\ncode: https://example.com/x\n%%\n");
}

#[test]
fn unterminated_fence_is_malformed() {
    assert_eq!(
        parse_document("text\n```python\n# a.py\npass\n"),
        Err(ParseError::UnterminatedFence { line: 2 })
    );
}

#[test]
fn fence_without_language_is_malformed() {
    assert_eq!(
        parse_document("```!\nfragment\n```\n"),
        Err(ParseError::EmptyLanguage { line: 1 })
    );
}

#[test]
fn zero_line_listing_is_valid() {
    let doc = parse_document("```go\n```\n").unwrap();
    let listing = doc.code_listings().next().unwrap();
    assert_eq!(listing.language(), "go");
    assert_eq!(listing.body(), "");
    assert_eq!(doc.serialize(), "```go\n```\n");
}

#[test]
fn empty_document_has_no_segments() {
    let doc = Document::parse("").unwrap();
    assert!(doc.segments().is_empty());
    assert_eq!(doc.serialize(), "");
}

#[test]
fn crlf_document_round_trips() {
    let text = "Intro\r\n```rust\r\n// src/lib.rs\r\npub fn f() {}\r\n```\r\nOutro\r\n";
    let doc = parse_document(text).unwrap();
    assert_eq!(doc.code_listings().next().unwrap().source_file_name(), Some("src/lib.rs"));
    assert_eq!(doc.serialize(), text);
}

#[test]
fn missing_final_newline_round_trips() {
    for text in ["last line", "```text\nout\n```"] {
        let doc = parse_document(text).unwrap();
        assert_eq!(doc.serialize(), text);
    }
}
