//! Rendering tests for complete event streams
//!
//! Fixtures are event streams in either JSON layout; the rendered Markdown is
//! snapshotted inline.

use std::fs;
use std::path::PathBuf;

use evmark_core::{MacroFallback, RenderOptions, render};
use evmark_events::parse_events;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn render_fixture(name: &str, options: &RenderOptions) -> String {
    let path = fixtures_dir().join(name);
    let source = fs::read_to_string(&path).expect("Failed to read fixture file");
    let events = parse_events(&source).expect("Failed to parse event stream");
    render(&events, options).expect("Failed to render events")
}

#[test]
fn test_guide_document() {
    let markdown = render_fixture("guide.json", &RenderOptions::default());
    insta::assert_snapshot!(markdown, @r"
    Guide
    =====

    Read the **docs**.

    * one
    * two

    | Key | Value |
    | --- | ----- |
    |  a  |   1   |

    ```sh
    cargo test
    ```

    > quoted

    ---

    MD rocks

    *[MD]: Markdown
    ");
}

#[test]
fn test_reference_document_skips_unknown_macros() {
    let markdown = render_fixture("reference.jsonl", &RenderOptions::default());
    insta::assert_snapshot!(markdown, @r"
    Event
    :   A callback

    1. first
        * nested
    1. second

    [events](doc:Main.Events#Types)
    ");
}

#[test]
fn test_reference_document_wiki_fallback() {
    let options = RenderOptions {
        macro_fallback: MacroFallback::Wiki,
        typed_prefixes: false,
    };
    let markdown = render_fixture("reference.jsonl", &options);
    insta::assert_snapshot!(markdown, @r"
    Event
    :   A callback

    1. first
        * nested
    1. second

    {{toc/}}

    [events](Main.Events#Types)
    ");
}

#[test]
fn test_unbalanced_stream_is_rejected() {
    let source = r#"[{"type": "beginDocument"}, {"type": "beginTable"}, {"type": "endDocument"}]"#;
    let events = parse_events(source).unwrap();
    let err = render(&events, &RenderOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unbalanced events: endDocument closes a document, but the innermost open element is a table"
    );
}
