//! Integration tests for the evmark binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn evmark(args: &[&Path]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_evmark"));
    cmd.args(args);
    cmd
}

fn run(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("Failed to run evmark");
    assert!(
        output.status.success(),
        "evmark failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Render a fixture into a temporary file and return the Markdown
fn convert_fixture(name: &str, flags: &[&str]) -> String {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.md");

    let input = fixtures_dir().join(name);
    run(evmark(&[input.as_path(), Path::new("-o"), output.as_path()]).args(flags).arg("-q"));

    fs::read_to_string(&output).expect("Failed to read output file")
}

#[test]
fn test_simple_conversion() {
    let output = convert_fixture("simple.json", &[]);
    insta::assert_snapshot!(output, @r"
    Install
    -------

    Run `make install`.
    ");
}

#[test]
fn test_wiki_macro_fallback() {
    let output = convert_fixture("simple.json", &["--macro-fallback", "wiki"]);
    insta::assert_snapshot!(output, @r#"
    Install
    -------

    Run `make install`.

    {{toc depth="2"/}}
    "#);
}

#[test]
fn test_typed_prefixes_flag() {
    let output = convert_fixture("nested/links.jsonl", &[]);
    assert_eq!(output, "[Guide](attach:guide.pdf)");

    let output = convert_fixture("nested/links.jsonl", &["--no-typed-prefixes"]);
    assert_eq!(output, "[Guide](guide.pdf)");
}

#[test]
fn test_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.json");
    fs::copy(fixtures_dir().join("simple.json"), &input).unwrap();

    let output = run(&mut evmark(&[input.as_path()]));
    let expected = dir.path().join("page.md");
    assert!(expected.exists());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        expected.display().to_string()
    );
}

#[test]
fn test_config_file_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.jsonl");
    fs::copy(fixtures_dir().join("nested/links.jsonl"), &input).unwrap();
    fs::write(
        dir.path().join("_evmark.toml"),
        "[output]\nextension = \"markdown\"\n\n[references]\ntyped_prefixes = false\n",
    )
    .unwrap();

    run(evmark(&[input.as_path()]).arg("-q"));

    let content = fs::read_to_string(dir.path().join("page.markdown")).unwrap();
    assert_eq!(content, "[Guide](guide.pdf)");
}

#[test]
fn test_directory_conversion() {
    let output_dir = tempfile::tempdir().unwrap();

    run(evmark(&[fixtures_dir().as_path(), Path::new("-o"), output_dir.path()])
        .args(["-r", "-q", "-j", "2"]));

    assert!(output_dir.path().join("simple.md").exists());
    let nested = fs::read_to_string(output_dir.path().join("nested/links.md")).unwrap();
    assert_eq!(nested, "[Guide](attach:guide.pdf)");
}

#[test]
fn test_directory_without_recursion_skips_subdirectories() {
    let output_dir = tempfile::tempdir().unwrap();

    run(evmark(&[fixtures_dir().as_path(), Path::new("-o"), output_dir.path()]).arg("-q"));

    assert!(output_dir.path().join("simple.md").exists());
    assert!(!output_dir.path().join("nested").exists());
}

#[test]
fn test_directory_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixtures_dir().join("simple.json"), dir.path().join("good.json")).unwrap();
    fs::write(dir.path().join("bad.json"), r#"[{"type": "beginTable"}]"#).unwrap();

    let output = evmark(&[dir.path()]).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.json"));
    assert!(stderr.contains("Unclosed table"));
    assert!(stderr.contains("Converted 1 files, 1 failed"));
    assert!(dir.path().join("good.md").exists());
}

#[test]
fn test_invalid_stream_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.jsonl");
    fs::write(&input, "{\"type\": \"onWord\"}\n").unwrap();

    let output = evmark(&[input.as_path()]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid event stream"));
}

#[test]
fn test_init_writes_sample_config() {
    let dir = tempfile::tempdir().unwrap();

    run(&mut evmark(&[Path::new("-q"), Path::new("init"), dir.path()]));
    let content = fs::read_to_string(dir.path().join("_evmark.toml")).unwrap();
    assert!(content.starts_with("#:schema "));
    assert!(content.contains("macro_fallback = \"skip\""));

    // A second init refuses to overwrite
    let output = evmark(&[Path::new("init"), dir.path()]).output().unwrap();
    assert!(!output.status.success());

    run(evmark(&[Path::new("-q"), Path::new("init"), dir.path()]).arg("--force"));
}

#[test]
fn test_schema_command() {
    let output = run(&mut evmark(&[Path::new("schema")]));
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "Config");
}
