use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const DOCUMENT: &str = r#"[
  {"_type": "block", "_key": "title", "style": "h2", "text": "Notes"},
  {"_type": "block", "_key": "body", "style": "normal", "text": "Hello world"}
]"#;

fn blockmark(home: &Path, args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blockmark-cli"))
        .args(args)
        .env("HOME", home)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_prints_edited_document() {
    // Given a document and a script that bolds "Hello"
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("post.json");
    let script = temp_dir.path().join("edit.txt");
    fs::write(&document, DOCUMENT).unwrap();
    fs::write(&script, "select body 0 5\nkey mod+b\n").unwrap();

    // When the script is replayed without --write
    let output = blockmark(temp_dir.path(), &[&document, &script]);

    // Then the edited JSON is printed and the file is untouched
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#""_type": "strong""#));
    assert_eq!(fs::read_to_string(&document).unwrap(), DOCUMENT);
}

#[test]
fn test_write_saves_document() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("post.json");
    let script = temp_dir.path().join("edit.txt");
    fs::write(&document, DOCUMENT).unwrap();
    fs::write(&script, "retype body quote\ntype body Quoted\n").unwrap();

    let output = blockmark(temp_dir.path(), &[Path::new("--write"), &document, &script]);

    assert!(output.status.success());
    let saved = fs::read_to_string(&document).unwrap();
    assert!(saved.contains(r#""style": "blockquote""#));
    assert!(saved.contains(r#""text": "Quoted""#));
}

#[test]
fn test_invalid_document_fails() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("post.json");
    fs::write(
        &document,
        r#"[{"_type": "image", "_key": "i", "asset": {"_ref": "r"}, "text": "caption?"}]"#,
    )
    .unwrap();

    let output = blockmark(temp_dir.path(), &[&document]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("image blocks cannot carry text"));
}

#[test]
fn test_missing_arguments_prints_usage() {
    let temp_dir = TempDir::new().unwrap();

    let output = blockmark(temp_dir.path(), &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("Usage:"));
}
