//! Integration tests for the icon-sheet CLI

use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const BINARY: &str = env!("CARGO_BIN_EXE_icon-sheet");

const SHEET: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <symbol id="mdi_home" viewBox="0 0 24 24"><path d="M10 20v-6h4v6h5v-8h3L12 3 2 12h3v8z"/></symbol>
    <symbol id="mdi_star" viewBox="0 0 24 24"><path d="M12 17.27L18.18 21l-1.64-7.03L22 9.24z"/></symbol>
    <symbol id="mdi_wide" width="32" height="24" viewBox="0 0 48 24"><rect width="48" height="24"/></symbol>
    <symbol viewBox="0 0 24 24"><path d="M0 0"/></symbol>
  </defs>
</svg>"#;

fn write_sheet(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("sprite.svg");
    fs::write(&path, SHEET).unwrap();
    path
}

#[test]
fn test_export_to_stdout() {
    let temp = TempDir::new().unwrap();
    let sheet = write_sheet(&temp);

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args([sheet.to_str().unwrap()])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(json["prefix"], json!("mdi"));
    assert_eq!(json["icons"]["home"]["width"], json!(24));
    assert_eq!(json["icons"]["wide"]["width"], json!(48));
    assert!(json.get("width").is_none());
    assert_eq!(json["icons"].as_object().unwrap().len(), 3);
}

#[test]
fn test_optimized_export_to_file() {
    let temp = TempDir::new().unwrap();
    let sheet = write_sheet(&temp);
    let out = temp.path().join("icons.json");

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args([
            sheet.to_str().unwrap(),
            "--optimize",
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let json: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();

    assert_eq!(json["width"], json!(24));
    assert_eq!(json["height"], json!(24));
    assert_eq!(json["icons"]["home"], json!({ "body": "<path d=\"M10 20v-6h4v6h5v-8h3L12 3 2 12h3v8z\"/>" }));
    assert_eq!(json["icons"]["wide"]["width"], json!(48));
    assert!(json["icons"]["wide"].get("height").is_none());
}

#[test]
fn test_explicit_prefix() {
    let temp = TempDir::new().unwrap();
    let sheet = write_sheet(&temp);

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args([sheet.to_str().unwrap(), "--prefix", "custom"])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["prefix"], json!("custom"));
    assert!(json["icons"].get("mdi-home").is_some());
}

#[test]
fn test_text_format_from_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = Command::new(BINARY)
        .current_dir(temp.path())
        .args(["-", "--format", "text"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn process");

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(SHEET.as_bytes()).unwrap();
    }

    let output = child.wait_with_output().expect("Failed to read output");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("prefix: mdi"));
    assert!(stdout.contains("home: 24x24"));
    assert!(stdout.contains("wide: 48x24"));
}

#[test]
fn test_config_file_enables_optimize() {
    let temp = TempDir::new().unwrap();
    let sheet = write_sheet(&temp);
    fs::write(
        temp.path().join("icon-sheet.yaml"),
        "export:\n  optimize: true\n  pretty: false\n",
    )
    .unwrap();

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args([sheet.to_str().unwrap()])
        .output()
        .expect("Failed to run command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1);
    let json: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(json["width"], json!(24));
}

#[test]
fn test_missing_definitions_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.svg");
    fs::write(&path, r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#).unwrap();

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args([path.to_str().unwrap()])
        .output()
        .expect("Failed to run command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing definitions"));
}

#[test]
fn test_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    let output = Command::new(BINARY)
        .current_dir(temp.path())
        .args(["nope.svg"])
        .output()
        .expect("Failed to run command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}
