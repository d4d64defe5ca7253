//! Integration tests for the pdfoutline binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

/// Three pages: "Report Title" at 24pt, "Chapter N" at 18pt, an 8pt page footer.
fn report_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=3 {
        let mut content = String::new();
        if n == 1 {
            content.push_str("BT /F1 24 Tf 72 700 Td (Report Title) Tj ET\n");
        }
        content.push_str(&format!("BT /F1 18 Tf 72 640 Td (Chapter {n}) Tj ET\n"));
        content.push_str(&format!("BT /F1 8 Tf 280 30 Td (Page {n} of 3) Tj ET\n"));

        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, report_pdf()).unwrap();
    (dir, input)
}

fn pdfoutline() -> Command {
    let mut cmd = Command::cargo_bin("pdfoutline").unwrap();
    cmd.env_remove("PDFOUTLINE_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .env("NO_COLOR", "1");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_outline_to_explicit_output() {
    let (dir, input) = setup();
    let output = dir.path().join("out.json");

    pdfoutline()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"))
        .stdout(predicate::str::contains("Report Title"))
        .stdout(predicate::str::contains("Headings: 3 (H1: 3)"));

    let json = read_json(&output);
    assert_eq!(json["title"], "Report Title");
    let outline = json["outline"].as_array().unwrap();
    assert_eq!(outline.len(), 3);
    for (i, entry) in outline.iter().enumerate() {
        assert_eq!(entry["level"], "H1");
        assert_eq!(entry["text"], format!("Chapter {}", i + 1));
        assert_eq!(entry["page"], i as u64 + 1);
    }
}

#[test]
fn test_default_output_next_to_input() {
    let (dir, input) = setup();

    pdfoutline().arg(&input).assert().success();

    let output = dir.path().join("report_outline.json");
    assert!(output.exists());
    assert_eq!(read_json(&output)["outline"][0]["text"], "Chapter 1");
}

#[test]
fn test_compact_output() {
    let (dir, input) = setup();
    let output = dir.path().join("out.json");

    pdfoutline()
        .arg(&input)
        .args(["--compact", "--sequential", "-o"])
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.trim_end().lines().count(), 1);
    assert!(written.starts_with(r#"{"title":"Report Title","outline":[{"level":"H1""#));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    pdfoutline()
        .arg(dir.path().join("absent.pdf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("absent.pdf"));
}

#[test]
fn test_corrupt_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pdf");
    fs::write(&input, b"definitely not a pdf").unwrap();

    pdfoutline()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
    assert!(!dir.path().join("broken_outline.json").exists());
}

#[test]
fn test_unwritable_output_fails() {
    let (dir, input) = setup();

    pdfoutline()
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("missing").join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("out.json"));
}

#[test]
fn test_max_depth_out_of_range() {
    let (_dir, input) = setup();

    pdfoutline()
        .arg(&input)
        .args(["--max-depth", "7"])
        .assert()
        .failure();
}

#[test]
fn test_partial_config_file() {
    let (dir, input) = setup();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"headings": {"max_depth": 1}, "parallel": false}"#).unwrap();
    let output = dir.path().join("out.json");

    pdfoutline()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read_json(&output)["outline"].as_array().unwrap().len(), 3);
}

#[test]
fn test_invalid_config_file() {
    let (dir, input) = setup();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"artifacts": {"margin_fraction": 0.9}}"#).unwrap();

    pdfoutline()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("margin_fraction"));
}

#[test]
fn test_config_from_environment() {
    let (dir, input) = setup();
    let config = dir.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();

    pdfoutline()
        .env("PDFOUTLINE_CONFIG", &config)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_interactive_prompts() {
    let (dir, input) = setup();
    let output = dir.path().join("answers.json");

    pdfoutline()
        .write_stdin(format!("{}\n{}\ny\n", input.display(), output.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Input PDF path"))
        .stdout(predicate::str::contains("Enable debug logging"));

    assert_eq!(read_json(&output)["title"], "Report Title");
}

#[test]
fn test_interactive_defaults_to_sample() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sample.pdf"), report_pdf()).unwrap();

    pdfoutline()
        .current_dir(dir.path())
        .write_stdin("\n\n\n")
        .assert()
        .success();

    assert!(dir.path().join("sample_outline.json").exists());
}

#[test]
fn test_interactive_missing_sample() {
    let dir = tempfile::tempdir().unwrap();

    pdfoutline()
        .current_dir(dir.path())
        .write_stdin("\n\n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample.pdf"));
}
