//! Command-line tests for the docreduce binary.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use calamine::{Reader, Xlsx, open_workbook_from_rs};
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use tempfile::TempDir;

fn docreduce() -> Command {
    let mut cmd = Command::cargo_bin("docreduce").expect("binary built");
    cmd.env_remove("RUST_LOG")
        .env_remove("DOCREDUCE_MODEL")
        .env_remove("DOCREDUCE_MAX_WORKERS")
        .env_remove("OPENAI_BASE_URL")
        .env("OPENAI_API_KEY", "sk-test");
    cmd
}

fn build_workbook(sheets: usize, rows: u32) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for s in 0..sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(format!("Region {s}")).expect("sheet name");
        for row in 0..rows {
            for col in 0..8u16 {
                worksheet
                    .write_string(row, col, format!("r{s}-{row}-{col}-{}", row * 7919 % 104_729))
                    .expect("write cell");
            }
        }
    }
    workbook.save_to_buffer().expect("serialize workbook")
}

fn sheet_names(bytes: Vec<u8>) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("open fragment");
    workbook.sheet_names()
}

#[test]
fn test_formats_lists_splitters() {
    docreduce()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("  pdf\n"))
        .stdout(predicate::str::contains("  xlsx\n"));
}

#[test]
fn test_formats_json() {
    docreduce()
        .args(["--format", "json", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pdf\""));
}

#[test]
fn test_split_text_file_passes_through() {
    let temp = TempDir::new().expect("temp dir");
    let source = temp.path().join("minutes.txt");
    std::fs::write(&source, "meeting notes\n".repeat(100)).expect("write fixture");
    let out_dir = temp.path().join("out");

    docreduce()
        .arg("split")
        .arg(&source)
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--hard-limit", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("into 1 fragments"))
        .stdout(predicate::str::contains("[over limit]"));

    let written = std::fs::read(out_dir.join("minutes_0001.txt")).expect("fragment written");
    assert_eq!(written.len(), 1400);
}

#[test]
fn test_split_workbook_into_sheet_groups() {
    let temp = TempDir::new().expect("temp dir");
    let bytes = build_workbook(4, 300);
    let hard_limit = bytes.len() / 2;
    let source = temp.path().join("sales.xlsx");
    std::fs::write(&source, &bytes).expect("write fixture");
    let out_dir = temp.path().join("parts");

    let output = docreduce()
        .args(["--format", "json", "split"])
        .arg(&source)
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--prefix", "part", "--hard-limit", &hard_limit.to_string()])
        .output()
        .expect("run split");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["format"], "xlsx");
    let fragments = report["fragments"].as_array().expect("fragments");
    assert!(fragments.len() >= 2);

    let mut names = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let path = out_dir.join(format!("part_{:04}.xlsx", i + 1));
        let blob = std::fs::read(&path).expect("fragment written");
        assert!(blob.len() <= hard_limit);
        assert_eq!(fragment["bytes"], blob.len());
        names.extend(sheet_names(blob));
    }
    assert_eq!(names, vec!["Region 0", "Region 1", "Region 2", "Region 3"]);
}

#[test]
fn test_split_missing_file_fails() {
    docreduce()
        .args(["split", "/nonexistent/input.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: I/O error: file not found"));
}

#[test]
fn test_split_corrupt_pdf_fails() {
    let temp = TempDir::new().expect("temp dir");
    let source = temp.path().join("broken.pdf");
    std::fs::write(&source, vec![b'%'; 4096]).expect("write fixture");

    docreduce()
        .arg("split")
        .arg(&source)
        .args(["--hard-limit", "1024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical error processing PDF"));
}

#[test]
fn test_json_errors_go_to_stdout() {
    docreduce()
        .args(["--format", "json", "split", "/nonexistent/input.pdf"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_ask_requires_question() {
    docreduce()
        .args(["ask", "report.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--question"));
}

#[test]
fn test_ask_missing_file_fails_before_any_request() {
    docreduce()
        .args(["ask", "/nonexistent/report.pdf", "-q", "What changed?"])
        .args(["--api-base", "http://127.0.0.1:9/v1", "--max-attempts", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_ask_rejects_mismatched_names() {
    docreduce()
        .args(["ask", "a.pdf", "b.pdf", "-q", "q", "--name", "Only one"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 names given for 2 files"));
}
