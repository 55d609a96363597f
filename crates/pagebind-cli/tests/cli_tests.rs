//! End-to-end tests for the `pagebind` binary

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn pagebind() -> Command {
    Command::cargo_bin("pagebind").unwrap()
}

/// A white page with horizontal rules so orientation resolves to 0°
/// without consulting Tesseract.
fn write_ruled_page(path: &Path) {
    let mut img = RgbImage::from_pixel(320, 240, Rgb([255, 255, 255]));
    for y0 in [60u32, 120] {
        for y in y0..y0 + 3 {
            for x in 20..300 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }
    img.save(path).unwrap();
}

#[test]
fn test_missing_source_exits_2() {
    pagebind()
        .args(["run", "/no/such/directory"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("source directory not found"));
}

#[test]
fn test_source_that_is_a_file_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("scan.jpg");
    fs::write(&file, b"").unwrap();

    pagebind().arg("run").arg(&file).assert().code(2);
}

#[test]
fn test_happy_path_writes_pdf_beside_source() {
    let root = tempfile::tempdir().unwrap();
    let letters = root.path().join("letters");
    fs::create_dir(&letters).unwrap();
    write_ruled_page(&letters.join("page1.png"));
    write_ruled_page(&letters.join("page2.png"));

    pagebind()
        .arg("run")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("letters.pdf"));

    let pdf = fs::read(letters.join("letters.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}

#[test]
fn test_output_dir_is_created_and_used() {
    let root = tempfile::tempdir().unwrap();
    let letters = root.path().join("letters");
    fs::create_dir(&letters).unwrap();
    write_ruled_page(&letters.join("page1.png"));
    let out = root.path().join("out").join("pdfs");

    pagebind()
        .arg("run")
        .arg(&letters)
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("letters.pdf").exists());
}

#[test]
fn test_empty_tree_exits_0_without_output() {
    let root = tempfile::tempdir().unwrap();

    pagebind()
        .arg("run")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No image directories"));
}

#[test]
fn test_unit_failure_still_exits_0() {
    let root = tempfile::tempdir().unwrap();
    let bad = root.path().join("bad");
    fs::create_dir(&bad).unwrap();
    fs::write(bad.join("page1.jpg"), b"not an image").unwrap();

    pagebind()
        .arg("run")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("failed"));
    assert!(!bad.join("bad.pdf").exists());
}
