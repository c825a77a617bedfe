// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use assert_cmd::Command;
use assertor::BooleanAssertion;
use image::{Rgb, RgbImage};
use predicates::str::contains;
use std::path::PathBuf;
use temp_dir::TempDir;

fn sut() -> Command {
    let mut command = Command::cargo_bin("certiscan").expect("Should be able to create a command");
    command.arg("--no-colors");
    command
}

fn blank_certificate(temp_dir: &TempDir) -> PathBuf {
    let image = temp_dir.child("certificate.png");
    RgbImage::from_pixel(64, 48, Rgb([250, 250, 250]))
        .save(&image)
        .expect("certificate image saved");
    image
}

#[cfg(unix)]
fn fake_tesseract(temp_dir: &TempDir, recognized_text: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let binary = temp_dir.child("tesseract");
    std::fs::write(&binary, format!("#!/bin/sh\necho \"{}\"\n", recognized_text)).expect("fake tesseract written");
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).expect("fake tesseract executable");
    binary
}

#[test]
fn should_extract_verification_url_from_text() {
    let execution = sut()
        .args(["extract", "Visit https://credly.com/badges/abc123 to verify"])
        .assert();

    execution.success().stdout(contains("https://credly.com/badges/abc123"));
}

#[test]
fn should_fail_when_text_mentions_no_url() {
    let execution = sut()
        .args(["extract", "Certificate of Completion awarded to Jane Doe"])
        .assert();

    execution.failure();
}

#[test]
fn should_refuse_missing_certificate_image() {
    let execution = sut().args(["verify", "/definitely/not/here.png"]).assert();

    execution.failure().stderr(contains("no such file"));
}

#[test]
fn should_refuse_malformed_verification_url() {
    let execution = sut().args(["check", "not a url"]).assert();

    execution.failure();
}

#[cfg(unix)]
#[test]
fn should_report_partial_verdict_as_json() {
    let temp_dir = TempDir::new().expect("temporary folder");
    let image = blank_certificate(&temp_dir);
    let tesseract = fake_tesseract(&temp_dir, "Certificate of Completion");

    let execution = sut()
        .env("CERTISCAN_TESSERACT", &tesseract)
        .args(["verify", "--report", "json", "--name", "Jane Doe"])
        .arg(&image)
        .assert();

    execution
        .success()
        .stdout(contains("\"status\": \"Partial\""))
        .stdout(contains("\"verificationMethod\": \"OCR Text Analysis\""));

    assertor::assert_that!(image.exists()).is_true();
}

#[cfg(unix)]
#[test]
fn should_write_html_report() {
    let temp_dir = TempDir::new().expect("temporary folder");
    let image = blank_certificate(&temp_dir);
    let tesseract = fake_tesseract(&temp_dir, "Grocery list");

    let execution = sut()
        .current_dir(temp_dir.path())
        .arg("--tesseract")
        .arg(&tesseract)
        .args(["verify", "--report", "html"])
        .arg(&image)
        .assert();

    execution.success();

    let report = std::fs::read_to_string(temp_dir.child("certiscan-report.html")).expect("report written");
    assertor::assert_that!(report.contains("Invalid")).is_true();
}
