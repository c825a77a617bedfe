// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::TextRecognition;
use anyhow::{Context, bail};
use std::path::{Path, PathBuf};
use tokio::process::Command;

static OCR_LANGUAGE: &str = "eng";

/// Runs the tesseract binary over an image file and reads recognized text from its stdout
pub struct TesseractRecognizer {
    binary: PathBuf,
}

impl TesseractRecognizer {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl TextRecognition for TesseractRecognizer {
    async fn recognize(&self, image_path: &Path) -> anyhow::Result<String> {
        log::info!("[certiscan.ocr] recognizing text from {:?}", image_path);

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(OCR_LANGUAGE)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("certiscan.ocr : cannot run {:?} (is it installed?)", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("certiscan.ocr : {:?} failed ({})", self.binary, stderr.trim());
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        log::info!("[certiscan.ocr] recognized {} characters", text.chars().count());
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::domain::interfaces::TextRecognition;
    use crate::infra::ocr::TesseractRecognizer;
    use assertor::{EqualityAssertion, ResultAssertion};
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use temp_dir::TempDir;

    fn fake_binary(temp_dir: &TempDir, script: &str) -> PathBuf {
        let binary = temp_dir.child("tesseract");
        std::fs::write(&binary, format!("#!/bin/sh\n{}\n", script)).expect("fake binary written");
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).expect("fake binary executable");
        binary
    }

    #[tokio::test]
    async fn should_read_recognized_text_from_stdout() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let binary = fake_binary(&temp_dir, "echo \"Certificate of Completion\"");
        let recognizer = TesseractRecognizer::new(binary);

        let text = recognizer
            .recognize(&temp_dir.child("certificate.png"))
            .await
            .expect("recognized text");

        assertor::assert_that!(text.trim().to_string()).is_equal_to("Certificate of Completion".to_string());
    }

    #[tokio::test]
    async fn should_fail_when_engine_exits_with_error() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let binary = fake_binary(&temp_dir, "echo \"Error in pixReadStream\" >&2\nexit 1");
        let recognizer = TesseractRecognizer::new(binary);

        let text = recognizer.recognize(&temp_dir.child("certificate.png")).await;

        assertor::assert_that!(text).is_err();
    }

    #[tokio::test]
    async fn should_fail_when_engine_is_missing() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let recognizer = TesseractRecognizer::new(temp_dir.child("not-installed"));

        let text = recognizer.recognize(&temp_dir.child("certificate.png")).await;

        assertor::assert_that!(text).is_err();
    }
}
