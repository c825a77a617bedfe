// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures which end a verification request and surface as an `Error` verdict
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("OCR failed : {0}")]
    Ocr(String),
    #[error("online verification failed (scraping : {fetch}) (browser automation : {browser})")]
    Verification { fetch: String, browser: String },
}
