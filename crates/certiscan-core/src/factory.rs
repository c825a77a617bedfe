// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::certiscan::Certiscan;
use crate::domain::detection::{CodeDetector, CodeReader};
use crate::domain::orchestrator::CertificateVerifier;
use crate::domain::recognition::TextRecognizer;
use crate::domain::verifiers::combined::TieredOnlineVerifier;
use crate::domain::verifiers::standalone::{PageRenderer, PageScraper};
use crate::infra::browser::HeadlessBrowser;
use crate::infra::cli::reporter::{ConsoleReporter, HtmlReporter};
use crate::infra::networking::http::{FETCH_TIMEOUT, HTTP_CLIENT};
use crate::infra::networking::scraping::HttpPageScraper;
use crate::infra::ocr::TesseractRecognizer;
use crate::infra::qrcodes::RqrrCodeReader;
use anyhow::Context;
use std::env::{current_dir, temp_dir};
use std::path::PathBuf;
use std::time::Duration;

pub static DETECTION_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

pub static BROWSER_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

pub static BROWSER_SETTLE_TIME: Duration = Duration::from_secs(3);

pub struct CertiscanSettings {
    pub tesseract: PathBuf,
    pub browser: PathBuf,
    pub use_colors: bool,
}

fn staging_folder() -> PathBuf {
    temp_dir().join("certiscan")
}

fn code_detector() -> CodeDetector {
    CodeDetector::new(CodeReader::Rqrr(RqrrCodeReader), DETECTION_ATTEMPT_TIMEOUT)
}

fn text_recognizer(tesseract: PathBuf) -> TextRecognizer {
    TextRecognizer::Tesseract(TesseractRecognizer::new(tesseract))
}

fn online_verifier(browser: PathBuf) -> TieredOnlineVerifier {
    let scraper = PageScraper::Http(HttpPageScraper::new(HTTP_CLIENT.clone(), FETCH_TIMEOUT));
    let renderer = PageRenderer::HeadlessBrowser(HeadlessBrowser::new(
        browser,
        BROWSER_NAVIGATION_TIMEOUT,
        BROWSER_SETTLE_TIME,
    ));
    TieredOnlineVerifier::new(scraper, renderer)
}

pub fn create_certiscan(settings: CertiscanSettings) -> anyhow::Result<Certiscan> {
    let verifier = CertificateVerifier::new(
        code_detector(),
        text_recognizer(settings.tesseract),
        online_verifier(settings.browser),
    );

    let reports_folder = current_dir().context("certiscan.factory : cannot evaluate current directory")?;

    Ok(Certiscan::new(
        verifier,
        staging_folder(),
        ConsoleReporter::new(settings.use_colors),
        HtmlReporter::new(reports_folder),
    ))
}
