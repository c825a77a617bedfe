// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::artifacts::UploadedArtifact;
use crate::domain::detection::CodeDetector;
use crate::domain::errors::CertificateError;
use crate::domain::extraction::{extract_url, url_from_payload};
use crate::domain::interfaces::{CertificateVerification, OnlineVerifying, TextRecognition};
use crate::domain::keywords::{CERTIFICATE_KEYWORDS, find_keywords};
use crate::domain::models::{VerificationMethod, VerificationStatus, VerificationVerdict};
use crate::domain::recognition::TextRecognizer;
use crate::domain::verifiers::combined::TieredOnlineVerifier;
use anyhow::Context;
use image::{DynamicImage, ImageReader};
use std::path::Path;
use url::Url;

pub static OCR_TEXT_SAMPLE_LENGTH: usize = 500;

/// Entry point of the verification pipeline.
///
/// Tries a QR code first and falls back to OCR, then runs online verification on whatever
/// URL came out of it. Every request ends with a well-formed verdict, and the uploaded
/// artifact is released on every exit path.
pub struct CertificateVerifier {
    detector: CodeDetector,
    recognizer: TextRecognizer,
    online_verifier: TieredOnlineVerifier,
}

impl CertificateVerifier {
    pub fn new(detector: CodeDetector, recognizer: TextRecognizer, online_verifier: TieredOnlineVerifier) -> Self {
        Self {
            detector,
            recognizer,
            online_verifier,
        }
    }

    /// Runs online verification alone, for a URL the caller already knows
    pub async fn verify_url(&self, url: &Url) -> VerificationVerdict {
        match self.online_verifier.verify(url).await {
            Ok(verification) => {
                let method = verification.method;
                VerificationVerdict::verified(verification, method)
            },
            Err(failure) => VerificationVerdict::failed(VerificationMethod::BrowserAutomation, failure.to_string()),
        }
    }

    async fn detect_code_url(&self, image_path: &Path) -> Option<Url> {
        let image = match load_image(image_path) {
            Ok(decoded) => decoded,
            Err(failure) => {
                log::warn!("[certiscan.orchestrator] skipping QR detection | reason = {:#}", failure);
                return None;
            },
        };

        let detected = self.detector.detect(&image).await?;
        let url = url_from_payload(&detected.payload);

        if url.is_none() {
            log::info!("[certiscan.orchestrator] QR payload carries no verification url");
        }

        url
    }

    async fn verify_from_code(&self, url: Url) -> VerificationVerdict {
        match self.online_verifier.verify(&url).await {
            Ok(verification) => {
                VerificationVerdict::verified(verification, VerificationMethod::QrCode).with_extracted_url(&url)
            },
            Err(failure) => VerificationVerdict::failed(VerificationMethod::QrCode, failure.to_string()),
        }
    }

    async fn verify_from_text(&self, image_path: &Path) -> VerificationVerdict {
        let text = match self.recognizer.recognize(image_path).await {
            Ok(recognized) => recognized,
            Err(failure) => {
                let failure = CertificateError::Ocr(format!("{:#}", failure));
                log::error!("[certiscan.orchestrator] {}", failure);
                return VerificationVerdict::failed(VerificationMethod::Ocr, failure.to_string());
            },
        };

        let ocr_sample = text.chars().take(OCR_TEXT_SAMPLE_LENGTH).collect::<String>();

        if let Some(url) = extract_url(&text) {
            let verdict = match self.online_verifier.verify(&url).await {
                Ok(verification) => {
                    VerificationVerdict::verified(verification, VerificationMethod::OcrWithOnlineVerification)
                        .with_extracted_url(&url)
                },
                Err(failure) => VerificationVerdict::failed(VerificationMethod::Ocr, failure.to_string()),
            };
            return verdict.with_ocr_text(ocr_sample);
        }

        let found_keywords = find_keywords(&[text.as_str()], &CERTIFICATE_KEYWORDS);

        let verdict = if found_keywords.is_empty() {
            VerificationVerdict::invalid()
        } else {
            VerificationVerdict::partial(found_keywords)
        };

        verdict.with_ocr_text(ocr_sample)
    }
}

impl CertificateVerification for CertificateVerifier {
    async fn verify_certificate(&self, artifact: UploadedArtifact, caller_name: Option<&str>) -> VerificationVerdict {
        log::info!("[certiscan.orchestrator] verifying {:?}", artifact.path());

        let verdict = match self.detect_code_url(artifact.path()).await {
            Some(url) => self.verify_from_code(url).await,
            None => self.verify_from_text(artifact.path()).await,
        };

        let verdict = check_recipient_name(verdict, caller_name);
        log::info!(
            "[certiscan.orchestrator] verdict = {} (method = {})",
            verdict.status,
            verdict.verification_method
        );

        drop(artifact);
        verdict
    }
}

fn load_image(image_path: &Path) -> anyhow::Result<DynamicImage> {
    let image = ImageReader::open(image_path)
        .with_context(|| format!("cannot open {:?}", image_path))?
        .with_guessed_format()
        .with_context(|| format!("cannot guess image format of {:?}", image_path))?
        .decode()
        .with_context(|| format!("cannot decode {:?}", image_path))?;

    Ok(image)
}

/// Only runs when the page exposed a recipient; a missing recipient is never flagged
fn check_recipient_name(mut verdict: VerificationVerdict, caller_name: Option<&str>) -> VerificationVerdict {
    let Some(caller_name) = caller_name.map(str::trim).filter(|name| !name.is_empty()) else {
        return verdict;
    };

    let Some(recipient_name) = verdict
        .details
        .as_ref()
        .and_then(|details| details.recipient_name.clone())
    else {
        log::info!("[certiscan.orchestrator] no recipient name to compare against");
        return verdict;
    };

    let recipient = recipient_name.to_lowercase();
    let caller = caller_name.to_lowercase();
    let matches = recipient.contains(&caller) || caller.contains(&recipient);

    verdict.name_match = Some(matches);

    if !matches {
        verdict.status = VerificationStatus::NameMismatch;
        verdict.reason = Some(format!(
            "recipient name '{}' on the certificate does not match the provided name '{}'",
            recipient_name, caller_name
        ));
    }

    verdict
}

#[cfg(test)]
mod tests {
    use crate::domain::artifacts::UploadedArtifact;
    use crate::domain::detection::{CodeDetector, CodeReader, FakeCodeReader};
    use crate::domain::interfaces::CertificateVerification;
    use crate::domain::models::{VerificationMethod, VerificationStatus};
    use crate::domain::orchestrator::{CertificateVerifier, OCR_TEXT_SAMPLE_LENGTH};
    use crate::domain::recognition::{FakeTextRecognizer, TextRecognizer};
    use crate::domain::verifiers::combined::TieredOnlineVerifier;
    use crate::domain::verifiers::standalone::{FakePageInspector, PageRenderer, PageScraper};
    use assertor::{BooleanAssertion, EqualityAssertion, OptionAssertion};
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use std::time::Duration;
    use temp_dir::TempDir;
    use url::Url;

    fn uploaded_certificate(temp_dir: &TempDir, name: &str) -> PathBuf {
        let path = temp_dir.child(name);
        RgbImage::from_pixel(40, 30, Rgb([245, 245, 245]))
            .save(&path)
            .expect("certificate image saved");
        path
    }

    fn detector(reader: FakeCodeReader) -> CodeDetector {
        CodeDetector::new(CodeReader::Fake(reader), Duration::from_secs(5))
    }

    fn scraping_judging(status: VerificationStatus) -> TieredOnlineVerifier {
        TieredOnlineVerifier::new(
            PageScraper::Fake(FakePageInspector::judging(status, VerificationMethod::OnlineScraping)),
            PageRenderer::Fake(FakePageInspector::failing("not expected")),
        )
    }

    fn failing_online_verifier() -> TieredOnlineVerifier {
        TieredOnlineVerifier::new(
            PageScraper::Fake(FakePageInspector::failing("connection refused")),
            PageRenderer::Fake(FakePageInspector::failing("browser crashed")),
        )
    }

    #[tokio::test]
    async fn should_verify_certificate_from_qr_code() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "qr.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/abc123")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            scraping_judging(VerificationStatus::Valid),
        );

        let verdict = verifier
            .verify_certificate(UploadedArtifact::new(uploaded.clone()), None)
            .await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Valid);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::QrCode);
        assertor::assert_that!(verdict.extracted_url)
            .is_equal_to(Some("https://credly.com/badges/abc123".to_string()));
        assertor::assert_that!(verdict.ocr_text).is_none();
        assertor::assert_that!(verdict.name_match).is_none();
    }

    #[tokio::test]
    async fn should_report_error_when_qr_url_cannot_be_verified() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "qr.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(2, "https://coursera.org/verify/XYZ")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Error);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::QrCode);
        assertor::assert_that!(verdict.reason.unwrap_or_default().contains("browser crashed")).is_true();
    }

    #[tokio::test]
    async fn should_verify_url_found_by_ocr() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading(
                "Certificate of Completion\nVerify at coursera.org/verify/XYZ",
            )),
            scraping_judging(VerificationStatus::Unknown),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Unknown);
        assertor::assert_that!(verdict.verification_method)
            .is_equal_to(VerificationMethod::OcrWithOnlineVerification);
        assertor::assert_that!(verdict.extracted_url).is_equal_to(Some("https://coursera.org/verify/XYZ".to_string()));
        assertor::assert_that!(verdict.ocr_text).is_some();
        assertor::assert_that!(verdict.reason).is_some();
    }

    #[tokio::test]
    async fn should_report_ocr_method_when_ocr_url_cannot_be_verified() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading("https://credly.com/badges/abc123")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Error);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::Ocr);
    }

    #[tokio::test]
    async fn should_classify_certificate_text_without_url_as_partial() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading("This certificate is awarded to Jane Doe")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Partial);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::OcrTextAnalysis);
        assertor::assert_that!(verdict.found_keywords).is_equal_to(Some(vec!["certificate".to_string()]));
    }

    #[tokio::test]
    async fn should_classify_unrelated_text_as_invalid() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading("Grocery list: milk, eggs")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Invalid);
        assertor::assert_that!(verdict.reason).is_some();
        assertor::assert_that!(verdict.found_keywords).is_none();
    }

    #[tokio::test]
    async fn should_report_error_when_ocr_fails() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::failing("unsupported image")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded.clone()), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Error);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::Ocr);
        assertor::assert_that!(uploaded.exists()).is_false();
    }

    #[tokio::test]
    async fn should_fall_back_to_ocr_when_image_cannot_be_decoded() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = temp_dir.child("broken.png");
        std::fs::write(&uploaded, b"definitely not an image").expect("fixture written");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/never-read")),
            TextRecognizer::Fake(FakeTextRecognizer::reading("Course completion")),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Partial);
    }

    #[tokio::test]
    async fn should_flag_recipient_name_mismatch() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "qr.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/abc123")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            TieredOnlineVerifier::new(
                PageScraper::Fake(
                    FakePageInspector::judging(VerificationStatus::Valid, VerificationMethod::OnlineScraping)
                        .with_recipient("John Smith"),
                ),
                PageRenderer::Fake(FakePageInspector::failing("not expected")),
            ),
        );

        let verdict = verifier
            .verify_certificate(UploadedArtifact::new(uploaded), Some("Jon Smith"))
            .await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::NameMismatch);
        assertor::assert_that!(verdict.name_match).is_equal_to(Some(false));

        let reason = verdict.reason.unwrap_or_default();
        assertor::assert_that!(reason.contains("John Smith") && reason.contains("Jon Smith")).is_true();
    }

    #[tokio::test]
    async fn should_accept_partial_recipient_names_in_any_direction() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "qr.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/abc123")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            TieredOnlineVerifier::new(
                PageScraper::Fake(
                    FakePageInspector::judging(VerificationStatus::Valid, VerificationMethod::OnlineScraping)
                        .with_recipient("Jane"),
                ),
                PageRenderer::Fake(FakePageInspector::failing("not expected")),
            ),
        );

        let verdict = verifier
            .verify_certificate(UploadedArtifact::new(uploaded), Some("  JANE DOE "))
            .await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Valid);
        assertor::assert_that!(verdict.name_match).is_equal_to(Some(true));
    }

    #[tokio::test]
    async fn should_skip_name_check_without_recipient_or_caller_name() {
        let temp_dir = TempDir::new().expect("temporary folder");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/abc123")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            scraping_judging(VerificationStatus::Valid),
        );

        let without_recipient = verifier
            .verify_certificate(
                UploadedArtifact::new(uploaded_certificate(&temp_dir, "first.png")),
                Some("Jon Smith"),
            )
            .await;

        let blank_caller = verifier
            .verify_certificate(
                UploadedArtifact::new(uploaded_certificate(&temp_dir, "second.png")),
                Some("   "),
            )
            .await;

        assertor::assert_that!(without_recipient.status).is_equal_to(VerificationStatus::Valid);
        assertor::assert_that!(without_recipient.name_match).is_none();
        assertor::assert_that!(blank_caller.name_match).is_none();
    }

    #[tokio::test]
    async fn should_reach_same_verdict_for_same_image() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let original = uploaded_certificate(&temp_dir, "original.png");
        let staging_dir = temp_dir.child("staging");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading("Certificate of Achievement")),
            failing_online_verifier(),
        );

        let first = verifier
            .verify_certificate(
                UploadedArtifact::stage(&original, &staging_dir).expect("staged"),
                Some("Jane"),
            )
            .await;
        let second = verifier
            .verify_certificate(
                UploadedArtifact::stage(&original, &staging_dir).expect("staged"),
                Some("Jane"),
            )
            .await;

        assertor::assert_that!(first).is_equal_to(second);
        assertor::assert_that!(original.exists()).is_true();
    }

    #[tokio::test]
    async fn should_remove_uploaded_artifact_on_every_outcome() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let valid = uploaded_certificate(&temp_dir, "valid.png");
        let failing = uploaded_certificate(&temp_dir, "failing.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://credly.com/badges/abc123")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            failing_online_verifier(),
        );

        verifier.verify_certificate(UploadedArtifact::new(valid.clone()), None).await;
        verifier.verify_certificate(UploadedArtifact::new(failing.clone()), None).await;

        assertor::assert_that!(valid.exists()).is_false();
        assertor::assert_that!(failing.exists()).is_false();
    }

    #[tokio::test]
    async fn should_verify_known_urls_directly() {
        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            TieredOnlineVerifier::new(
                PageScraper::Fake(FakePageInspector::failing("HTTP status = 403")),
                PageRenderer::Fake(FakePageInspector::judging(
                    VerificationStatus::Valid,
                    VerificationMethod::BrowserAutomation,
                )),
            ),
        );

        let url = Url::parse("https://unstop.com/certificate-preview/abc").expect("valid url");
        let verdict = verifier.verify_url(&url).await;

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Valid);
        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::BrowserAutomation);
    }

    #[tokio::test]
    async fn should_verify_decoded_url_as_is() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "qr.png");

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::decoding_on_call(1, "https://verify.example.edu/cert?id=A(1)")),
            TextRecognizer::Fake(FakeTextRecognizer::failing("OCR not expected")),
            scraping_judging(VerificationStatus::Valid),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;

        assertor::assert_that!(verdict.verification_method).is_equal_to(VerificationMethod::QrCode);
        assertor::assert_that!(verdict.extracted_url)
            .is_equal_to(Some("https://verify.example.edu/cert?id=A(1)".to_string()));
    }

    #[tokio::test]
    async fn should_keep_only_a_sample_of_long_ocr_text() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let uploaded = uploaded_certificate(&temp_dir, "scan.png");
        let recognized = format!("Certificate of Achievement {}", "é".repeat(2000));

        let verifier = CertificateVerifier::new(
            detector(FakeCodeReader::never_decoding()),
            TextRecognizer::Fake(FakeTextRecognizer::reading(&recognized)),
            failing_online_verifier(),
        );

        let verdict = verifier.verify_certificate(UploadedArtifact::new(uploaded), None).await;
        let ocr_text = verdict.ocr_text.unwrap_or_default();

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Partial);
        assertor::assert_that!(ocr_text.chars().count()).is_equal_to(OCR_TEXT_SAMPLE_LENGTH);
        assertor::assert_that!(ocr_text.starts_with("Certificate of Achievement")).is_true();
    }
}
