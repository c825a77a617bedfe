// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::preprocessing::PreprocessingStrategy;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerificationStatus {
    Valid,
    Unknown,
    Partial,
    Invalid,
    Error,
    NameMismatch,
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            VerificationStatus::Valid => "Valid",
            VerificationStatus::Unknown => "Unknown",
            VerificationStatus::Partial => "Partial",
            VerificationStatus::Invalid => "Invalid",
            VerificationStatus::Error => "Error",
            VerificationStatus::NameMismatch => "NameMismatch",
        };
        f.write_str(status)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerificationMethod {
    #[serde(rename = "QR Code")]
    QrCode,
    #[serde(rename = "OCR + Online Verification")]
    OcrWithOnlineVerification,
    #[serde(rename = "OCR Text Analysis")]
    OcrTextAnalysis,
    #[serde(rename = "OCR")]
    Ocr,
    #[serde(rename = "Browser Automation")]
    BrowserAutomation,
    #[serde(rename = "Online Scraping")]
    OnlineScraping,
}

impl Display for VerificationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            VerificationMethod::QrCode => "QR Code",
            VerificationMethod::OcrWithOnlineVerification => "OCR + Online Verification",
            VerificationMethod::OcrTextAnalysis => "OCR Text Analysis",
            VerificationMethod::Ocr => "OCR",
            VerificationMethod::BrowserAutomation => "Browser Automation",
            VerificationMethod::OnlineScraping => "Online Scraping",
        };
        f.write_str(method)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailField {
    RecipientName,
    CourseName,
    Issuer,
    IssueDate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
}

impl CertificateDetails {
    pub fn set(&mut self, field: DetailField, value: String) {
        let slot = match field {
            DetailField::RecipientName => &mut self.recipient_name,
            DetailField::CourseName => &mut self.course_name,
            DetailField::Issuer => &mut self.issuer,
            DetailField::IssueDate => &mut self.issue_date,
        };
        *slot = Some(value);
    }

    pub fn get(&self, field: DetailField) -> Option<&str> {
        match field {
            DetailField::RecipientName => self.recipient_name.as_deref(),
            DetailField::CourseName => self.course_name.as_deref(),
            DetailField::Issuer => self.issuer.as_deref(),
            DetailField::IssueDate => self.issue_date.as_deref(),
        }
    }
}

/// What one tier of online verification learned from a rendered HTML document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageEvidence {
    pub title: String,
    pub body_text: String,
    /// Headings and elements tagged with a certificate-like class, in document order
    pub highlighted_blocks: Vec<String>,
    pub details: CertificateDetails,
}

/// Outcome of a tier which managed to load and inspect the verification page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnlineVerification {
    pub status: VerificationStatus,
    pub method: VerificationMethod,
    pub url: Url,
    pub found_keywords: Vec<String>,
    pub details: CertificateDetails,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionAttempt {
    pub index: usize,
    pub strategy: PreprocessingStrategy,
}

impl DetectionAttempt {
    pub fn new(index: usize, strategy: PreprocessingStrategy) -> Self {
        Self { index, strategy }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedCode {
    pub attempt: DetectionAttempt,
    pub payload: String,
}

impl Display for DetectionAttempt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "attempt #{}/{} ({})",
            self.index,
            PreprocessingStrategy::ALL.len(),
            self.strategy
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationVerdict {
    pub status: VerificationStatus,
    pub verification_method: VerificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CertificateDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl VerificationVerdict {
    fn new(status: VerificationStatus, verification_method: VerificationMethod) -> Self {
        Self {
            status,
            verification_method,
            extracted_url: None,
            details: None,
            ocr_text: None,
            found_keywords: None,
            name_match: None,
            reason: None,
            url: None,
        }
    }

    /// Success-path verdict built on top of a tier outcome, reported under `method`
    pub fn verified(verification: OnlineVerification, method: VerificationMethod) -> Self {
        let mut verdict = Self::new(verification.status, method);
        if verification.status == VerificationStatus::Unknown {
            verdict.reason = Some("no verification evidence found on the certificate page".to_string());
        }
        verdict.details = Some(verification.details);
        verdict.url = Some(verification.url.to_string());
        verdict
    }

    pub fn failed(method: VerificationMethod, reason: String) -> Self {
        let mut verdict = Self::new(VerificationStatus::Error, method);
        verdict.reason = Some(reason);
        verdict
    }

    pub fn partial(found_keywords: Vec<String>) -> Self {
        let mut verdict = Self::new(VerificationStatus::Partial, VerificationMethod::OcrTextAnalysis);
        verdict.found_keywords = Some(found_keywords);
        verdict.reason = Some("certificate text detected but no verification URL found".to_string());
        verdict
    }

    pub fn invalid() -> Self {
        let mut verdict = Self::new(VerificationStatus::Invalid, VerificationMethod::OcrTextAnalysis);
        verdict.reason = Some("no certificate content or verification URL found".to_string());
        verdict
    }

    pub fn with_extracted_url(mut self, extracted_url: &Url) -> Self {
        self.extracted_url = Some(extracted_url.to_string());
        self
    }

    pub fn with_ocr_text(mut self, ocr_text: String) -> Self {
        self.ocr_text = Some(ocr_text);
        self
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Console,
    Json,
    Html,
}

#[cfg(test)]
mod tests {
    use crate::domain::models::{
        CertificateDetails, OnlineVerification, VerificationMethod, VerificationStatus, VerificationVerdict,
    };
    use assertor::{EqualityAssertion, OptionAssertion};
    use url::Url;

    #[test]
    fn should_serialize_verdict_with_camel_case_keys_and_without_absent_fields() {
        let url = Url::parse("https://credly.com/badges/abc123").expect("valid url");
        let details = CertificateDetails {
            recipient_name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let verification = OnlineVerification {
            status: VerificationStatus::Valid,
            method: VerificationMethod::OnlineScraping,
            url: url.clone(),
            found_keywords: vec!["verified".to_string()],
            details,
        };

        let verdict = VerificationVerdict::verified(verification, VerificationMethod::QrCode).with_extracted_url(&url);
        let serialized = serde_json::to_value(&verdict).expect("serializable verdict");

        let expected = serde_json::json!({
            "status": "Valid",
            "verificationMethod": "QR Code",
            "extractedUrl": "https://credly.com/badges/abc123",
            "details": { "recipientName": "Jane Doe" },
            "url": "https://credly.com/badges/abc123"
        });

        assertor::assert_that!(serialized).is_equal_to(expected);
    }

    #[test]
    fn should_explain_unknown_verdicts() {
        let verification = OnlineVerification {
            status: VerificationStatus::Unknown,
            method: VerificationMethod::BrowserAutomation,
            url: Url::parse("https://example.org/cert").expect("valid url"),
            found_keywords: vec![],
            details: CertificateDetails::default(),
        };

        let verdict = VerificationVerdict::verified(verification, VerificationMethod::OcrWithOnlineVerification);

        assertor::assert_that!(verdict.status).is_equal_to(VerificationStatus::Unknown);
        assertor::assert_that!(verdict.reason).is_some();
    }

    #[test]
    fn should_describe_partial_and_invalid_outcomes() {
        let partial = VerificationVerdict::partial(vec!["certificate".to_string()]);
        let invalid = VerificationVerdict::invalid();

        assertor::assert_that!(partial.verification_method).is_equal_to(VerificationMethod::OcrTextAnalysis);
        assertor::assert_that!(partial.reason.as_deref())
            .is_equal_to(Some("certificate text detected but no verification URL found"));
        assertor::assert_that!(invalid.status).is_equal_to(VerificationStatus::Invalid);
        assertor::assert_that!(invalid.reason.as_deref())
            .is_equal_to(Some("no certificate content or verification URL found"));
    }
}
