// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::certiscan::CertiscanTask::{CheckUrl, ExtractUrl, VerifyCertificate};
use crate::domain::artifacts::UploadedArtifact;
use crate::domain::extraction::extract_url;
use crate::domain::interfaces::CertificateVerification;
use crate::domain::models::{ReportKind, VerificationVerdict};
use crate::domain::orchestrator::CertificateVerifier;
use crate::infra::cli::reporter::{ConsoleReporter, HtmlReporter};
use anyhow::bail;
use std::path::PathBuf;
use url::Url;

pub enum CertiscanTask {
    VerifyCertificate {
        image: PathBuf,
        caller_name: Option<String>,
        report: ReportKind,
    },
    CheckUrl {
        url: Url,
        report: ReportKind,
    },
    ExtractUrl(String),
}

pub struct Certiscan {
    verifier: CertificateVerifier,
    staging_folder: PathBuf,
    console_reporter: ConsoleReporter,
    html_reporter: HtmlReporter,
}

impl Certiscan {
    pub(crate) fn new(
        verifier: CertificateVerifier,
        staging_folder: PathBuf,
        console_reporter: ConsoleReporter,
        html_reporter: HtmlReporter,
    ) -> Self {
        Self {
            verifier,
            staging_folder,
            console_reporter,
            html_reporter,
        }
    }

    pub async fn execute(self, task: CertiscanTask) -> anyhow::Result<()> {
        match task {
            VerifyCertificate {
                image,
                caller_name,
                report,
            } => {
                let artifact = UploadedArtifact::stage(&image, &self.staging_folder)?;
                if report == ReportKind::Console {
                    self.console_reporter.report_verification_started(&image);
                }

                let verdict = self
                    .verifier
                    .verify_certificate(artifact, caller_name.as_deref())
                    .await;
                self.report(&verdict, report)?;
            },
            CheckUrl { url, report } => {
                if report == ReportKind::Console {
                    self.console_reporter.report_check_started(&url);
                }

                let verdict = self.verifier.verify_url(&url).await;
                self.report(&verdict, report)?;
            },
            ExtractUrl(text) => match extract_url(&text) {
                Some(url) => self.console_reporter.report_extracted_url(&url),
                None => bail!("certiscan.extractor : no verification URL found in the given text"),
            },
        }

        Ok(())
    }

    fn report(&self, verdict: &VerificationVerdict, report: ReportKind) -> anyhow::Result<()> {
        match report {
            ReportKind::Console => self.console_reporter.report_verdict(verdict),
            ReportKind::Json => self.console_reporter.report_verdict_as_json(verdict)?,
            ReportKind::Html => {
                self.html_reporter.report_verdict(verdict)?;
            },
        }

        Ok(())
    }
}
