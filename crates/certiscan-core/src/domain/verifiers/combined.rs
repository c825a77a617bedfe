// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::errors::CertificateError;
use crate::domain::interfaces::{OnlineVerifying, PageInspection};
use crate::domain::models::OnlineVerification;
use crate::domain::verifiers::standalone::{PageRenderer, PageScraper};
use url::Url;

/// Escalates from a plain fetch to browser rendering.
///
/// The renderer only runs once the scraper has failed, never in parallel with it.
pub struct TieredOnlineVerifier {
    scraper: PageScraper,
    renderer: PageRenderer,
}

impl TieredOnlineVerifier {
    pub fn new(scraper: PageScraper, renderer: PageRenderer) -> Self {
        Self { scraper, renderer }
    }
}

impl OnlineVerifying for TieredOnlineVerifier {
    async fn verify(&self, url: &Url) -> Result<OnlineVerification, CertificateError> {
        let fetch_failure = match self.scraper.inspect(url).await {
            Ok(verification) => return Ok(verification),
            Err(failure) => failure,
        };

        log::warn!(
            "[certiscan.verifier] scraping {} failed | reason = {:#}; falling back to browser automation",
            url,
            fetch_failure
        );

        match self.renderer.inspect(url).await {
            Ok(verification) => Ok(verification),
            Err(browser_failure) => {
                log::error!(
                    "[certiscan.verifier] browser automation failed for {} | reason = {:#}",
                    url,
                    browser_failure
                );
                Err(CertificateError::Verification {
                    fetch: format!("{:#}", fetch_failure),
                    browser: format!("{:#}", browser_failure),
                })
            },
        }
    }
}
