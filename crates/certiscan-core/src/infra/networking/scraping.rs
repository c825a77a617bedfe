// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::PageInspection;
use crate::domain::models::OnlineVerification;
use crate::domain::verifiers::assessment;
use crate::infra::html;
use crate::infra::networking::http::HTTPClient;
use anyhow::{Context, bail};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetch tier of online verification.
///
/// The deadline covers the whole tier, retries included.
pub struct HttpPageScraper {
    http_client: Arc<HTTPClient>,
    deadline: Duration,
}

impl HttpPageScraper {
    pub fn new(http_client: Arc<HTTPClient>, deadline: Duration) -> Self {
        Self { http_client, deadline }
    }

    async fn fetch_page(&self, url: &Url) -> anyhow::Result<String> {
        let response = self
            .http_client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("certiscan.scraper : cannot reach {}", url))?;

        if !response.status().is_success() {
            bail!(
                "certiscan.scraper : cannot fetch {} (HTTP status = {})",
                url,
                response.status()
            );
        }

        let raw_html = response
            .text()
            .await
            .with_context(|| format!("certiscan.scraper : cannot read page body from {}", url))?;

        Ok(raw_html)
    }
}

impl PageInspection for HttpPageScraper {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification> {
        log::info!("[certiscan.scraper] fetching {}", url);

        let Ok(fetched) = tokio::time::timeout(self.deadline, self.fetch_page(url)).await else {
            bail!("certiscan.scraper : no page from {} within {:?}", url, self.deadline);
        };

        let raw_html = fetched?;
        let evidence = html::parse_page(&raw_html);
        let outcome = assessment::scraping_outcome(url, evidence);

        log::info!(
            "[certiscan.scraper] {} judged as {} (keywords = {:?})",
            url,
            outcome.status,
            outcome.found_keywords
        );

        Ok(outcome)
    }
}
