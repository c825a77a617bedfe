// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::PageInspection;
use crate::domain::models::OnlineVerification;
use crate::domain::verifiers::assessment;
use crate::infra::html;
use crate::infra::networking::http::BROWSER_USER_AGENT;
use anyhow::{Context, anyhow, bail};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

/// Renders verification pages with a headless Chromium-family browser.
///
/// The browser loads the page, lets scripts run for the settle budget and then dumps the live DOM,
/// which is judged with the same keyword rules as scraped pages plus headings and certificate blocks.
pub struct HeadlessBrowser {
    binary: PathBuf,
    navigation_timeout: Duration,
    settle_time: Duration,
}

impl HeadlessBrowser {
    pub fn new(binary: PathBuf, navigation_timeout: Duration, settle_time: Duration) -> Self {
        Self {
            binary,
            navigation_timeout,
            settle_time,
        }
    }

    async fn render(&self, url: &Url) -> anyhow::Result<String> {
        let rendering = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg(format!("--user-agent={}", BROWSER_USER_AGENT))
            .arg(format!("--timeout={}", self.navigation_timeout.as_millis()))
            .arg(format!("--virtual-time-budget={}", self.settle_time.as_millis()))
            .arg("--dump-dom")
            .arg(url.as_str())
            .kill_on_drop(true)
            .output();

        let budget = self.navigation_timeout + self.settle_time;
        let output = tokio::time::timeout(budget, rendering)
            .await
            .map_err(|_| anyhow!("certiscan.browser : rendering {} timed out after {:?}", url, budget))?
            .with_context(|| format!("certiscan.browser : cannot launch {:?}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("certiscan.browser : cannot render {} ({})", url, stderr.trim());
        }

        let dom = String::from_utf8_lossy(&output.stdout).to_string();
        if dom.trim().is_empty() {
            bail!("certiscan.browser : {} rendered an empty document", url);
        }

        Ok(dom)
    }
}

impl PageInspection for HeadlessBrowser {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification> {
        log::info!("[certiscan.browser] rendering {}", url);

        let dom = self.render(url).await?;
        let evidence = html::parse_page(&dom);
        let outcome = assessment::rendering_outcome(url, evidence);

        log::info!(
            "[certiscan.browser] {} judged as {} (keywords = {:?})",
            url,
            outcome.status,
            outcome.found_keywords
        );

        Ok(outcome)
    }
}
