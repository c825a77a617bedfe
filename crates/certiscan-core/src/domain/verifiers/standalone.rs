// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::PageInspection;
use crate::domain::models::OnlineVerification;
use crate::infra::browser::HeadlessBrowser;
use crate::infra::networking::scraping::HttpPageScraper;
use url::Url;
#[cfg(test)]
use crate::domain::models::{CertificateDetails, VerificationMethod, VerificationStatus};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// First tier, a plain HTTP fetch
pub enum PageScraper {
    Http(HttpPageScraper),
    #[cfg(test)]
    Fake(FakePageInspector),
}

impl PageInspection for PageScraper {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification> {
        match self {
            PageScraper::Http(delegate) => delegate.inspect(url).await,
            #[cfg(test)]
            PageScraper::Fake(fake) => fake.inspect(url).await,
        }
    }
}

/// Second tier, a full browser rendering
pub enum PageRenderer {
    HeadlessBrowser(HeadlessBrowser),
    #[cfg(test)]
    Fake(FakePageInspector),
}

impl PageInspection for PageRenderer {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification> {
        match self {
            PageRenderer::HeadlessBrowser(delegate) => delegate.inspect(url).await,
            #[cfg(test)]
            PageRenderer::Fake(fake) => fake.inspect(url).await,
        }
    }
}

#[cfg(test)]
pub struct FakePageInspector {
    outcome: Result<(VerificationStatus, VerificationMethod, CertificateDetails), String>,
    calls: AtomicUsize,
}

#[cfg(test)]
impl FakePageInspector {
    pub fn judging(status: VerificationStatus, method: VerificationMethod) -> Self {
        Self {
            outcome: Ok((status, method, CertificateDetails::default())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_recipient(mut self, recipient_name: &str) -> Self {
        if let Ok((_, _, details)) = &mut self.outcome {
            details.recipient_name = Some(recipient_name.to_string());
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl PageInspection for FakePageInspector {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            Ok((status, method, details)) => Ok(OnlineVerification {
                status: *status,
                method: *method,
                url: url.clone(),
                found_keywords: vec![],
                details: details.clone(),
            }),
            Err(reason) => anyhow::bail!("{}", reason),
        }
    }
}
