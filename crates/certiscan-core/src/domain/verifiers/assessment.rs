// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::keywords::{VERIFICATION_KEYWORDS, find_keywords};
use crate::domain::models::{OnlineVerification, PageEvidence, VerificationMethod, VerificationStatus};
use url::Url;

/// Judges a page fetched over plain HTTP, trusting only keywords in its title and text
pub fn scraping_outcome(url: &Url, evidence: PageEvidence) -> OnlineVerification {
    let haystacks = [evidence.title.as_str(), evidence.body_text.as_str()];
    let found_keywords = find_keywords(&haystacks, &VERIFICATION_KEYWORDS);

    let status = if found_keywords.is_empty() {
        VerificationStatus::Unknown
    } else {
        VerificationStatus::Valid
    };

    OnlineVerification {
        status,
        method: VerificationMethod::OnlineScraping,
        url: url.clone(),
        found_keywords,
        details: evidence.details,
    }
}

/// Judges a page rendered by a browser.
///
/// Headings and certificate-tagged blocks count as evidence too. Since the keyword list covers
/// "certificate" and "certified", a title or block mentioning a certificate is enough.
pub fn rendering_outcome(url: &Url, evidence: PageEvidence) -> OnlineVerification {
    let mut haystacks = vec![evidence.title.as_str(), evidence.body_text.as_str()];
    haystacks.extend(evidence.highlighted_blocks.iter().map(String::as_str));

    let found_keywords = find_keywords(&haystacks, &VERIFICATION_KEYWORDS);

    let status = if !found_keywords.is_empty() {
        VerificationStatus::Valid
    } else {
        VerificationStatus::Unknown
    };

    OnlineVerification {
        status,
        method: VerificationMethod::BrowserAutomation,
        url: url.clone(),
        found_keywords,
        details: evidence.details,
    }
}
