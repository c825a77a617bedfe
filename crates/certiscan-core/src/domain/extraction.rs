// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static KNOWN_CERTIFICATE_PLATFORMS: [&str; 20] = [
    "credly.com",
    "coursera.org",
    "edx.org",
    "udemy.com",
    "linkedin.com/learning",
    "skillshare.com",
    "udacity.com",
    "codecademy.com",
    "freecodecamp.org",
    "khanacademy.org",
    "pluralsight.com",
    "treehouse.com",
    "adobe.com",
    "microsoft.com",
    "google.com",
    "amazon.com",
    "ibm.com",
    "oracle.com",
    "salesforce.com",
    "unstop.com",
];

static TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', ')', ']', '}', '!', '?', '\'', '"'];

static SCHEME_QUALIFIED_URLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhttps?://[^\s<>"'(){}\[\]]+"#).expect("valid pattern for scheme-qualified urls")
});

static BARE_DOMAINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:www\.)?[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}(?:/[^\s<>"'(){}\[\]]*)?"#)
        .expect("valid pattern for bare domains")
});

static KNOWN_PLATFORMS: LazyLock<Regex> = LazyLock::new(|| {
    let platforms = KNOWN_CERTIFICATE_PLATFORMS
        .iter()
        .map(|platform| regex::escape(platform))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = format!(
        r#"(?i)(?:https?://)?(?:[a-z0-9-]+\.)*(?:{})(?:/[^\s<>"'(){{}}\[\]]*)?"#,
        platforms
    );
    Regex::new(&pattern).expect("valid pattern for known certificate platforms")
});

/// Finds the verification URL in free text.
///
/// Matches from every pattern family are collected in priority order (scheme-qualified urls,
/// bare domains, known certificate platforms) and deduplicated. The first candidate which
/// normalizes into a well-formed absolute URL wins.
pub fn extract_url(text: &str) -> Option<Url> {
    let mut candidates: Vec<&str> = Vec::new();

    for pattern in [&*SCHEME_QUALIFIED_URLS, &*BARE_DOMAINS, &*KNOWN_PLATFORMS] {
        for found in pattern.find_iter(text) {
            let candidate = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if !candidate.is_empty() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let selected = candidates.into_iter().find_map(normalize);

    match &selected {
        Some(url) => log::info!("[certiscan.extractor] selected {}", url),
        None => log::info!("[certiscan.extractor] no verification url found"),
    }

    selected
}

/// Reads the verification URL carried by a decoded QR payload.
///
/// A payload which already is an absolute http(s) URL is taken verbatim. Anything else is
/// searched like free text.
pub fn url_from_payload(payload: &str) -> Option<Url> {
    let verbatim = Url::parse(payload.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host());

    match verbatim {
        Some(url) => {
            log::info!("[certiscan.extractor] payload is a url : {}", url);
            Some(url)
        },
        None => extract_url(payload),
    }
}

fn normalize(candidate: &str) -> Option<Url> {
    let lowercase = candidate.to_ascii_lowercase();
    let with_scheme = if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
        candidate.to_string()
    } else {
        format!("https://{}", candidate)
    };

    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?;

    let top_level_domain = host.rsplit('.').next()?;
    let well_formed_host = host.contains('.')
        && top_level_domain.len() >= 2
        && top_level_domain.chars().all(|character| character.is_ascii_alphabetic());

    match (url.scheme(), well_formed_host) {
        ("http" | "https", true) => Some(url),
        _ => None,
    }
}
