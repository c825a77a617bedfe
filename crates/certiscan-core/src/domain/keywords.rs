// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

/// Words which, on a verification page, indicate the certificate was confirmed
pub static VERIFICATION_KEYWORDS: [&str; 6] = ["verified", "valid", "authentic", "issued", "certified", "certificate"];

/// Words which, in OCR text, indicate the image is a certificate at all
pub static CERTIFICATE_KEYWORDS: [&str; 6] = [
    "certificate",
    "certified",
    "completion",
    "achievement",
    "course",
    "program",
];

/// Case-insensitive substring search, returning matches in keyword order
pub fn find_keywords(haystacks: &[&str], keywords: &[&str]) -> Vec<String> {
    let lowercase = haystacks
        .iter()
        .map(|haystack| haystack.to_lowercase())
        .collect::<Vec<_>>();

    keywords
        .iter()
        .filter(|keyword| lowercase.iter().any(|haystack| haystack.contains(*keyword)))
        .map(|keyword| keyword.to_string())
        .collect()
}
