// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

pub type HTTPClient = ClientWithMiddleware;

pub static MAX_HTTP_RETRY_ATTEMPTS: u32 = 2;

pub static FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Verification sites often refuse requests which do not look like a desktop browser
pub static BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

static ACCEPTED_CONTENT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

static ACCEPTED_LANGUAGES: &str = "en-US,en;q=0.9";

pub static HTTP_CLIENT: LazyLock<Arc<HTTPClient>> = LazyLock::new(|| {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPTED_CONTENT));
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static(ACCEPTED_LANGUAGES));

    let base_http_client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("HTTP client built from static settings");

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_HTTP_RETRY_ATTEMPTS);

    let retrier_http_client = reqwest_middleware::ClientBuilder::new(base_http_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();
    Arc::new(retrier_http_client)
});
