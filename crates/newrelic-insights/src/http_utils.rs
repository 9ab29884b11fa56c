// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;
use reqwest::header::HeaderMap;
use reqwest::ClientBuilder;

/// Creates a reqwest client builder with TLS configuration.
/// When the "rustls-tls" feature is enabled, rustls is selected explicitly;
/// otherwise reqwest's default TLS backend is used.
fn create_reqwest_client_builder() -> ClientBuilder {
    let builder = reqwest::Client::builder();
    #[cfg(feature = "rustls-tls")]
    let builder = builder.use_rustls_tls();
    builder
}

/// Builds a single-use client for one Insights API call.
///
/// `timeout` bounds connection establishment, each read, and the request as a
/// whole. Idle connections are not kept, so the connection is closed once the
/// response is dropped. Only the given proxy is used: proxies set through the
/// environment are ignored.
pub fn build_client(
    proxy_url: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    let builder = create_reqwest_client_builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .timeout(timeout)
        .pool_max_idle_per_host(0);
    let builder = match proxy_url {
        Some(proxy) => builder.proxy(reqwest::Proxy::https(proxy)?),
        None => builder.no_proxy(),
    };
    builder.build()
}

/// Returns a redacted view of request headers suitable for debug logging.
pub fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    const SENSITIVE_HEADERS: [&str; 2] = ["x-insert-key", "x-query-key"];

    headers
        .iter()
        .map(|(name, value)| {
            let lower = name.as_str().to_ascii_lowercase();
            let display = if SENSITIVE_HEADERS.contains(&lower.as_str()) {
                "<redacted>".to_string()
            } else {
                value
                    .to_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| "<non-utf8>".to_string())
            };
            (lower, display)
        })
        .collect()
}
