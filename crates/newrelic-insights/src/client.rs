// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the New Relic Insights insert and query APIs.
//!
//! Every call validates its input and configuration first, then builds its own
//! HTTP client, performs a single request and drops the connection. Nothing is
//! retried and nothing is shared between calls except the [`Config`].

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiViolation, Error};
use crate::event::{AttributeValue, Event};
use crate::http_utils::{build_client, redact_headers};
use crate::keywords::is_valid_event_type;
use crate::query::Query;

const INSERT_KEY_HEADER: &str = "x-insert-key";
const QUERY_KEY_HEADER: &str = "x-query-key";
const EVENT_TYPE_ATTRIBUTE: &str = "eventType";

#[derive(Debug, Clone, Default)]
pub struct Client {
    config: Config,
}

impl Client {
    /// Creates an uninitialized client. The account id and the keys must be
    /// set before [`Client::submit`] or [`Client::query`] can succeed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: Config) -> Self {
        Client { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn account_id(&self) -> u64 {
        self.config.account_id
    }

    pub fn set_account_id(&mut self, account_id: u64) {
        self.config.account_id = account_id;
    }

    pub fn insert_key(&self) -> Option<&str> {
        self.config.insert_key.as_deref()
    }

    pub fn set_insert_key(&mut self, insert_key: impl Into<String>) {
        self.config.insert_key = Some(insert_key.into());
    }

    pub fn query_key(&self) -> Option<&str> {
        self.config.query_key.as_deref()
    }

    pub fn set_query_key(&mut self, query_key: impl Into<String>) {
        self.config.query_key = Some(query_key.into());
    }

    /// Submits a custom event to the Insights insert API.
    ///
    /// The event type is validated and injected into the payload as
    /// `eventType`. The status returned by the API is handed back as is, so a
    /// 4xx or 5xx answer is still `Ok`; only transport failures become
    /// [`Error::Insert`].
    pub async fn submit<E: Event + ?Sized>(&self, event: &E) -> Result<StatusCode, Error> {
        let insert_key = self.require_key(self.config.insert_key.as_deref(), "insert key")?;

        let event_type = event.event_type();
        if !is_valid_event_type(event_type) {
            return Err(ApiViolation::InvalidEventType(event_type.to_string()).into());
        }

        let mut payload = event.attributes().as_map().clone();
        payload.insert(
            EVENT_TYPE_ATTRIBUTE.to_string(),
            AttributeValue::from(event_type),
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(INSERT_KEY_HEADER, header_value(insert_key, "insert key")?);

        let url = self.config.events_url();
        debug!(
            method = "POST",
            url = %url,
            headers = ?redact_headers(&headers),
            event_type = %event_type,
            attributes = payload.len(),
            "insights HTTP request"
        );

        let client = build_client(self.config.proxy_url.as_deref(), self.config.timeout)
            .map_err(Error::Insert)?;
        let response = client
            .post(&url)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(Error::Insert)?;

        let status = response.status();
        debug!(url = %url, status = %status, "insights HTTP response");
        Ok(status)
    }

    /// Runs an NRQL query and returns the JSON body exactly as received.
    ///
    /// A body carrying a string `error` field is turned into
    /// [`Error::Rejected`]; a body that is not a JSON object is reported as
    /// [`Error::MalformedResponse`].
    pub async fn query(&self, query: &Query) -> Result<String, Error> {
        let query_key = self.require_key(self.config.query_key.as_deref(), "query key")?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(QUERY_KEY_HEADER, header_value(query_key, "query key")?);

        let url = self.config.query_url(&query.query_string());
        debug!(
            method = "GET",
            url = %url,
            headers = ?redact_headers(&headers),
            "insights HTTP request"
        );

        let client = build_client(self.config.proxy_url.as_deref(), self.config.timeout)
            .map_err(Error::Query)?;
        let response = client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(Error::Query)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Query)?;
        debug!(
            url = %url,
            status = %status,
            content_length = body.len(),
            "insights HTTP response"
        );

        check_query_response(&body)?;
        Ok(body)
    }

    fn require_key<'a>(
        &self,
        key: Option<&'a str>,
        key_name: &'static str,
    ) -> Result<&'a str, Error> {
        match key {
            Some(key) if self.config.account_id > 0 && !key.trim().is_empty() => Ok(key),
            _ => Err(Error::Uninitialized(key_name)),
        }
    }
}

fn header_value(key: &str, key_name: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(key)
        .map_err(|_| Error::InvalidConfig(format!("{key_name} is not a valid header value")))
}

/// Looks for an `error` message in a query response body.
///
/// Only a string `error` is treated as a rejection; any other value is left
/// for the caller to inspect.
fn check_query_response(body: &str) -> Result<(), Error> {
    let results: serde_json::Map<String, Value> =
        serde_json::from_str(body).map_err(Error::MalformedResponse)?;
    if let Some(Value::String(message)) = results.get("error") {
        return Err(Error::Rejected(message.clone()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::CustomEvent;
    use tracing_test::traced_test;

    fn unreachable_config() -> Config {
        // Port 9 (discard) on localhost; none of these tests may reach the network
        Config {
            insights_collector_url: Some("http://127.0.0.1:9".to_string()),
            insights_api_url: Some("http://127.0.0.1:9".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_accessors() {
        let mut client = Client::new();
        assert_eq!(client.account_id(), 0);
        assert_eq!(client.insert_key(), None);
        assert_eq!(client.query_key(), None);

        client.set_account_id(12);
        client.set_insert_key("insert");
        client.set_query_key("query");
        assert_eq!(client.account_id(), 12);
        assert_eq!(client.insert_key(), Some("insert"));
        assert_eq!(client.query_key(), Some("query"));
        assert_eq!(client.config().account_id, 12);
    }

    #[tokio::test]
    async fn test_uninitialized_client_submit() {
        let client = Client::from_config(unreachable_config());
        let event = CustomEvent::new("test");
        assert!(matches!(
            client.submit(&event).await,
            Err(Error::Uninitialized("insert key"))
        ));
    }

    #[tokio::test]
    async fn test_submit_requires_account_id() {
        let mut client = Client::from_config(unreachable_config());
        client.set_insert_key("test");
        let event = CustomEvent::new("test");
        assert!(matches!(
            client.submit(&event).await,
            Err(Error::Uninitialized(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_insert_key() {
        let mut client = Client::from_config(unreachable_config());
        client.set_account_id(1);
        client.set_insert_key("   ");
        let event = CustomEvent::new("test");
        assert!(matches!(
            client.submit(&event).await,
            Err(Error::Uninitialized("insert key"))
        ));
    }

    #[tokio::test]
    async fn test_submit_ignores_query_key() {
        let mut client = Client::from_config(unreachable_config());
        client.set_account_id(1);
        client.set_query_key("query-only");
        let event = CustomEvent::new("test");
        assert!(matches!(
            client.submit(&event).await,
            Err(Error::Uninitialized("insert key"))
        ));
    }

    #[tokio::test]
    async fn test_invalid_event_type() {
        let mut client = Client::from_config(unreachable_config());
        client.set_account_id(1);
        client.set_insert_key("test");
        let event = CustomEvent::new("Bad.Event");
        match client.submit(&event).await {
            Err(Error::ApiViolation(ApiViolation::InvalidEventType(event_type))) => {
                assert_eq!(event_type, "Bad.Event");
            }
            other => panic!("expected an invalid event type error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insert_key_must_be_a_header_value() {
        let mut client = Client::from_config(unreachable_config());
        client.set_account_id(1);
        client.set_insert_key("bad\nkey");
        let event = CustomEvent::new("test");
        assert!(matches!(
            client.submit(&event).await,
            Err(Error::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_uninitialized_client_query() {
        let mut client = Client::from_config(unreachable_config());
        client.set_account_id(1);
        client.set_insert_key("insert-only");
        let query = Query::new("SELECT * FROM Transaction");
        assert!(matches!(
            client.query(&query).await,
            Err(Error::Uninitialized("query key"))
        ));
    }

    #[test]
    fn test_check_query_response_error_message() {
        match check_query_response(r#"{"error": "Invalid NRQL"}"#) {
            Err(Error::Rejected(message)) => assert_eq!(message, "Invalid NRQL"),
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_check_query_response_results() {
        assert!(check_query_response(r#"{"results": []}"#).is_ok());
        assert!(check_query_response(r#"{"results": [{"count": 3}], "metadata": {}}"#).is_ok());
    }

    #[test]
    fn test_check_query_response_non_string_error_is_ignored() {
        assert!(check_query_response(r#"{"error": {"code": 1}}"#).is_ok());
        assert!(check_query_response(r#"{"error": null}"#).is_ok());
    }

    #[test]
    fn test_check_query_response_malformed() {
        assert!(matches!(
            check_query_response("<html>Bad gateway</html>"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            check_query_response(r#"["not", "an", "object"]"#),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            check_query_response(""),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_logs_redact_keys() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/accounts/7/events")
            .with_status(202)
            .create_async()
            .await;

        let client = Client::from_config(Config {
            account_id: 7,
            insert_key: Some("super-secret-key".to_string()),
            insights_collector_url: Some(server.url()),
            ..Config::default()
        });
        let status = client.submit(&CustomEvent::new("test")).await.unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(logs_contain("insights HTTP request"));
        assert!(logs_contain("<redacted>"));
        assert!(!logs_contain("super-secret-key"));
        mock.assert_async().await;
    }
}
