// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Connect, read and overall request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// New Relic data center hosting the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    pub fn insights_collector_url(&self) -> &'static str {
        match self {
            Region::Us => "https://insights-collector.newrelic.com",
            Region::Eu => "https://insights-collector.eu01.nr-data.net",
        }
    }

    pub fn insights_api_url(&self) -> &'static str {
        match self {
            Region::Us => "https://insights-api.newrelic.com",
            Region::Eu => "https://insights-api.eu.newrelic.com",
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            other => Err(Error::InvalidConfig(format!(
                "unknown New Relic region '{other}', expected 'us' or 'eu'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 0 means unset
    pub account_id: u64,
    pub insert_key: Option<String>,
    pub query_key: Option<String>,
    pub region: Region,
    /// Replaces the region's collector host (scheme and host, no trailing
    /// slash) events are posted to
    pub insights_collector_url: Option<String>,
    /// Replaces the region's API host queries are sent to
    pub insights_api_url: Option<String>,
    /// HTTPS proxy used by both submit and query. Nothing is picked up from
    /// the environment unless [`Config::from_env`] is used.
    pub proxy_url: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

impl Config {
    pub fn for_region(region: Region) -> Self {
        Config {
            account_id: 0,
            insert_key: None,
            query_key: None,
            region,
            insights_collector_url: None,
            insights_api_url: None,
            proxy_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads the configuration from `NEW_RELIC_*` environment variables.
    ///
    /// Missing credentials are not an error here; the client reports them when
    /// an operation needing them is called.
    pub fn from_env() -> Result<Config, Error> {
        let region = match env::var("NEW_RELIC_REGION") {
            Ok(region) => region.parse()?,
            Err(_) => Region::default(),
        };
        let mut config = Config::for_region(region);

        if let Ok(account_id) = env::var("NEW_RELIC_ACCOUNT_ID") {
            config.account_id = match account_id.trim().parse::<u64>() {
                Ok(id) if id > 0 => id,
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "NEW_RELIC_ACCOUNT_ID must be a positive integer, got '{account_id}'"
                    )))
                }
            };
        }
        config.insert_key = env::var("NEW_RELIC_INSERT_KEY").ok();
        config.query_key = env::var("NEW_RELIC_QUERY_KEY").ok();

        // Overrides are primarily used by integration tests
        if let Ok(url) = env::var("NEW_RELIC_INSIGHTS_COLLECTOR_URL") {
            config.insights_collector_url = Some(url.trim_end_matches('/').to_string());
        }
        if let Ok(url) = env::var("NEW_RELIC_INSIGHTS_API_URL") {
            config.insights_api_url = Some(url.trim_end_matches('/').to_string());
        }

        config.proxy_url = env::var("NEW_RELIC_PROXY_HTTPS")
            .or_else(|_| env::var("HTTPS_PROXY"))
            .ok();

        Ok(config)
    }

    /// Collector host in effect: the override if set, otherwise the region's.
    pub fn collector_url(&self) -> &str {
        self.insights_collector_url
            .as_deref()
            .unwrap_or_else(|| self.region.insights_collector_url())
    }

    /// API host in effect: the override if set, otherwise the region's.
    pub fn api_url(&self) -> &str {
        self.insights_api_url
            .as_deref()
            .unwrap_or_else(|| self.region.insights_api_url())
    }

    pub(crate) fn events_url(&self) -> String {
        format!(
            "{}/v1/accounts/{}/events",
            self.collector_url(),
            self.account_id
        )
    }

    pub(crate) fn query_url(&self, encoded_nrql: &str) -> String {
        format!(
            "{}/v1/accounts/{}/query?nrql={encoded_nrql}",
            self.api_url(),
            self.account_id
        )
    }
}
