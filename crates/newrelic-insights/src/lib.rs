// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Submits custom events to, and runs NRQL queries against, the New Relic
//! Insights API.
//!
//! ```no_run
//! use newrelic_insights::{Client, CustomEvent, Query};
//!
//! # async fn run() -> Result<(), newrelic_insights::Error> {
//! let mut client = Client::new();
//! client.set_account_id(1234);
//! client.set_insert_key("insert-key");
//! client.set_query_key("query-key");
//!
//! let mut event = CustomEvent::new("Purchase");
//! event.add_attribute("amount", 19.99)?;
//! event.add_attribute("from", "web")?;
//! let status = client.submit(&event).await?;
//!
//! let results = client.query(&Query::new("SELECT count(*) FROM Purchase")).await?;
//! # let _ = (status, results);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod http_utils;
pub mod keywords;
pub mod query;

pub use client::Client;
pub use config::{Config, Region};
pub use error::{ApiViolation, Error};
pub use event::{AttributeValue, Attributes, CustomEvent, Event};
pub use query::Query;
pub use reqwest::StatusCode;
