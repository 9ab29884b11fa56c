// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// An NRQL query to run through [`crate::Client::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    query_string: String,
}

impl Query {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
        }
    }

    /// The query encoded as a form parameter value: spaces become `+`,
    /// alphanumerics and `*-._` are kept, everything else is percent-encoded.
    pub fn query_string(&self) -> String {
        form_urlencoded::byte_serialize(self.query_string.as_bytes()).collect()
    }

    pub fn raw(&self) -> &str {
        &self.query_string
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_string)
    }
}
