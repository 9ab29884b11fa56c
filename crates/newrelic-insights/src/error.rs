// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Violations of the Insights API limits, detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiViolation {
    #[error("{0} is illegal. Must be a combination of alphanumeric characters, _ underscores, and : colons.")]
    InvalidEventType(String),

    #[error("Attribute limit of {limit} reached, cannot add attribute {name}")]
    AttributeLimitExceeded { name: String, limit: usize },

    #[error("Attribute {name} is {size} bytes, values must be smaller than {limit} bytes")]
    AttributeTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("Attribute {name} must be a finite number")]
    NonFiniteValue { name: String },
}

/// Errors returned by [`crate::Client`] operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Uninitialized client. Please initialize with a valid New Relic account id and a valid {0}.")]
    Uninitialized(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    ApiViolation(#[from] ApiViolation),

    /// Transport failure while submitting an event.
    #[error("New Relic insertion failure: {0}")]
    Insert(#[source] reqwest::Error),

    /// Transport failure while executing a query.
    #[error("New Relic query failure: {0}")]
    Query(#[source] reqwest::Error),

    #[error("Error parsing json response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The query API answered with an `error` message.
    #[error("{0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = Error::Uninitialized("insert key");
        assert_eq!(
            error.to_string(),
            "Uninitialized client. Please initialize with a valid New Relic account id and a valid insert key."
        );

        let error = Error::Rejected("Invalid NRQL".to_string());
        assert_eq!(error.to_string(), "Invalid NRQL");
    }

    #[test]
    fn test_api_violation_is_transparent() {
        let error: Error = ApiViolation::InvalidEventType("Bad.Event".to_string()).into();
        assert!(matches!(
            error,
            Error::ApiViolation(ApiViolation::InvalidEventType(ref t)) if t == "Bad.Event"
        ));
        assert_eq!(
            error.to_string(),
            "Bad.Event is illegal. Must be a combination of alphanumeric characters, _ underscores, and : colons."
        );
    }

    #[test]
    fn test_malformed_response_keeps_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = Error::MalformedResponse(cause);
        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("Error parsing json response"));
    }
}
