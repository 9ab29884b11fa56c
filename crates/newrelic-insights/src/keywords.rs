// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! NRQL naming rules for attribute names and event types.

/// Words reserved by NRQL. Attribute names matching one of these (ignoring
/// case) must be quoted with backticks to be queryable.
pub const RESERVED_KEYWORDS: [&str; 39] = [
    "ago",
    "and",
    "as",
    "auto",
    "begin",
    "begintime",
    "by",
    "day",
    "days",
    "end",
    "endtime",
    "explain",
    "facet",
    "from",
    "hour",
    "hours",
    "in",
    "is",
    "like",
    "limit",
    "minute",
    "minutes",
    "month",
    "months",
    "not",
    "null",
    "offset",
    "or",
    "raw",
    "second",
    "seconds",
    "select",
    "since",
    "timeseries",
    "until",
    "week",
    "weeks",
    "where",
    "with",
];

pub fn is_reserved_keyword(name: &str) -> bool {
    let lowered = name.to_lowercase();
    RESERVED_KEYWORDS.contains(&lowered.as_str())
}

/// Strips leading and trailing space and ASCII control characters (anything up
/// to U+0020). Other Unicode whitespace, such as U+00A0, is part of the value.
pub(crate) fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

/// Normalizes an attribute name the way it is stored and sent.
///
/// Spaces and control characters are trimmed. If the trimmed name is a reserved NRQL keyword it is
/// wrapped in backticks, keeping its original case.
///
/// # Examples
///
/// ```
/// use newrelic_insights::keywords::normalize_attribute_name;
///
/// assert_eq!(normalize_attribute_name("  duration "), "duration");
/// assert_eq!(normalize_attribute_name("Select"), "`Select`");
/// assert_eq!(normalize_attribute_name("endTime"), "`endTime`");
/// ```
pub fn normalize_attribute_name(name: &str) -> String {
    let trimmed = trim_blank(name);
    if is_reserved_keyword(trimmed) {
        format!("`{trimmed}`")
    } else {
        trimmed.to_string()
    }
}

/// Checks an event type against the characters accepted by the Insights API:
/// alphanumerics, `_` underscores and `:` colons, with at least one
/// alphanumeric.
///
/// # Examples
///
/// ```
/// use newrelic_insights::keywords::is_valid_event_type;
///
/// assert!(is_valid_event_type("Purchase"));
/// assert!(is_valid_event_type("app:checkout_done"));
/// assert!(!is_valid_event_type("Bad.Event"));
/// assert!(!is_valid_event_type("::"));
/// ```
pub fn is_valid_event_type(event_type: &str) -> bool {
    let mut has_alphanumeric = false;
    for ch in event_type.chars().filter(|&ch| ch != ':' && ch != '_') {
        if !ch.is_alphanumeric() {
            return false;
        }
        has_alphanumeric = true;
    }
    has_alphanumeric
}
