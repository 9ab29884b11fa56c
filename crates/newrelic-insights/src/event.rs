// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Custom events and their attributes.
//!
//! The Insights API limits what an event may carry. These limits are enforced
//! when attributes are added so that a rejected event never reaches the wire:
//! - at most [`MAX_ATTRIBUTES`] attributes per event
//! - string values must be smaller than [`MAX_STRING_VALUE_BYTES`] bytes once trimmed
//! - numbers must be finite
//! - names clashing with NRQL keywords are quoted with backticks

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ApiViolation;
use crate::keywords::{normalize_attribute_name, trim_blank};

pub const MAX_ATTRIBUTES: usize = 254;
pub const MAX_STRING_VALUE_BYTES: usize = 4000;

/// A value attached to an event. Serialized as a bare JSON string or number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(f64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// Attribute store shared by every event type.
///
/// Names are normalized with [`normalize_attribute_name`] on every access, so
/// `get_attribute("select ")` finds the entry stored by
/// `add_attribute("select", ..)` under the key `` `select` ``.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute.
    ///
    /// String values are trimmed and must stay under [`MAX_STRING_VALUE_BYTES`]
    /// bytes. Numbers are stored as given, except NaN and infinities which JSON
    /// cannot represent. Fails without touching the store
    /// once [`MAX_ATTRIBUTES`] attributes are present.
    pub fn add_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), ApiViolation> {
        let name = normalize_attribute_name(name);
        self.check_capacity(&name)?;

        let value = match value.into() {
            AttributeValue::String(value) => {
                let trimmed = trim_blank(&value);
                if trimmed.len() >= MAX_STRING_VALUE_BYTES {
                    return Err(ApiViolation::AttributeTooLarge {
                        name,
                        size: trimmed.len(),
                        limit: MAX_STRING_VALUE_BYTES,
                    });
                }
                AttributeValue::String(trimmed.to_string())
            }
            AttributeValue::Float(number) if !number.is_finite() => {
                return Err(ApiViolation::NonFiniteValue { name });
            }
            number => number,
        };

        self.values.insert(name, value);
        Ok(())
    }

    /// Joins `values` with `separator` into a single string attribute.
    ///
    /// A missing separator joins with nothing. The joined value is neither
    /// trimmed nor size checked.
    pub fn add_joined_attribute<I, S>(
        &mut self,
        name: &str,
        values: I,
        separator: Option<&str>,
    ) -> Result<(), ApiViolation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = normalize_attribute_name(name);
        self.check_capacity(&name)?;

        let separator = separator.unwrap_or_default();
        let mut joined = String::new();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.push_str(value.as_ref());
        }

        self.values.insert(name, AttributeValue::String(joined));
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.values.remove(&normalize_attribute_name(name));
    }

    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(&normalize_attribute_name(name))
    }

    /// Read-only view of the stored attributes, keyed by normalized name.
    pub fn as_map(&self) -> &BTreeMap<String, AttributeValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compact JSON object of the attributes, without the event type.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }

    fn check_capacity(&self, name: &str) -> Result<(), ApiViolation> {
        if self.values.len() >= MAX_ATTRIBUTES {
            return Err(ApiViolation::AttributeLimitExceeded {
                name: name.to_string(),
                limit: MAX_ATTRIBUTES,
            });
        }
        Ok(())
    }
}

/// A record that can be submitted to the Insights API.
///
/// The event type is returned as is; it is validated by
/// [`crate::Client::submit`].
pub trait Event {
    fn event_type(&self) -> &str;

    fn attributes(&self) -> &Attributes;
}

/// An event whose type is chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    event_type: String,
    attributes: Attributes,
}

impl CustomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn add_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), ApiViolation> {
        self.attributes.add_attribute(name, value)
    }

    pub fn add_joined_attribute<I, S>(
        &mut self,
        name: &str,
        values: I,
        separator: Option<&str>,
    ) -> Result<(), ApiViolation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes.add_joined_attribute(name, values, separator)
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove_attribute(name);
    }

    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get_attribute(name)
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

impl Event for CustomEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
