//! Recursive result/event decoding for display.
//!
//! Return values and event arguments share one traversal: integers are
//! stringified in base 10, sequences recurse element by element with their
//! nesting preserved, every other scalar uses its default string form.

use crate::types::AbiValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A display-safe value: every leaf is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Scalar(String),
    Sequence(Vec<DisplayValue>),
}

impl DisplayValue {
    pub fn is_sequence(&self) -> bool {
        matches!(self, DisplayValue::Sequence(_))
    }

    /// Nested JSON arrays of strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DisplayValue::Scalar(s) => serde_json::Value::String(s.clone()),
            DisplayValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(DisplayValue::to_json).collect())
            }
        }
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn to_pretty_json(&self) -> String {
        // Serializing a tree of strings cannot fail; fall back to Display anyway.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Scalar(s) => write!(f, "{s}"),
            DisplayValue::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

/// Convert codec output into a display value. Total: never fails.
pub fn decode_for_display(value: &AbiValue) -> DisplayValue {
    match value {
        AbiValue::Uint(v) => DisplayValue::Scalar(v.to_string()),
        AbiValue::Int(v) => DisplayValue::Scalar(v.to_string()),
        AbiValue::Array(items) | AbiValue::Tuple(items) => {
            DisplayValue::Sequence(items.iter().map(decode_for_display).collect())
        }
        AbiValue::Bool(_) | AbiValue::Address(_) | AbiValue::Bytes(_) | AbiValue::Str(_) => {
            DisplayValue::Scalar(value.to_string())
        }
    }
}

/// Decode every argument of an event or multi-value return.
pub fn decode_all<'a>(values: impl IntoIterator<Item = &'a AbiValue>) -> Vec<DisplayValue> {
    values.into_iter().map(decode_for_display).collect()
}

/// `Event: Name(v1, v2)`
pub fn format_event_line(name: &str, args: &[DisplayValue]) -> String {
    let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    format!("Event: {name}({})", parts.join(", "))
}
