// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datapoint values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Current value of a datapoint.
///
/// The hub transmits almost every value as a string (`"1"`, `"0"`, `"42.5"`),
/// but values may also be built from native booleans and numbers. The
/// `as_*` readers accept both shapes; equality stays structural, so
/// `Value::Text("1")` and `Value::Bool(true)` are different values.
///
/// # Examples
///
/// ```
/// use freeathome_lib::types::Value;
///
/// let on = Value::from("1");
/// assert_eq!(on.as_bool(), Some(true));
///
/// let level = Value::from(42.5);
/// assert_eq!(level.as_f64(), Some(42.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A numeric value.
    Number(f64),
    /// A textual value, the hub's native representation.
    Text(String),
}

impl Value {
    /// Interprets the value as a boolean.
    ///
    /// Text values `"1"`/`"true"` and `"0"`/`"false"` are recognised, as are
    /// the numbers `1` and `0`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) if *n == 0.0 => Some(false),
            Self::Number(n) if *n == 1.0 => Some(true),
            Self::Number(_) => None,
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => Some(true),
                "0" | "false" | "off" => Some(false),
                _ => None,
            },
        }
    }

    /// Interprets the value as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the text of a [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if both values are identical.
    ///
    /// Unlike `==`, numbers are compared bit for bit, so a stored `NaN`
    /// is the same as an incoming `NaN`.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Returns `true` for an empty text value, the hub's "never set" marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl TryFrom<&Value> for bool {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_bool()
            .ok_or_else(|| ValueError::NotBool(value.to_string()))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_f64()
            .ok_or_else(|| ValueError::NotNumber(value.to_string()))
    }
}
