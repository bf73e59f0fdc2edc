// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed sensor values.

use std::fmt;

use super::SensorType;

/// A reading produced by a sensor.
///
/// Equality is exact: two decimal readings are equal only if they compare
/// equal as `f64`, with no tolerance.
///
/// # Examples
///
/// ```
/// use zthing::types::{SensorType, SensorValue};
///
/// let v = SensorValue::Integer(3);
/// assert!(v.fits(SensorType::Integer));
/// assert_eq!(v.as_integer(), Some(3));
/// assert_eq!(SensorValue::Binary(true).as_integer(), Some(1));
/// assert_eq!(SensorValue::Decimal(1.5).as_integer(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// On/off reading.
    Binary(bool),
    /// Integer reading.
    Integer(i64),
    /// Decimal reading.
    Decimal(f64),
}

impl SensorValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Binary(_) => ValueKind::Binary,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
        }
    }

    /// Returns `true` if a sensor of type `sensor_type` may hold this value.
    #[must_use]
    pub const fn fits(&self, sensor_type: SensorType) -> bool {
        matches!(
            (self, sensor_type),
            (Self::Binary(_), SensorType::Binary)
                | (Self::Integer(_), SensorType::Integer)
                | (Self::Decimal(_), SensorType::Decimal)
        )
    }

    /// Returns the integer used for state-name lookup.
    ///
    /// Binary readings map to `0`/`1`; decimal readings have none.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Binary(b) => Some(*b as i64),
            Self::Integer(i) => Some(*i),
            Self::Decimal(_) => None,
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<bool> for SensorValue {
    fn from(value: bool) -> Self {
        Self::Binary(value)
    }
}

impl From<i64> for SensorValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

/// The kind of a [`SensorValue`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A boolean.
    Binary,
    /// An integer.
    Integer,
    /// A decimal.
    Decimal,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_equality_has_no_tolerance() {
        assert_eq!(SensorValue::Decimal(21.5), SensorValue::Decimal(21.5));
        assert_ne!(SensorValue::Decimal(21.5), SensorValue::Decimal(21.500_001));
    }

    #[test]
    fn different_kinds_never_equal() {
        assert_ne!(SensorValue::Integer(1), SensorValue::Binary(true));
        assert_ne!(SensorValue::Integer(1), SensorValue::Decimal(1.0));
    }

    #[test]
    fn fits_matching_sensor_type_only() {
        assert!(SensorValue::Binary(false).fits(SensorType::Binary));
        assert!(!SensorValue::Binary(false).fits(SensorType::Integer));
        assert!(!SensorValue::Integer(0).fits(SensorType::Decimal));
    }

    #[test]
    fn display() {
        assert_eq!(SensorValue::Binary(true).to_string(), "true");
        assert_eq!(SensorValue::Integer(-4).to_string(), "-4");
        assert_eq!(SensorValue::Decimal(2.25).to_string(), "2.25");
    }
}
