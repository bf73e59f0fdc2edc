// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing type tags.

use std::fmt;

/// Category bit shared by every sensor-like thing (buttons included).
const SENSOR_CATEGORY: u8 = 1;

/// Type tag of a registered thing.
///
/// The numeric codes keep the binding layer's bit layout: the two low bits
/// carry the category and the upper bits the concrete type.
///
/// # Examples
///
/// ```
/// use zthing::types::{SensorType, ThingType};
///
/// assert_eq!(ThingType::Button.code(), 9);
/// assert_eq!(ThingType::from(SensorType::Integer).code(), 49);
/// assert!(ThingType::Button.is_sensor());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ThingType {
    /// Momentary push button.
    Button,
    /// On/off sensor.
    BinarySensor,
    /// Sensor reporting a decimal number.
    DecimalSensor,
    /// Sensor reporting an integer number.
    IntegerSensor,
}

impl ThingType {
    /// Returns the numeric type tag.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Button => 8 | SENSOR_CATEGORY,
            Self::BinarySensor => 16 | SENSOR_CATEGORY,
            Self::DecimalSensor => 32 | SENSOR_CATEGORY,
            Self::IntegerSensor => 48 | SENSOR_CATEGORY,
        }
    }

    /// Returns `true` if the tag belongs to the sensor category.
    #[must_use]
    pub const fn is_sensor(&self) -> bool {
        self.code() & 0b11 == SENSOR_CATEGORY
    }

    /// Returns the sensor type, or `None` for buttons.
    #[must_use]
    pub const fn sensor_type(&self) -> Option<SensorType> {
        match self {
            Self::Button => None,
            Self::BinarySensor => Some(SensorType::Binary),
            Self::DecimalSensor => Some(SensorType::Decimal),
            Self::IntegerSensor => Some(SensorType::Integer),
        }
    }
}

impl From<SensorType> for ThingType {
    fn from(value: SensorType) -> Self {
        match value {
            SensorType::Binary => Self::BinarySensor,
            SensorType::Decimal => Self::DecimalSensor,
            SensorType::Integer => Self::IntegerSensor,
        }
    }
}

/// Kind of value a sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    /// On/off values.
    Binary,
    /// Floating point values.
    Decimal,
    /// Integer values.
    Integer,
}

impl SensorType {
    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
        }
    }

    /// Returns `true` if values of this type can carry display names.
    #[must_use]
    pub const fn supports_names(&self) -> bool {
        matches!(self, Self::Binary | Self::Integer)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes() {
        assert_eq!(ThingType::Button.code(), 9);
        assert_eq!(ThingType::BinarySensor.code(), 17);
        assert_eq!(ThingType::DecimalSensor.code(), 33);
        assert_eq!(ThingType::IntegerSensor.code(), 49);
    }

    #[test]
    fn every_tag_is_in_sensor_category() {
        for t in [
            ThingType::Button,
            ThingType::BinarySensor,
            ThingType::DecimalSensor,
            ThingType::IntegerSensor,
        ] {
            assert!(t.is_sensor());
        }
    }

    #[test]
    fn sensor_type_round_trip_through_thing_type() {
        for s in [SensorType::Binary, SensorType::Decimal, SensorType::Integer] {
            assert_eq!(ThingType::from(s).sensor_type(), Some(s));
        }
        assert_eq!(ThingType::Button.sensor_type(), None);
    }

    #[test]
    fn names_only_for_discrete_types() {
        assert!(SensorType::Binary.supports_names());
        assert!(SensorType::Integer.supports_names());
        assert!(!SensorType::Decimal.supports_names());
    }
}
