// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `zthing` library.
//!
//! Errors fall into three groups: configuration errors raised while creating
//! a thing, resource conflicts raised by operations on a live (or closed)
//! thing, and transient acquisition failures raised by sensor reads. None of
//! them is fatal to the tick pipeline.

use thiserror::Error;

use crate::types::{SensorType, ValueKind};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration at creation time.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A sensor read failed.
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// A JSON configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The thing has been closed.
    #[error("thing is closed")]
    Closed,

    /// Another acquisition source (or handler) is already armed.
    #[error("an acquisition source is already active")]
    SourceConflict,

    /// The requested acquisition source is not armed.
    #[error("no matching acquisition source is active")]
    NoSource,

    /// The value is not a valid button state.
    #[error("invalid button state: {0}")]
    InvalidState(i32),

    /// No thing is registered under the handle.
    #[error("thing not found")]
    NotFound,

    /// The operation is not supported by this kind of thing.
    #[error("operation not supported by a {0} sensor")]
    UnsupportedType(SensorType),

    /// The processing queue of a thing was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// The processing queue of a thing is full; the worker is still running.
    #[error("input queue is full")]
    QueueFull,
}

/// Errors raised while validating creation parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The thing identifier is empty.
    #[error("thing id must not be empty")]
    EmptyId,

    /// Another thing is already registered with the same identifier.
    #[error("a thing with id '{0}' already exists")]
    DuplicateId(String),

    /// A tick field holds a value that is neither `-1` nor in range.
    #[error("invalid value {value} for {field}")]
    InvalidTicks {
        /// The configuration field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The notify mode code is unknown.
    #[error("invalid notify mode: {0}")]
    InvalidNotifyMode(i32),

    /// The interrupt configuration does not name a usable pin.
    #[error("invalid interrupt pin: {0}")]
    InvalidPin(i32),
}

/// Errors raised by a single sensor acquisition.
///
/// These are transient: the driver skips the cycle and retries on the next
/// trigger.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReadError {
    /// The hardware read itself failed.
    #[error("hardware read failed: {0}")]
    Hardware(String),

    /// The reader produced a value that does not fit the sensor type.
    #[error("a {actual} value is not compatible with a {expected} sensor")]
    TypeMismatch {
        /// Type of the sensor.
        expected: SensorType,
        /// Kind of the value that was read.
        actual: ValueKind,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidTicks {
            field: "clickTicks",
            value: -5,
        };
        assert_eq!(err.to_string(), "invalid value -5 for clickTicks");
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::EmptyId.into();
        assert!(matches!(err, Error::Config(ConfigError::EmptyId)));
    }

    #[test]
    fn read_error_display() {
        let err = ReadError::TypeMismatch {
            expected: SensorType::Binary,
            actual: ValueKind::Decimal,
        };
        assert_eq!(
            err.to_string(),
            "a decimal value is not compatible with a binary sensor"
        );
    }

    #[test]
    fn unsupported_type_display() {
        let err = Error::UnsupportedType(SensorType::Decimal);
        assert_eq!(err.to_string(), "operation not supported by a decimal sensor");
    }
}
