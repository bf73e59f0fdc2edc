// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor configuration.

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::types::{EdgeMode, Tick};

use super::policy::NotifyMode;

/// Polling interval used when the binding layer passes `-1`, in ticks.
pub const DEFAULT_POLLING_TICKS: Tick = 1000;

/// Sentinel meaning "use the driver default".
const UNSET: i32 = -1;

/// Validated configuration of a sensor.
///
/// # Examples
///
/// ```
/// use zthing::sensor::{NotifyMode, SensorConfig};
///
/// assert_eq!(SensorConfig::default().notify_mode(), NotifyMode::IfChanged);
///
/// let config = SensorConfig::from_json(r#"{ "updNotifyMode": 0 }"#).unwrap();
/// assert_eq!(config.notify_mode(), NotifyMode::Always);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SensorConfig {
    notify_mode: NotifyMode,
}

impl SensorConfig {
    /// Sets the notification policy.
    #[must_use]
    pub fn with_notify_mode(mut self, mode: NotifyMode) -> Self {
        self.notify_mode = mode;
        self
    }

    /// Returns the notification policy.
    #[must_use]
    pub const fn notify_mode(&self) -> NotifyMode {
        self.notify_mode
    }

    /// Parses and validates a binding-layer JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` on malformed JSON and `Error::Config` on an
    /// unknown notify mode.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSensorConfig = serde_json::from_str(json)?;
        Ok(Self::try_from(raw)?)
    }
}

/// Sensor configuration as exchanged with the binding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSensorConfig {
    /// Notify mode code; `-1` selects `IfChanged`.
    #[serde(default = "unset")]
    pub upd_notify_mode: i32,
}

impl Default for RawSensorConfig {
    fn default() -> Self {
        Self {
            upd_notify_mode: UNSET,
        }
    }
}

const fn unset() -> i32 {
    UNSET
}

impl TryFrom<RawSensorConfig> for SensorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSensorConfig) -> std::result::Result<Self, Self::Error> {
        let notify_mode = match raw.upd_notify_mode {
            UNSET => NotifyMode::default(),
            code => NotifyMode::try_from(code)?,
        };
        Ok(Self { notify_mode })
    }
}

/// Interrupt source of a sensor: the pin, the qualifying edges and an
/// optional debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct InterruptConfig {
    pin: u32,
    edge_mode: EdgeMode,
    debounce_ticks: Tick,
}

impl InterruptConfig {
    /// Creates an interrupt configuration without debouncing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPin` for a negative pin number.
    pub fn new(pin: i32, edge_mode: EdgeMode) -> std::result::Result<Self, ConfigError> {
        let pin = u32::try_from(pin).map_err(|_| ConfigError::InvalidPin(pin))?;
        Ok(Self {
            pin,
            edge_mode,
            debounce_ticks: 0,
        })
    }

    /// Sets the debounce window of the interrupt line.
    #[must_use]
    pub fn with_debounce_ticks(mut self, ticks: Tick) -> Self {
        self.debounce_ticks = ticks;
        self
    }

    /// Returns the pin number.
    #[must_use]
    pub const fn pin(&self) -> u32 {
        self.pin
    }

    /// Returns the qualifying edges.
    #[must_use]
    pub const fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    /// Returns the debounce window.
    #[must_use]
    pub const fn debounce_ticks(&self) -> Tick {
        self.debounce_ticks
    }
}
