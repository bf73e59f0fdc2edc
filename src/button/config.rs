// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button timing configuration.

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::types::Tick;

/// Default click window, in ticks.
pub const DEFAULT_CLICK_TICKS: Tick = 600;
/// Default long-press threshold, in ticks.
pub const DEFAULT_PRESS_TICKS: Tick = 1000;
/// Default long-press repeat interval (`0` disables repeating).
pub const DEFAULT_PRESS_REPEAT_TICKS: Tick = 0;
/// Default debounce window, in ticks.
pub const DEFAULT_DEBOUNCE_TICKS: Tick = 50;

/// Sentinel meaning "use the driver default".
const UNSET: i64 = -1;

/// Validated timing configuration of a button.
///
/// # Examples
///
/// ```
/// use zthing::button::ButtonConfig;
///
/// let config = ButtonConfig::default()
///     .with_click_ticks(250)
///     .with_press_repeat_ticks(100);
/// assert_eq!(config.click_ticks(), 250);
/// assert!(config.validate().is_ok());
///
/// // Raw binding-layer form, -1 meaning "default"
/// let config = ButtonConfig::from_json(r#"{ "clickTicks": 300, "pressTicks": -1 }"#).unwrap();
/// assert_eq!(config.click_ticks(), 300);
/// assert_eq!(config.press_ticks(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ButtonConfig {
    click_ticks: Tick,
    press_ticks: Tick,
    press_repeat_ticks: Tick,
    debounce_ticks: Tick,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            click_ticks: DEFAULT_CLICK_TICKS,
            press_ticks: DEFAULT_PRESS_TICKS,
            press_repeat_ticks: DEFAULT_PRESS_REPEAT_TICKS,
            debounce_ticks: DEFAULT_DEBOUNCE_TICKS,
        }
    }
}

impl ButtonConfig {
    /// Sets the click window: the longest gap between the first release and
    /// a second push that still counts as a double click.
    #[must_use]
    pub fn with_click_ticks(mut self, ticks: Tick) -> Self {
        self.click_ticks = ticks;
        self
    }

    /// Sets how long the button must be held to become a long press.
    #[must_use]
    pub fn with_press_ticks(mut self, ticks: Tick) -> Self {
        self.press_ticks = ticks;
        self
    }

    /// Sets the long-press repeat interval (`0` disables repeating).
    #[must_use]
    pub fn with_press_repeat_ticks(mut self, ticks: Tick) -> Self {
        self.press_repeat_ticks = ticks;
        self
    }

    /// Sets the debounce window (`0` disables filtering).
    #[must_use]
    pub fn with_debounce_ticks(mut self, ticks: Tick) -> Self {
        self.debounce_ticks = ticks;
        self
    }

    /// Returns the click window.
    #[must_use]
    pub const fn click_ticks(&self) -> Tick {
        self.click_ticks
    }

    /// Returns the long-press threshold.
    #[must_use]
    pub const fn press_ticks(&self) -> Tick {
        self.press_ticks
    }

    /// Returns the long-press repeat interval.
    #[must_use]
    pub const fn press_repeat_ticks(&self) -> Tick {
        self.press_repeat_ticks
    }

    /// Returns the debounce window.
    #[must_use]
    pub const fn debounce_ticks(&self) -> Tick {
        self.debounce_ticks
    }

    /// Checks that the click window and long-press threshold are non-zero.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTicks` naming the offending field.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.click_ticks == 0 {
            return Err(ConfigError::InvalidTicks {
                field: "clickTicks",
                value: 0,
            });
        }
        if self.press_ticks == 0 {
            return Err(ConfigError::InvalidTicks {
                field: "pressTicks",
                value: 0,
            });
        }
        Ok(())
    }

    /// Parses and validates a binding-layer JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` on malformed JSON and `Error::Config` on
    /// out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawButtonConfig = serde_json::from_str(json)?;
        Ok(Self::try_from(raw)?)
    }
}

/// Button configuration as exchanged with the binding layer.
///
/// Every field is optional; `-1` (or a missing field) selects the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawButtonConfig {
    /// Click window.
    #[serde(default = "unset")]
    pub click_ticks: i64,
    /// Long-press threshold.
    #[serde(default = "unset")]
    pub press_ticks: i64,
    /// Long-press repeat interval.
    #[serde(default = "unset")]
    pub press_repeat_ticks: i64,
    /// Debounce window.
    #[serde(default = "unset")]
    pub debounce_ticks: i64,
}

impl Default for RawButtonConfig {
    fn default() -> Self {
        Self {
            click_ticks: UNSET,
            press_ticks: UNSET,
            press_repeat_ticks: UNSET,
            debounce_ticks: UNSET,
        }
    }
}

const fn unset() -> i64 {
    UNSET
}

/// Resolves a raw tick field: `-1` selects `default`, anything below `min`
/// is rejected.
fn resolve(
    field: &'static str,
    value: i64,
    default: Tick,
    min: Tick,
) -> std::result::Result<Tick, ConfigError> {
    if value == UNSET {
        return Ok(default);
    }
    match Tick::try_from(value) {
        Ok(ticks) if ticks >= min => Ok(ticks),
        _ => Err(ConfigError::InvalidTicks { field, value }),
    }
}

impl TryFrom<RawButtonConfig> for ButtonConfig {
    type Error = ConfigError;

    fn try_from(raw: RawButtonConfig) -> std::result::Result<Self, Self::Error> {
        let config = Self {
            click_ticks: resolve("clickTicks", raw.click_ticks, DEFAULT_CLICK_TICKS, 1)?,
            press_ticks: resolve("pressTicks", raw.press_ticks, DEFAULT_PRESS_TICKS, 1)?,
            press_repeat_ticks: resolve(
                "pressRepeatTicks",
                raw.press_repeat_ticks,
                DEFAULT_PRESS_REPEAT_TICKS,
                0,
            )?,
            debounce_ticks: resolve(
                "debounceTicks",
                raw.debounce_ticks,
                DEFAULT_DEBOUNCE_TICKS,
                0,
            )?,
        };
        config.validate()?;
        Ok(config)
    }
}
