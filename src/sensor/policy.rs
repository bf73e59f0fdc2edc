// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notification policy.

use std::fmt;

use crate::error::ConfigError;
use crate::types::SensorValue;

/// When a committed reading is worth a state-update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Every committed reading.
    Always,
    /// Only readings that differ from the previous one.
    #[default]
    IfChanged,
}

impl NotifyMode {
    /// Returns the binding-layer code of the mode.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Always => 0,
            Self::IfChanged => 1,
        }
    }
}

impl TryFrom<i32> for NotifyMode {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Always),
            1 => Ok(Self::IfChanged),
            other => Err(ConfigError::InvalidNotifyMode(other)),
        }
    }
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "ALWAYS"),
            Self::IfChanged => write!(f, "IF_CHANGED"),
        }
    }
}

/// Decides whether the transition `previous` → `current` is notable.
///
/// A missing `previous` is the first commit ever and always notifies.
/// Comparison is exact, with no tolerance for decimal values.
///
/// # Examples
///
/// ```
/// use zthing::sensor::{NotifyMode, should_notify};
/// use zthing::types::SensorValue;
///
/// let five = SensorValue::Integer(5);
/// assert!(should_notify(NotifyMode::IfChanged, None, &five));
/// assert!(!should_notify(NotifyMode::IfChanged, Some(&five), &five));
/// assert!(should_notify(NotifyMode::Always, Some(&five), &five));
/// ```
#[must_use]
pub fn should_notify(mode: NotifyMode, previous: Option<&SensorValue>, current: &SensorValue) -> bool {
    match (mode, previous) {
        (_, None) | (NotifyMode::Always, _) => true,
        (NotifyMode::IfChanged, Some(previous)) => previous != current,
    }
}
