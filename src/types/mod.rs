// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared value types.
//!
//! # Types
//!
//! - [`Tick`] - Monotonic tick counter driving every timing decision
//! - [`Handle`] - Stable registry index of a thing
//! - [`Level`], [`Edge`], [`EdgeMode`] - Digital input levels and transitions
//! - [`ThingType`] - Type tag of a registered thing
//! - [`SensorType`], [`SensorValue`] - Typed sensor readings

mod handle;
mod level;
mod thing_type;
mod value;

pub use handle::Handle;
pub use level::{Edge, EdgeMode, Level};
pub use thing_type::{SensorType, ThingType};
pub use value::{SensorValue, ValueKind};

/// Monotonic tick counter.
///
/// A tick is the unit of every timing field (click window, long press,
/// debounce, polling interval). The driver decides how long a tick is.
pub type Tick = u64;
