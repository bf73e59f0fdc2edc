// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State-bearing sensors.
//!
//! A [`Sensor`] tracks a typed value. Readings come from a [`SensorReader`]
//! and are triggered by at most one acquisition source at a time:
//!
//! - polling: a read every N ticks ([`Sensor::set_polling`]);
//! - interrupt: a read on qualifying edges of an input pin
//!   ([`Sensor::set_interrupt`]).
//!
//! Each reading is committed to a [`ValueStore`] and, when
//! [`should_notify`] says the transition is notable under the sensor's
//! [`NotifyMode`], published as a state-update event. The first reading
//! always notifies.
//!
//! # Examples
//!
//! ```
//! use zthing::registry::ThingRegistry;
//! use zthing::runtime::ThingInput;
//! use zthing::sensor::from_fn;
//! use zthing::types::{SensorType, SensorValue};
//!
//! let registry = ThingRegistry::new();
//! let handle = registry
//!     .create_sensor("temp", SensorType::Decimal, None, from_fn(|| Ok(SensorValue::Decimal(21.5))))
//!     .unwrap();
//! let sensor = registry.sensor(handle).unwrap();
//!
//! registry.callbacks().on_state_updated(Some(handle), |update| {
//!     println!("{} is now {}", update.id, update.value);
//! });
//!
//! sensor.set_polling(1000).unwrap();
//! for now in 1..=1000 {
//!     sensor.process(ThingInput::Tick(now)).unwrap();
//! }
//! ```

mod acquisition;
mod config;
mod instance;
mod policy;
mod reader;
mod store;

pub use acquisition::{Acquisition, InterruptSource, PollingSource};
pub use config::{DEFAULT_POLLING_TICKS, InterruptConfig, RawSensorConfig, SensorConfig};
pub use instance::{Sensor, StateHandler};
pub use policy::{NotifyMode, should_notify};
pub use reader::{SensorReader, from_fn};
pub use store::ValueStore;
