// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `zthing` - Debounced button gestures and notifying sensors for
//! tick-driven embedded things.
//!
//! A *thing* is a physical input handled by the firmware: a momentary push
//! button or a state-bearing sensor. Things are driven by a monotonic tick
//! counter and raw pin levels, and report what happened as events.
//!
//! # Features
//!
//! - **Debouncing**: raw levels are confirmed after a configurable number of
//!   stable ticks
//! - **Button gestures**: down, up, click, double click, long press with
//!   optional repeat, and press end
//! - **Sensors**: binary, integer and decimal values, acquired by polling or
//!   on interrupt edges, with `ALWAYS` / `IF_CHANGED` notification policies
//! - **Events**: synchronous callbacks and a tokio broadcast stream
//! - **Runtime**: one serialized input queue per thing, fed by a tick driver
//!
//! # Quick Start
//!
//! ```
//! use zthing::button::ButtonConfig;
//! use zthing::event::EventCode;
//! use zthing::registry::ThingRegistry;
//! use zthing::subscription::Subscribable;
//! use zthing::types::Level;
//!
//! let registry = ThingRegistry::new();
//! let config = ButtonConfig::default()
//!     .with_click_ticks(30)
//!     .with_press_ticks(20)
//!     .with_debounce_ticks(0);
//! let handle = registry.create_button("btn1", Some(config)).unwrap();
//! let button = registry.button(handle).unwrap();
//!
//! button.subscribe(EventCode::Click, |event| {
//!     println!("{} clicked", event.id());
//! });
//!
//! button.push_level(Level::High, 0).unwrap();
//! button.push_level(Level::Low, 5).unwrap();
//! for now in 6..=35 {
//!     button.tick(now).unwrap();
//! }
//! assert_eq!(button.press_counter().unwrap(), 1);
//! ```
//!
//! ## Serialized processing with tokio
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use zthing::registry::ThingRegistry;
//! use zthing::runtime::{TickDriver, Worker};
//! use zthing::sensor::from_fn;
//! use zthing::types::{SensorType, SensorValue};
//!
//! #[tokio::main]
//! async fn main() -> zthing::Result<()> {
//!     let registry = ThingRegistry::new();
//!     let handle = registry.create_sensor(
//!         "temp",
//!         SensorType::Decimal,
//!         None,
//!         from_fn(|| Ok(SensorValue::Decimal(21.5))),
//!     )?;
//!     registry.sensor(handle).unwrap().set_polling(1000)?;
//!
//!     let mut events = registry.subscribe();
//!     let worker = Worker::spawn(registry.lookup(handle).unwrap());
//!     let _driver = TickDriver::spawn(Duration::from_millis(1), vec![worker.sender()]);
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod button;
pub mod error;
pub mod event;
pub mod input;
pub mod registry;
pub mod runtime;
pub mod sensor;
pub mod subscription;
pub mod types;

pub use button::{Button, ButtonConfig, ButtonState, GestureCode};
pub use error::{ConfigError, Error, ReadError, Result};
pub use event::{EventBus, EventCode, GestureEvent, StateUpdate, ThingEvent};
pub use registry::{Thing, ThingRegistry, ThingState};
pub use runtime::{ThingInput, TickDriver, Worker};
pub use sensor::{NotifyMode, Sensor, SensorConfig, SensorReader};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Edge, EdgeMode, Handle, Level, SensorType, SensorValue, ThingType, Tick};
