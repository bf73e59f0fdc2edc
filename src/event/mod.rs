// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for thing notifications.
//!
//! Buttons publish gesture events and sensors publish state-update events on
//! an [`EventBus`]. The bus delivers every event twice: synchronously to the
//! handlers registered in its [`CallbackRegistry`](crate::subscription::CallbackRegistry),
//! and through a tokio broadcast channel to asynchronous subscribers.
//!
//! # Examples
//!
//! ```
//! use zthing::event::{EventBus, EventCode, ThingEvent};
//! use zthing::types::{Handle, ThingType};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.callbacks().subscribe(EventCode::Created, |event| {
//!     println!("created: {event:?}");
//! });
//!
//! bus.publish(ThingEvent::created(Handle::from_raw(1), "btn1", ThingType::Button));
//! ```

mod code;
mod event_bus;
mod thing_event;

pub use code::EventCode;
pub use event_bus::EventBus;
pub use thing_event::{GestureEvent, StateUpdate, ThingEvent};
