// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback subscriptions for thing events.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//! - [`Subscribable`] - Trait for things that accept per-instance subscriptions
//!
//! # Usage
//!
//! ```
//! use zthing::registry::ThingRegistry;
//! use zthing::subscription::Subscribable;
//! use zthing::event::EventCode;
//!
//! let registry = ThingRegistry::new();
//! let handle = registry.create_button("btn1", None).unwrap();
//! let button = registry.button(handle).unwrap();
//!
//! let sub_id = button.subscribe(EventCode::Click, |event| {
//!     println!("clicked: {}", event.id());
//! });
//!
//! assert!(button.unsubscribe(sub_id));
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
