// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for things that publish events.

use crate::event::{EventBus, EventCode, StateUpdate, ThingEvent};
use crate::subscription::SubscriptionId;
use crate::types::Handle;

/// Trait for things that accept per-instance event subscriptions.
///
/// Subscriptions made through this trait only receive events published by
/// the thing they were made on. They are dropped when the thing closes.
///
/// # Examples
///
/// ```
/// use zthing::registry::ThingRegistry;
/// use zthing::sensor::from_fn;
/// use zthing::subscription::Subscribable;
/// use zthing::types::{SensorType, SensorValue};
///
/// let registry = ThingRegistry::new();
/// let handle = registry
///     .create_sensor("door", SensorType::Binary, None, from_fn(|| Ok(SensorValue::Binary(true))))
///     .unwrap();
/// let sensor = registry.sensor(handle).unwrap();
///
/// sensor.on_state_updated(|update| {
///     println!("{} -> {:?}", update.id, update.value);
/// });
/// ```
pub trait Subscribable {
    /// Handle used to filter events.
    fn thing_handle(&self) -> Handle;

    /// Bus the thing publishes on.
    fn thing_bus(&self) -> &EventBus;

    /// Subscribes to events of this thing matching `code`.
    fn subscribe<F>(&self, code: EventCode, callback: F) -> SubscriptionId
    where
        F: Fn(&ThingEvent) + Send + Sync + 'static,
    {
        self.thing_bus()
            .callbacks()
            .subscribe_to(self.thing_handle(), code, callback)
    }

    /// Subscribes to state updates of this thing.
    fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateUpdate) + Send + Sync + 'static,
    {
        self.thing_bus()
            .callbacks()
            .on_state_updated(Some(self.thing_handle()), callback)
    }

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.thing_bus().callbacks().unsubscribe(id)
    }
}
