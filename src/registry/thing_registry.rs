// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handle-indexed arena of things.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::button::{Button, ButtonConfig};
use crate::error::{ConfigError, Error, Result};
use crate::event::{EventBus, ThingEvent};
use crate::sensor::{Sensor, SensorConfig, SensorReader};
use crate::subscription::CallbackRegistry;
use crate::types::{Handle, SensorType};

use super::thing::Thing;

/// Registry owning every live thing, keyed by a stable [`Handle`].
///
/// Things share the registry's [`EventBus`]. Registration publishes a
/// `Created` event; closing through [`close`](Self::close) removes the
/// thing and publishes `Closed`. A thing closed directly stays in the arena
/// until its id is reused or it is closed through the registry, but is
/// never returned by lookups.
///
/// Lookups take a read lock and may run concurrently.
///
/// # Examples
///
/// ```
/// use zthing::button::ButtonConfig;
/// use zthing::registry::ThingRegistry;
///
/// let registry = ThingRegistry::new();
/// let handle = registry
///     .create_button("btn1", Some(ButtonConfig::default().with_click_ticks(300)))
///     .unwrap();
///
/// assert!(registry.create_button("btn1", None).is_err());
/// assert_eq!(registry.find("btn1").map(|t| t.handle()), Some(handle));
///
/// registry.close(handle).unwrap();
/// assert!(registry.lookup(handle).is_none());
/// ```
#[derive(Debug)]
pub struct ThingRegistry {
    things: RwLock<HashMap<Handle, Thing>>,
    next_handle: AtomicU32,
    bus: EventBus,
}

impl ThingRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    /// Creates an empty registry with a custom broadcast capacity.
    #[must_use]
    pub fn with_capacity(event_capacity: usize) -> Self {
        Self::with_bus(EventBus::with_capacity(event_capacity))
    }

    /// Creates an empty registry publishing on `bus`.
    #[must_use]
    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            things: RwLock::new(HashMap::new()),
            next_handle: AtomicU32::new(1),
            bus,
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to the broadcast stream of every thing's events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ThingEvent> {
        self.bus.subscribe()
    }

    /// Returns the callback registry shared by every thing.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        self.bus.callbacks()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates and registers a button.
    ///
    /// `None` selects [`ButtonConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty or duplicate id or an invalid
    /// configuration. Nothing is registered in that case.
    pub fn create_button(&self, id: &str, config: Option<ButtonConfig>) -> Result<Handle> {
        let config = config.unwrap_or_default();
        config.validate().inspect_err(|e| {
            tracing::warn!(id, error = %e, "Rejected button configuration");
        })?;
        let thing = self.register(id, |handle| {
            Thing::Button(Arc::new(Button::new(
                handle,
                id.to_owned(),
                config,
                self.bus.clone(),
            )))
        })?;
        tracing::info!(
            id,
            handle = %thing.handle(),
            click_ticks = config.click_ticks(),
            press_ticks = config.press_ticks(),
            "Button created"
        );
        Ok(thing.handle())
    }

    /// Creates and registers a sensor reading its values from `reader`.
    ///
    /// `None` selects [`SensorConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty or duplicate id. Nothing is
    /// registered in that case.
    pub fn create_sensor<R>(
        &self,
        id: &str,
        sensor_type: SensorType,
        config: Option<SensorConfig>,
        reader: R,
    ) -> Result<Handle>
    where
        R: SensorReader + 'static,
    {
        let config = config.unwrap_or_default();
        let thing = self.register(id, |handle| {
            Thing::Sensor(Arc::new(Sensor::new(
                handle,
                id.to_owned(),
                sensor_type,
                config,
                Box::new(reader),
                self.bus.clone(),
            )))
        })?;
        tracing::info!(
            id,
            handle = %thing.handle(),
            %sensor_type,
            notify_mode = %config.notify_mode(),
            "Sensor created"
        );
        Ok(thing.handle())
    }

    fn register(&self, id: &str, build: impl FnOnce(Handle) -> Thing) -> Result<Thing> {
        if id.is_empty() {
            tracing::warn!("Rejected thing with empty id");
            return Err(ConfigError::EmptyId.into());
        }
        let thing = {
            let mut things = self.things.write();
            things.retain(|_, thing| !thing.is_closed());
            if things.values().any(|thing| thing.id() == id) {
                tracing::warn!(id, "Rejected duplicate thing id");
                return Err(ConfigError::DuplicateId(id.to_owned()).into());
            }
            let handle = Handle::from_raw(self.next_handle.fetch_add(1, Ordering::Relaxed));
            let thing = build(handle);
            things.insert(handle, thing.clone());
            thing
        };
        self.bus
            .publish(ThingEvent::created(thing.handle(), id, thing.thing_type()));
        Ok(thing)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the live thing registered under `handle`.
    #[must_use]
    pub fn lookup(&self, handle: Handle) -> Option<Thing> {
        self.things
            .read()
            .get(&handle)
            .filter(|thing| !thing.is_closed())
            .cloned()
    }

    /// Returns the live button registered under `handle`.
    #[must_use]
    pub fn button(&self, handle: Handle) -> Option<Arc<Button>> {
        self.lookup(handle)?.as_button().cloned()
    }

    /// Returns the live sensor registered under `handle`.
    #[must_use]
    pub fn sensor(&self, handle: Handle) -> Option<Arc<Sensor>> {
        self.lookup(handle)?.as_sensor().cloned()
    }

    /// Returns the live thing with identifier `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Thing> {
        self.things
            .read()
            .values()
            .find(|thing| thing.id() == id && !thing.is_closed())
            .cloned()
    }

    /// Returns the handles of every live thing, in creation order.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self
            .things
            .read()
            .iter()
            .filter(|(_, thing)| !thing.is_closed())
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Returns the number of live things.
    #[must_use]
    pub fn len(&self) -> usize {
        self.things
            .read()
            .values()
            .filter(|thing| !thing.is_closed())
            .count()
    }

    /// Returns `true` if no live thing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Unregisters and closes the thing under `handle`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no thing is registered under `handle`,
    /// or `Error::Closed` if it had already been closed directly.
    pub fn close(&self, handle: Handle) -> Result<()> {
        let thing = self.things.write().remove(&handle).ok_or(Error::NotFound)?;
        thing.close()
    }

    /// Closes every live thing and empties the registry.
    pub fn close_all(&self) {
        let things: Vec<Thing> = self.things.write().drain().map(|(_, thing)| thing).collect();
        for thing in things {
            if let Err(e) = thing.close() {
                tracing::debug!(handle = %thing.handle(), error = %e, "Thing already closed");
            }
        }
    }
}

impl Default for ThingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::ReadError;
    use crate::sensor::from_fn;
    use crate::types::{SensorValue, ThingType};

    fn reader() -> impl SensorReader + 'static {
        from_fn(|| Ok(SensorValue::Integer(1)))
    }

    #[test]
    fn handles_are_sequential() {
        let registry = ThingRegistry::new();
        let a = registry.create_button("a", None).unwrap();
        let b = registry
            .create_sensor("b", SensorType::Integer, None, reader())
            .unwrap();
        assert_eq!(a.value(), 1);
        assert_eq!(b.value(), 2);
        assert_eq!(registry.handles(), vec![a, b]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_id_rejected() {
        let registry = ThingRegistry::new();
        assert!(matches!(
            registry.create_button("", None),
            Err(Error::Config(ConfigError::EmptyId))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_id_rejected_across_kinds() {
        let registry = ThingRegistry::new();
        registry.create_button("x", None).unwrap();
        let err = registry
            .create_sensor("x", SensorType::Binary, None, reader())
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DuplicateId(id)) if id == "x"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_button_config_registers_nothing() {
        let registry = ThingRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let c = created.clone();
        registry.callbacks().on_created(move |_, _, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let config = ButtonConfig::default().with_click_ticks(0);
        assert!(registry.create_button("btn", Some(config)).is_err());
        assert!(registry.is_empty());
        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn created_event_carries_type() {
        let registry = ThingRegistry::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let s = seen.clone();
        registry.callbacks().on_created(move |_, id, thing_type| {
            s.lock().push((id.to_owned(), thing_type));
        });

        registry.create_button("btn", None).unwrap();
        registry
            .create_sensor("temp", SensorType::Decimal, None, from_fn(|| {
                Err(ReadError::Hardware("offline".into()))
            }))
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("btn".to_owned(), ThingType::Button),
                ("temp".to_owned(), ThingType::DecimalSensor)
            ]
        );
    }

    #[test]
    fn typed_lookup() {
        let registry = ThingRegistry::new();
        let b = registry.create_button("b", None).unwrap();
        let s = registry
            .create_sensor("s", SensorType::Integer, None, reader())
            .unwrap();
        assert!(registry.button(b).is_some());
        assert!(registry.sensor(b).is_none());
        assert!(registry.sensor(s).is_some());
        assert!(registry.lookup(Handle::from_raw(99)).is_none());
    }

    #[test]
    fn close_unregisters() {
        let registry = ThingRegistry::new();
        let h = registry.create_button("b", None).unwrap();
        let button = registry.button(h).unwrap();

        registry.close(h).unwrap();
        assert!(button.is_closed());
        assert!(registry.lookup(h).is_none());
        assert!(matches!(registry.close(h), Err(Error::NotFound)));

        // The id is free again, under a new handle.
        let h2 = registry.create_button("b", None).unwrap();
        assert_ne!(h, h2);
    }

    #[test]
    fn directly_closed_thing_is_hidden_and_id_reusable() {
        let registry = ThingRegistry::new();
        let h = registry.create_button("b", None).unwrap();
        registry.button(h).unwrap().close().unwrap();

        assert!(registry.lookup(h).is_none());
        assert!(registry.find("b").is_none());
        assert!(registry.is_empty());
        registry.create_button("b", None).unwrap();
        assert!(matches!(registry.close(h), Err(Error::NotFound)));
    }

    #[test]
    fn close_all() {
        let registry = ThingRegistry::new();
        let b = registry.create_button("b", None).unwrap();
        registry
            .create_sensor("s", SensorType::Binary, None, reader())
            .unwrap();
        let button = registry.button(b).unwrap();

        registry.close_all();
        assert!(registry.is_empty());
        assert!(button.is_closed());
    }

    #[test]
    fn lookups_do_not_wait_for_an_in_flight_read() {
        use std::sync::mpsc;
        use std::thread;

        let registry = ThingRegistry::new();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let slow = from_fn(move || {
            entered_tx.send(()).map_err(|e| ReadError::Hardware(e.to_string()))?;
            go_rx.recv().map_err(|e| ReadError::Hardware(e.to_string()))?;
            Ok(SensorValue::Integer(3))
        });
        let h = registry
            .create_sensor("slow", SensorType::Integer, None, slow)
            .unwrap();
        let sensor = registry.sensor(h).unwrap();
        let reading = thread::spawn(move || sensor.update_state().unwrap());

        entered_rx.recv().unwrap();
        assert!(registry.lookup(h).is_some());
        assert_eq!(registry.handles(), vec![h]);
        registry.create_button("b", None).unwrap();
        assert_eq!(registry.len(), 2);

        go_tx.send(()).unwrap();
        assert!(reading.join().unwrap());
    }
}
