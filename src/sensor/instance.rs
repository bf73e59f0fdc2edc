// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor thing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, ReentrantMutex};

use crate::error::{ConfigError, Error, ReadError, Result};
use crate::event::{EventBus, StateUpdate, ThingEvent};
use crate::runtime::ThingInput;
use crate::subscription::Subscribable;
use crate::types::{EdgeMode, Handle, SensorType, SensorValue, ThingType, Tick};

use super::acquisition::{Acquisition, InterruptSource, PollingSource};
use super::config::{InterruptConfig, SensorConfig};
use super::policy::should_notify;
use super::reader::SensorReader;
use super::store::ValueStore;

/// Override called with every committed reading.
///
/// Returning `false` suppresses the state-update event for that reading.
pub type StateHandler = Arc<dyn Fn(&StateUpdate) -> bool + Send + Sync>;

/// A typed, state-bearing sensor.
///
/// Readings are acquired from a [`SensorReader`] when the armed source
/// triggers (polling timer or interrupt edge), on
/// [`update_state`](Self::update_state), or on demand from
/// [`state`](Self::state). Each triggered reading is committed to the value
/// store, passed to the state handler if one is installed, and published as
/// a [`ThingEvent::StateUpdated`] when the notify policy says it is notable.
///
/// A read cycle holds the delivery lock from the read until the event is
/// published, so cycles are published in commit order and `close` waits for
/// an in-flight cycle to finish. The lock is reentrant: the state handler
/// may call back into the sensor, including `close`.
///
/// Every operation fails with [`Error::Closed`] once the sensor is closed.
pub struct Sensor {
    handle: Handle,
    id: String,
    sensor_type: SensorType,
    bus: EventBus,
    delivery: ReentrantMutex<()>,
    core: Mutex<SensorCore>,
    handler: Mutex<Option<StateHandler>>,
    /// Written under the core lock, readable without it.
    closed: AtomicBool,
}

struct SensorCore {
    config: SensorConfig,
    store: ValueStore,
    acquisition: Acquisition,
    reader: Box<dyn SensorReader>,
    /// Set once a reading has gone down the notifying path. Until then the
    /// next notifying reading is notable, even if `state()` already
    /// committed the same value silently.
    announced: bool,
    last_tick: Tick,
}

/// A committed reading waiting for the handler and the bus.
struct Committed {
    update: StateUpdate,
    notable: bool,
}

impl Sensor {
    pub(crate) fn new(
        handle: Handle,
        id: String,
        sensor_type: SensorType,
        config: SensorConfig,
        reader: Box<dyn SensorReader>,
        bus: EventBus,
    ) -> Self {
        Self {
            handle,
            id,
            sensor_type,
            bus,
            delivery: ReentrantMutex::new(()),
            core: Mutex::new(SensorCore {
                config,
                store: ValueStore::new(),
                acquisition: Acquisition::Idle,
                reader,
                announced: false,
                last_tick: 0,
            }),
            handler: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() { Err(Error::Closed) } else { Ok(()) }
    }

    /// Returns the registry handle.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the value type.
    #[must_use]
    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Returns the registry type tag.
    #[must_use]
    pub fn thing_type(&self) -> ThingType {
        self.sensor_type.into()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> SensorConfig {
        self.core.lock().config
    }

    /// Returns `true` once the sensor has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // =========================================================================
    // Input processing
    // =========================================================================

    /// Applies one input: a timer tick, a raw pin level, or a close request.
    ///
    /// A failed read is logged and skipped; the next trigger retries.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn process(&self, input: ThingInput) -> Result<()> {
        let _delivery = self.delivery.lock();
        let committed = {
            let mut core = self.core.lock();
            self.ensure_open()?;
            let due = match input {
                ThingInput::Tick(now) => {
                    core.last_tick = core.last_tick.max(now);
                    core.acquisition.on_tick(now)
                }
                ThingInput::Edge { pin, level, now } => {
                    tracing::trace!(id = %self.id, pin, ?level, now, "Raw sensor level");
                    core.last_tick = core.last_tick.max(now);
                    core.acquisition.on_edge(pin, level, now)
                }
                ThingInput::Close => {
                    drop(core);
                    return self.close();
                }
            };
            if !due {
                return Ok(());
            }
            match self.acquire(&mut core, true) {
                Ok(committed) => committed,
                Err(e) => {
                    tracing::warn!(id = %self.id, error = %e, "Sensor read failed, skipping cycle");
                    return Ok(());
                }
            }
        };
        self.deliver(committed);
        Ok(())
    }

    /// Runs one read-commit-notify cycle now.
    ///
    /// Returns `true` if a state-update event was published.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the read failed (nothing is committed), or
    /// `Error::Closed` if the sensor is already closed.
    pub fn update_state(&self) -> Result<bool> {
        let _delivery = self.delivery.lock();
        let committed = {
            let mut core = self.core.lock();
            self.ensure_open()?;
            self.acquire(&mut core, true).inspect_err(|e| {
                tracing::warn!(id = %self.id, error = %e, "Sensor read failed");
            })?
        };
        Ok(self.deliver(committed))
    }

    /// Reads and commits a value. With `notify` unset the commit is silent
    /// and never notable.
    fn acquire(
        &self,
        core: &mut SensorCore,
        notify: bool,
    ) -> std::result::Result<Committed, ReadError> {
        let value = core.reader.read()?;
        if !value.fits(self.sensor_type) {
            return Err(ReadError::TypeMismatch {
                expected: self.sensor_type,
                actual: value.kind(),
            });
        }
        core.store.commit(value);
        let previous = core.store.previous().copied();
        let notable = notify
            && (!core.announced
                || should_notify(core.config.notify_mode(), previous.as_ref(), &value));
        core.announced |= notify;
        Ok(Committed {
            update: StateUpdate {
                handle: self.handle,
                id: self.id.clone(),
                value,
                previous,
                tick: core.last_tick,
            },
            notable,
        })
    }

    /// Runs the handler, then publishes if allowed and notable.
    ///
    /// Called with the delivery lock held.
    fn deliver(&self, committed: Committed) -> bool {
        let handler = self.handler.lock().clone();
        let proceed = handler.is_none_or(|handler| handler(&committed.update));
        if !proceed {
            tracing::debug!(id = %self.id, value = %committed.update.value, "State update suppressed by handler");
            return false;
        }
        if self.is_closed() {
            tracing::debug!(id = %self.id, value = %committed.update.value, "Sensor closed by handler, dropping update");
            return false;
        }
        if !committed.notable {
            tracing::trace!(id = %self.id, value = %committed.update.value, "Unchanged state, not notifying");
            return false;
        }
        tracing::debug!(
            id = %self.id,
            value = %committed.update.value,
            previous = ?committed.update.previous,
            "Sensor state updated"
        );
        self.bus.publish(ThingEvent::StateUpdated(committed.update));
        true
    }

    // =========================================================================
    // Polling source
    // =========================================================================

    /// Arms a polling timer reading every `ticks` ticks.
    ///
    /// [`DEFAULT_POLLING_TICKS`](super::DEFAULT_POLLING_TICKS) is the
    /// binding layer's default interval.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero interval, `Error::SourceConflict`
    /// if a polling or interrupt source is already armed, or `Error::Closed`.
    pub fn set_polling(&self, ticks: Tick) -> Result<()> {
        if ticks == 0 {
            return Err(ConfigError::InvalidTicks {
                field: "pollingTicks",
                value: 0,
            }
            .into());
        }
        let mut core = self.core.lock();
        self.ensure_open()?;
        if !core.acquisition.is_idle() {
            tracing::warn!(id = %self.id, "Cannot arm polling: a source is already armed");
            return Err(Error::SourceConflict);
        }
        core.acquisition = Acquisition::Polling(PollingSource::new(ticks, core.last_tick));
        tracing::info!(id = %self.id, ticks, "Polling armed");
        Ok(())
    }

    /// Suspends the polling timer.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if polling is not armed, or `Error::Closed`.
    pub fn pause_polling(&self) -> Result<()> {
        self.with_polling(PollingSource::pause)
    }

    /// Resumes a paused polling timer where it stopped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if polling is not armed, or `Error::Closed`.
    pub fn restart_polling(&self) -> Result<()> {
        self.with_polling(PollingSource::resume)
    }

    /// Disarms the polling timer.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if polling is not armed, or `Error::Closed`.
    pub fn clear_polling(&self) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        if !matches!(core.acquisition, Acquisition::Polling(_)) {
            return Err(Error::NoSource);
        }
        core.acquisition = Acquisition::Idle;
        tracing::info!(id = %self.id, "Polling cleared");
        Ok(())
    }

    /// Returns the polling interval, if polling is armed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn polling_interval(&self) -> Result<Option<Tick>> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(match &core.acquisition {
            Acquisition::Polling(polling) => Some(polling.interval()),
            _ => None,
        })
    }

    fn with_polling(&self, f: impl FnOnce(&mut PollingSource)) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        match &mut core.acquisition {
            Acquisition::Polling(polling) => {
                f(polling);
                tracing::debug!(id = %self.id, paused = polling.is_paused(), "Polling updated");
                Ok(())
            }
            _ => Err(Error::NoSource),
        }
    }

    // =========================================================================
    // Interrupt source
    // =========================================================================

    /// Arms an interrupt source on `pin`, without debouncing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a negative pin, `Error::SourceConflict` if
    /// a polling or interrupt source is already armed, or `Error::Closed`.
    pub fn set_interrupt(&self, pin: i32, edge_mode: EdgeMode) -> Result<()> {
        self.set_interrupt_with(InterruptConfig::new(pin, edge_mode)?)
    }

    /// Arms an interrupt source.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceConflict` if a polling or interrupt source is
    /// already armed, or `Error::Closed`.
    pub fn set_interrupt_with(&self, config: InterruptConfig) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        if !core.acquisition.is_idle() {
            tracing::warn!(id = %self.id, pin = config.pin(), "Cannot arm interrupt: a source is already armed");
            return Err(Error::SourceConflict);
        }
        core.acquisition = Acquisition::Interrupt(InterruptSource::new(config));
        tracing::info!(
            id = %self.id,
            pin = config.pin(),
            edge_mode = ?config.edge_mode(),
            debounce_ticks = config.debounce_ticks(),
            "Interrupt armed"
        );
        Ok(())
    }

    /// Ignores interrupt edges until restarted.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if no interrupt is armed, or `Error::Closed`.
    pub fn pause_interrupt(&self) -> Result<()> {
        self.with_interrupt(InterruptSource::pause)
    }

    /// Resumes a paused interrupt source.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if no interrupt is armed, or `Error::Closed`.
    pub fn restart_interrupt(&self) -> Result<()> {
        self.with_interrupt(InterruptSource::resume)
    }

    /// Disarms the interrupt source.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSource` if no interrupt is armed, or `Error::Closed`.
    pub fn clear_interrupt(&self) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        if !matches!(core.acquisition, Acquisition::Interrupt(_)) {
            return Err(Error::NoSource);
        }
        core.acquisition = Acquisition::Idle;
        tracing::info!(id = %self.id, "Interrupt cleared");
        Ok(())
    }

    /// Returns the interrupt configuration, if an interrupt is armed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn interrupt_config(&self) -> Result<Option<InterruptConfig>> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(match &core.acquisition {
            Acquisition::Interrupt(interrupt) => Some(interrupt.config()),
            _ => None,
        })
    }

    fn with_interrupt(&self, f: impl FnOnce(&mut InterruptSource)) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        match &mut core.acquisition {
            Acquisition::Interrupt(interrupt) => {
                f(interrupt);
                tracing::debug!(id = %self.id, paused = interrupt.is_paused(), "Interrupt updated");
                Ok(())
            }
            _ => Err(Error::NoSource),
        }
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Returns the current value.
    ///
    /// With an interrupt armed the cached value is returned, since it is only
    /// refreshed by edges. Otherwise a read is performed and committed
    /// without notifying; if it fails, the cached value is returned. A silent
    /// commit does not count as the initial notification: the next triggered
    /// reading is published regardless of the notify mode.
    /// `None` means nothing has been committed yet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn state(&self) -> Result<Option<SensorValue>> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        if matches!(core.acquisition, Acquisition::Interrupt(_)) {
            return Ok(core.store.current().copied());
        }
        match self.acquire(&mut core, false) {
            Ok(committed) => Ok(Some(committed.update.value)),
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "On-demand read failed, using cached value");
                Ok(core.store.current().copied())
            }
        }
    }

    /// Returns the name of the current value.
    ///
    /// Always `None` for decimal sensors.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn state_name(&self) -> Result<Option<String>> {
        if !self.sensor_type.supports_names() {
            return Ok(None);
        }
        match self.state()?.as_ref().and_then(SensorValue::as_integer) {
            Some(value) => self.state_name_by_value(value),
            None => Ok(None),
        }
    }

    /// Returns the name registered for `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn state_name_by_value(&self, value: i64) -> Result<Option<String>> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(core.store.name_for(value).map(str::to_owned))
    }

    /// Registers (or replaces) the name of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedType` on a decimal sensor, or
    /// `Error::Closed`.
    pub fn set_state_name(&self, value: i64, name: impl Into<String>) -> Result<()> {
        if !self.sensor_type.supports_names() {
            return Err(Error::UnsupportedType(self.sensor_type));
        }
        let mut core = self.core.lock();
        self.ensure_open()?;
        core.store.set_name(value, name);
        Ok(())
    }

    /// Removes every state name.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn clear_state_names(&self) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        core.store.clear_names();
        Ok(())
    }

    // =========================================================================
    // State handler
    // =========================================================================

    /// Installs the state handler.
    ///
    /// The handler sees every committed reading before the notify policy.
    /// It runs outside the sensor lock and may call back into the sensor.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceConflict` if a handler is already installed (reset
    /// it first), or `Error::Closed`.
    pub fn set_state_handler<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(&StateUpdate) -> bool + Send + Sync + 'static,
    {
        self.ensure_open()?;
        let mut slot = self.handler.lock();
        if slot.is_some() {
            tracing::warn!(id = %self.id, "State handler already set");
            return Err(Error::SourceConflict);
        }
        *slot = Some(Arc::new(handler));
        Ok(())
    }

    /// Removes the state handler, restoring the default publish path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn reset_state_handler(&self) -> Result<()> {
        self.ensure_open()?;
        self.handler.lock().take();
        Ok(())
    }

    /// Returns `true` if a state handler is installed.
    #[must_use]
    pub fn has_state_handler(&self) -> bool {
        self.handler.lock().is_some()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes the sensor.
    ///
    /// The armed source is dropped along with the state handler, a `Closed`
    /// event is published and the subscriptions bound to this sensor are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the sensor is already closed.
    pub fn close(&self) -> Result<()> {
        let _delivery = self.delivery.lock();
        {
            let mut core = self.core.lock();
            if self.closed.swap(true, Ordering::AcqRel) {
                return Err(Error::Closed);
            }
            core.acquisition = Acquisition::Idle;
        }
        self.handler.lock().take();
        tracing::info!(id = %self.id, handle = %self.handle, "Sensor closed");
        self.bus
            .publish(ThingEvent::closed(self.handle, self.id.clone()));
        self.bus.callbacks().unsubscribe_source(self.handle);
        Ok(())
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.lock();
        f.debug_struct("Sensor")
            .field("handle", &self.handle)
            .field("id", &self.id)
            .field("sensor_type", &self.sensor_type)
            .field("config", &core.config)
            .field("store", &core.store)
            .field("acquisition", &core.acquisition)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Subscribable for Sensor {
    fn thing_handle(&self) -> Handle {
        self.handle
    }

    fn thing_bus(&self) -> &EventBus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::event::EventCode;
    use crate::sensor::NotifyMode;
    use crate::types::Level;

    type Updates = Arc<Mutex<Vec<(Option<SensorValue>, SensorValue)>>>;

    /// A sensor whose reader returns the values pushed into `feed`, repeating
    /// the last one.
    fn sensor(
        sensor_type: SensorType,
        mode: NotifyMode,
    ) -> (Sensor, Arc<Mutex<Vec<SensorValue>>>, Updates) {
        let feed: Arc<Mutex<Vec<SensorValue>>> = Arc::new(Mutex::new(Vec::new()));
        let f = feed.clone();
        let reader = move || {
            let mut feed = f.lock();
            match feed.len() {
                0 => Err(ReadError::Hardware("no data".into())),
                1 => Ok(feed[0]),
                _ => Ok(feed.remove(0)),
            }
        };
        let bus = EventBus::new();
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let u = updates.clone();
        bus.callbacks()
            .on_state_updated(None, move |update| u.lock().push((update.previous, update.value)));
        let sensor = Sensor::new(
            Handle::from_raw(1),
            "sensor".into(),
            sensor_type,
            SensorConfig::default().with_notify_mode(mode),
            Box::new(reader),
            bus,
        );
        (sensor, feed, updates)
    }

    fn int(v: i64) -> SensorValue {
        SensorValue::Integer(v)
    }

    #[test]
    fn polling_if_changed_skips_repeats() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::IfChanged);
        feed.lock().extend([int(5), int(5), int(6)]);
        s.set_polling(10).unwrap();
        for now in 1..=30 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert_eq!(
            *updates.lock(),
            vec![(None, int(5)), (Some(int(5)), int(6))]
        );
    }

    #[test]
    fn polling_always_notifies_every_read() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().push(int(5));
        s.set_polling(10).unwrap();
        for now in 1..=30 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert_eq!(updates.lock().len(), 3);
    }

    #[test]
    fn failed_read_is_skipped() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::IfChanged);
        s.set_polling(5).unwrap();
        for now in 1..=5 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert!(updates.lock().is_empty());

        feed.lock().push(int(1));
        for now in 6..=10 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert_eq!(*updates.lock(), vec![(None, int(1))]);
    }

    #[test]
    fn mismatched_value_kind_is_a_read_error() {
        let (s, feed, updates) = sensor(SensorType::Binary, NotifyMode::Always);
        feed.lock().push(SensorValue::Decimal(1.0));
        let err = s.update_state().unwrap_err();
        assert!(matches!(err, Error::Read(ReadError::TypeMismatch { .. })));
        assert!(updates.lock().is_empty());
    }

    #[test]
    fn interrupt_rejected_while_polling() {
        let (s, _, _) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        s.set_polling(100).unwrap();
        assert!(matches!(
            s.set_interrupt(3, EdgeMode::Both),
            Err(Error::SourceConflict)
        ));
        assert_eq!(s.polling_interval().unwrap(), Some(100));
        assert_eq!(s.interrupt_config().unwrap(), None);

        s.clear_polling().unwrap();
        s.set_interrupt(3, EdgeMode::Both).unwrap();
        assert!(matches!(s.set_polling(100), Err(Error::SourceConflict)));
    }

    #[test]
    fn rearming_same_source_rejected() {
        let (s, _, _) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        s.set_polling(100).unwrap();
        assert!(matches!(s.set_polling(50), Err(Error::SourceConflict)));
        assert_eq!(s.polling_interval().unwrap(), Some(100));
    }

    #[test]
    fn controls_require_matching_source() {
        let (s, _, _) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        assert!(matches!(s.pause_polling(), Err(Error::NoSource)));
        assert!(matches!(s.clear_interrupt(), Err(Error::NoSource)));
        s.set_interrupt(1, EdgeMode::Rising).unwrap();
        assert!(matches!(s.restart_polling(), Err(Error::NoSource)));
        s.pause_interrupt().unwrap();
        s.restart_interrupt().unwrap();
    }

    #[test]
    fn zero_polling_interval_rejected() {
        let (s, _, _) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        assert!(matches!(s.set_polling(0), Err(Error::Config(_))));
        assert_eq!(s.polling_interval().unwrap(), None);
    }

    #[test]
    fn paused_polling_does_not_read() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().push(int(1));
        s.set_polling(10).unwrap();
        s.pause_polling().unwrap();
        for now in 1..=50 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert!(updates.lock().is_empty());
        s.restart_polling().unwrap();
        for now in 51..=60 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert_eq!(updates.lock().len(), 1);
    }

    #[test]
    fn interrupt_edge_triggers_read() {
        let (s, feed, updates) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        feed.lock().extend([SensorValue::Binary(true), SensorValue::Binary(false)]);
        s.set_interrupt(7, EdgeMode::Both).unwrap();

        s.process(ThingInput::Edge { pin: 7, level: Level::High, now: 1 }).unwrap();
        s.process(ThingInput::Edge { pin: 8, level: Level::Low, now: 2 }).unwrap();
        s.process(ThingInput::Edge { pin: 7, level: Level::Low, now: 3 }).unwrap();
        assert_eq!(
            *updates.lock(),
            vec![
                (None, SensorValue::Binary(true)),
                (Some(SensorValue::Binary(true)), SensorValue::Binary(false))
            ]
        );
    }

    #[test]
    fn handler_can_suppress_publish() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().extend([int(1), int(2)]);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        s.set_state_handler(move |update| {
            c.fetch_add(1, Ordering::SeqCst);
            update.value != int(1)
        })
        .unwrap();

        assert!(!s.update_state().unwrap());
        assert!(s.update_state().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*updates.lock(), vec![(Some(int(1)), int(2))]);
    }

    #[test]
    fn handler_runs_even_when_not_notable() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::IfChanged);
        feed.lock().push(int(4));
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        s.set_state_handler(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();
        s.update_state().unwrap();
        s.update_state().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(updates.lock().len(), 1);
    }

    #[test]
    fn handler_slot_is_single_owner() {
        let (s, _, _) = sensor(SensorType::Integer, NotifyMode::IfChanged);
        s.set_state_handler(|_| true).unwrap();
        assert!(matches!(
            s.set_state_handler(|_| false),
            Err(Error::SourceConflict)
        ));
        s.reset_state_handler().unwrap();
        assert!(!s.has_state_handler());
        s.set_state_handler(|_| false).unwrap();
    }

    #[test]
    fn state_reads_on_demand_without_notifying() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().extend([int(3), int(4)]);
        assert_eq!(s.state().unwrap(), Some(int(3)));
        assert_eq!(s.state().unwrap(), Some(int(4)));
        assert!(updates.lock().is_empty());
    }

    #[test]
    fn state_with_interrupt_returns_cached_value() {
        let (s, feed, _) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().extend([int(3), int(4)]);
        s.set_interrupt(1, EdgeMode::Rising).unwrap();
        assert_eq!(s.state().unwrap(), None);
        s.process(ThingInput::Edge { pin: 1, level: Level::High, now: 1 }).unwrap();
        assert_eq!(s.state().unwrap(), Some(int(3)));
        assert_eq!(s.state().unwrap(), Some(int(3)));
    }

    #[test]
    fn state_falls_back_to_cache_on_read_failure() {
        let (s, _, _) = sensor(SensorType::Integer, NotifyMode::Always);
        assert_eq!(s.state().unwrap(), None);
    }

    #[test]
    fn state_names() {
        let (s, feed, _) = sensor(SensorType::Binary, NotifyMode::IfChanged);
        feed.lock().push(SensorValue::Binary(true));
        s.set_state_name(0, "closed").unwrap();
        s.set_state_name(1, "open").unwrap();
        assert_eq!(s.state_name().unwrap().as_deref(), Some("open"));
        assert_eq!(s.state_name_by_value(0).unwrap().as_deref(), Some("closed"));
        assert_eq!(s.state_name_by_value(2).unwrap(), None);

        s.clear_state_names().unwrap();
        assert_eq!(s.state_name().unwrap(), None);
    }

    #[test]
    fn decimal_sensor_has_no_names() {
        let (s, feed, _) = sensor(SensorType::Decimal, NotifyMode::IfChanged);
        feed.lock().push(SensorValue::Decimal(20.5));
        assert!(matches!(
            s.set_state_name(1, "warm"),
            Err(Error::UnsupportedType(SensorType::Decimal))
        ));
        assert_eq!(s.state_name().unwrap(), None);
    }

    #[test]
    fn close_is_final() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().push(int(1));
        let closed = Arc::new(AtomicUsize::new(0));
        let c = closed.clone();
        s.subscribe(EventCode::Closed, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        s.set_polling(1).unwrap();

        s.close().unwrap();
        assert!(s.is_closed());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(matches!(s.close(), Err(Error::Closed)));
        assert!(matches!(s.process(ThingInput::Tick(5)), Err(Error::Closed)));
        assert!(matches!(s.update_state(), Err(Error::Closed)));
        assert!(matches!(s.set_polling(1), Err(Error::Closed)));
        assert!(matches!(s.state(), Err(Error::Closed)));
        assert!(updates.lock().is_empty());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn silent_state_read_keeps_first_notification() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::IfChanged);
        feed.lock().push(int(5));
        assert_eq!(s.state().unwrap(), Some(int(5)));
        assert!(updates.lock().is_empty());

        s.set_polling(1).unwrap();
        for now in 1..=5 {
            s.process(ThingInput::Tick(now)).unwrap();
        }
        assert_eq!(*updates.lock(), vec![(Some(int(5)), int(5))]);
    }

    #[test]
    fn handler_closing_the_sensor_drops_the_update() {
        let (s, feed, updates) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().push(int(7));
        let s = Arc::new(s);
        let mut events = s.thing_bus().subscribe();
        let weak = Arc::downgrade(&s);
        s.set_state_handler(move |_| {
            if let Some(s) = weak.upgrade() {
                s.close().unwrap();
            }
            true
        })
        .unwrap();

        assert!(!s.update_state().unwrap());
        assert!(s.is_closed());
        assert!(updates.lock().is_empty());
        assert_eq!(events.try_recv().unwrap().code(), EventCode::Closed);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn close_waits_for_in_flight_update() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let (s, feed, _) = sensor(SensorType::Integer, NotifyMode::Always);
        feed.lock().push(int(1));
        let s = Arc::new(s);
        let mut events = s.thing_bus().subscribe();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let go_rx = Mutex::new(go_rx);
        s.set_state_handler(move |_| {
            entered_tx.send(()).unwrap();
            go_rx.lock().recv().unwrap();
            true
        })
        .unwrap();

        let updater = {
            let s = Arc::clone(&s);
            thread::spawn(move || s.update_state().unwrap())
        };
        entered_rx.recv().unwrap();
        let closer = {
            let s = Arc::clone(&s);
            thread::spawn(move || s.close().unwrap())
        };
        thread::sleep(Duration::from_millis(20));
        assert!(!s.is_closed());

        go_tx.send(()).unwrap();
        assert!(updater.join().unwrap());
        closer.join().unwrap();

        assert_eq!(events.try_recv().unwrap().code(), EventCode::StateUpdated);
        assert_eq!(events.try_recv().unwrap().code(), EventCode::Closed);
    }
}
