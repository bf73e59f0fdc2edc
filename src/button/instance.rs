// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button thing.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::event::{EventBus, ThingEvent};
use crate::input::Debouncer;
use crate::runtime::ThingInput;
use crate::subscription::Subscribable;
use crate::types::{Handle, Level, Tick};

use super::config::ButtonConfig;
use super::gesture::{ButtonState, Emitted};
use super::recognizer::GestureRecognizer;

/// A momentary push button.
///
/// The button owns its debounce filter and gesture recognizer behind a
/// single lock; every input goes through [`process`](Self::process), so two
/// edges of the same button are never handled concurrently. Gesture events
/// are published after the lock is released.
///
/// Every operation fails with [`Error::Closed`] once the button is closed.
///
/// Buttons are created through
/// [`ThingRegistry::create_button`](crate::registry::ThingRegistry::create_button).
#[derive(Debug)]
pub struct Button {
    handle: Handle,
    id: String,
    config: ButtonConfig,
    bus: EventBus,
    core: Mutex<ButtonCore>,
    /// Written under the core lock, readable without it.
    closed: AtomicBool,
}

#[derive(Debug)]
struct ButtonCore {
    debouncer: Debouncer,
    recognizer: GestureRecognizer,
}

impl Button {
    pub(crate) fn new(handle: Handle, id: String, config: ButtonConfig, bus: EventBus) -> Self {
        Self {
            handle,
            id,
            config,
            bus,
            core: Mutex::new(ButtonCore {
                debouncer: Debouncer::new(config.debounce_ticks()),
                recognizer: GestureRecognizer::new(&config),
            }),
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

    /// Returns the timing configuration.
    #[must_use]
    pub fn config(&self) -> ButtonConfig {
        self.config
    }

    /// Returns `true` once the button has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Applies one input: a timer tick, a raw level change, or a close
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn process(&self, input: ThingInput) -> Result<()> {
        let (emitted, now) = {
            let mut core = self.core.lock();
            self.ensure_open()?;
            match input {
                ThingInput::Tick(now) => {
                    let edge = core.debouncer.poll(now);
                    (core.recognizer.step(edge, now), now)
                }
                ThingInput::Edge { level, now, .. } => {
                    tracing::trace!(id = %self.id, ?level, now, "Raw button level");
                    let edge = core.debouncer.observe(level, now);
                    (core.recognizer.step(edge, now), now)
                }
                ThingInput::Close => {
                    drop(core);
                    return self.close();
                }
            }
        };
        self.publish(emitted, now);
        Ok(())
    }

    /// Feeds a raw level sample taken at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn push_level(&self, level: Level, now: Tick) -> Result<()> {
        self.process(ThingInput::Edge { pin: 0, level, now })
    }

    /// Advances the timers to `now`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn tick(&self, now: Tick) -> Result<()> {
        self.process(ThingInput::Tick(now))
    }

    fn publish(&self, emitted: Emitted, now: Tick) {
        for code in emitted {
            // A callback may have closed the button mid-batch.
            if self.is_closed() {
                break;
            }
            tracing::debug!(id = %self.id, %code, now, "Button gesture");
            self.bus
                .publish(ThingEvent::gesture(self.handle, self.id.clone(), code, now));
        }
    }

    /// Returns `true` while a long press is in progress.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn is_pressed(&self) -> Result<bool> {
        Ok(self.state()? == ButtonState::Pressed)
    }

    /// Returns how long the current long press has lasted, in ticks.
    ///
    /// Zero when no long press is in progress.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn press_duration(&self) -> Result<Tick> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(core.recognizer.press_duration())
    }

    /// Returns the number of clicks (single or double) since the last reset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn press_counter(&self) -> Result<u32> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(core.recognizer.press_counter())
    }

    /// Returns the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn state(&self) -> Result<ButtonState> {
        let core = self.core.lock();
        self.ensure_open()?;
        Ok(core.recognizer.state())
    }

    /// Forces `Up` and clears the press counter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn reset(&self) -> Result<()> {
        let mut core = self.core.lock();
        self.ensure_open()?;
        core.recognizer.reset();
        tracing::debug!(id = %self.id, "Button reset");
        Ok(())
    }

    /// Overrides the state with a raw state code.
    ///
    /// The recognizer is reset and then placed in the requested state as of
    /// the last tick it saw; the debounce filter is aligned with it so the
    /// next physical edge is interpreted relative to the new state.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if `state` is not a [`ButtonState`]
    /// code, or `Error::Closed` if the button is already closed.
    pub fn set_push_state(&self, state: i32) -> Result<()> {
        let state = ButtonState::try_from(state).inspect_err(|_| {
            tracing::warn!(id = %self.id, state, "Rejected invalid push state");
        })?;
        let mut core = self.core.lock();
        self.ensure_open()?;
        let now = core.recognizer.last_tick();
        core.recognizer.force_state(state, now);
        let level = if state.is_down() { Level::High } else { Level::Low };
        core.debouncer.reset(level);
        tracing::debug!(id = %self.id, %state, "Button push state set");
        Ok(())
    }

    /// Closes the button.
    ///
    /// Pending recognizer state is discarded, a `Closed` event is published
    /// and the subscriptions bound to this button are dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the button is already closed.
    pub fn close(&self) -> Result<()> {
        {
            let mut core = self.core.lock();
            if self.closed.swap(true, Ordering::AcqRel) {
                return Err(Error::Closed);
            }
            core.recognizer.reset();
            core.debouncer.reset(Level::Low);
        }
        tracing::info!(id = %self.id, handle = %self.handle, "Button closed");
        self.bus
            .publish(ThingEvent::closed(self.handle, self.id.clone()));
        self.bus.callbacks().unsubscribe_source(self.handle);
        Ok(())
    }
}

impl Subscribable for Button {
    fn thing_handle(&self) -> Handle {
        self.handle
    }

    fn thing_bus(&self) -> &EventBus {
        &self.bus
    }
}
