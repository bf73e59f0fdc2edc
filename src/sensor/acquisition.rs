// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Acquisition triggers: polling timer or interrupt line.

use crate::input::Debouncer;
use crate::types::{Edge, Level, Tick};

use super::config::InterruptConfig;

/// The acquisition source armed on a sensor. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Acquisition {
    /// No source; readings only happen on demand.
    #[default]
    Idle,
    /// Periodic reads.
    Polling(PollingSource),
    /// Reads on qualifying edges of an input pin.
    Interrupt(InterruptSource),
}

impl Acquisition {
    /// Returns `true` when no source is armed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Advances the armed source to `now`; returns `true` if a read is due.
    pub fn on_tick(&mut self, now: Tick) -> bool {
        match self {
            Self::Idle => false,
            Self::Polling(polling) => polling.on_tick(now),
            Self::Interrupt(interrupt) => interrupt.on_tick(now),
        }
    }

    /// Feeds a raw pin level; returns `true` if a read is due.
    pub fn on_edge(&mut self, pin: u32, level: Level, now: Tick) -> bool {
        match self {
            Self::Interrupt(interrupt) => interrupt.on_edge(pin, level, now),
            Self::Idle | Self::Polling(_) => false,
        }
    }
}

/// Polling timer.
///
/// Elapsed time only accumulates while running, so pausing and restarting
/// resumes the interval where it stopped. When several intervals elapse
/// between two ticks a single read is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSource {
    interval: Tick,
    elapsed: Tick,
    paused: bool,
    last: Tick,
}

impl PollingSource {
    /// Arms a timer firing every `interval` ticks, starting at `now`.
    #[must_use]
    pub fn new(interval: Tick, now: Tick) -> Self {
        Self {
            interval,
            elapsed: 0,
            paused: false,
            last: now,
        }
    }

    /// Returns the interval.
    #[must_use]
    pub const fn interval(&self) -> Tick {
        self.interval
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspends the timer.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the timer.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    fn on_tick(&mut self, now: Tick) -> bool {
        let delta = now.saturating_sub(self.last);
        self.last = self.last.max(now);
        if self.paused {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed %= self.interval;
        true
    }
}

/// Interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptSource {
    config: InterruptConfig,
    debouncer: Debouncer,
    paused: bool,
}

impl InterruptSource {
    /// Arms the line described by `config`.
    #[must_use]
    pub fn new(config: InterruptConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(config.debounce_ticks()),
            paused: false,
        }
    }

    /// Returns the line configuration.
    #[must_use]
    pub const fn config(&self) -> InterruptConfig {
        self.config
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ignores edges until resumed. The line level is still tracked.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes triggering reads.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    fn on_edge(&mut self, pin: u32, level: Level, now: Tick) -> bool {
        if pin != self.config.pin() {
            return false;
        }
        let edge = self.debouncer.observe(level, now);
        self.qualifies(edge)
    }

    fn on_tick(&mut self, now: Tick) -> bool {
        let edge = self.debouncer.poll(now);
        self.qualifies(edge)
    }

    fn qualifies(&self, edge: Option<Edge>) -> bool {
        !self.paused && edge.is_some_and(|edge| self.config.edge_mode().matches(edge))
    }
}
