// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tick-based debounce filter.

use crate::types::{Edge, Level, Tick};

/// Suppresses electrical bounce on a digital input.
///
/// A level change is reported as a stable [`Edge`] only once the raw level
/// has stayed unchanged for at least `debounce_ticks` ticks. Any reversal
/// inside the window restarts the count from the new level. With
/// `debounce_ticks == 0` every change is reported immediately.
///
/// Raw samples are fed with [`observe`](Self::observe); timer ticks call
/// [`poll`](Self::poll) so that a level which stops changing still gets
/// confirmed.
///
/// # Examples
///
/// ```
/// use zthing::input::Debouncer;
/// use zthing::types::{Edge, Level};
///
/// let mut d = Debouncer::new(5);
/// assert_eq!(d.observe(Level::High, 0), None);
/// assert_eq!(d.poll(4), None);
/// assert_eq!(d.poll(5), Some(Edge::Rising));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    debounce_ticks: Tick,
    stable: Level,
    candidate: Level,
    since: Tick,
}

impl Debouncer {
    /// Creates a filter starting at [`Level::Low`].
    #[must_use]
    pub const fn new(debounce_ticks: Tick) -> Self {
        Self::with_level(debounce_ticks, Level::Low)
    }

    /// Creates a filter starting at the given stable level.
    #[must_use]
    pub const fn with_level(debounce_ticks: Tick, level: Level) -> Self {
        Self {
            debounce_ticks,
            stable: level,
            candidate: level,
            since: 0,
        }
    }

    /// Feeds a raw level sample taken at `now`.
    pub fn observe(&mut self, level: Level, now: Tick) -> Option<Edge> {
        if level != self.candidate {
            self.candidate = level;
            self.since = now;
        }
        self.settle(now)
    }

    /// Re-evaluates the pending level at `now` without a new sample.
    pub fn poll(&mut self, now: Tick) -> Option<Edge> {
        self.settle(now)
    }

    fn settle(&mut self, now: Tick) -> Option<Edge> {
        if self.candidate == self.stable
            || now.saturating_sub(self.since) < self.debounce_ticks
        {
            return None;
        }
        let edge = self.stable.edge_to(self.candidate);
        self.stable = self.candidate;
        edge
    }

    /// Returns the last confirmed level.
    #[must_use]
    pub const fn stable_level(&self) -> Level {
        self.stable
    }

    /// Returns `true` while a level change is waiting for confirmation.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.candidate != self.stable
    }

    /// Returns the configured window.
    #[must_use]
    pub const fn debounce_ticks(&self) -> Tick {
        self.debounce_ticks
    }

    /// Forgets any pending change and sets the stable level.
    pub fn reset(&mut self, level: Level) {
        self.stable = level;
        self.candidate = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_reports_immediately() {
        let mut d = Debouncer::new(0);
        assert_eq!(d.observe(Level::High, 3), Some(Edge::Rising));
        assert_eq!(d.observe(Level::Low, 3), Some(Edge::Falling));
        assert_eq!(d.observe(Level::Low, 4), None);
    }

    #[test]
    fn bounce_inside_window_reports_nothing() {
        let mut d = Debouncer::new(5);
        assert_eq!(d.observe(Level::High, 0), None);
        assert_eq!(d.observe(Level::Low, 2), None);
        for now in 3..20 {
            assert_eq!(d.poll(now), None);
        }
        assert_eq!(d.stable_level(), Level::Low);
    }

    #[test]
    fn held_level_reports_exactly_one_edge() {
        let mut d = Debouncer::new(5);
        d.observe(Level::High, 10);
        let edges: Vec<_> = (10..30).filter_map(|now| d.observe(Level::High, now)).collect();
        assert_eq!(edges, vec![Edge::Rising]);
    }

    #[test]
    fn reversal_restarts_window() {
        let mut d = Debouncer::new(4);
        d.observe(Level::High, 0);
        d.observe(Level::Low, 2);
        d.observe(Level::High, 3);
        assert_eq!(d.poll(6), None);
        assert_eq!(d.poll(7), Some(Edge::Rising));
    }

    #[test]
    fn settling_flag_tracks_pending_change() {
        let mut d = Debouncer::new(2);
        assert!(!d.is_settling());
        d.observe(Level::High, 0);
        assert!(d.is_settling());
        d.poll(2);
        assert!(!d.is_settling());
    }

    #[test]
    fn reset_drops_pending_change() {
        let mut d = Debouncer::new(2);
        d.observe(Level::High, 0);
        d.reset(Level::Low);
        assert_eq!(d.poll(10), None);
    }
}
