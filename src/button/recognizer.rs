// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gesture classification state machine.

use crate::types::{Edge, Tick};

use super::config::ButtonConfig;
use super::gesture::{ButtonState, Emitted, GestureCode};

/// Classifies debounced edges into button gestures.
///
/// The recognizer is a pure state machine: it is advanced with
/// [`step`](Self::step), which takes an optional stable edge and the current
/// tick. Within a step the edge is applied before the timeouts are checked,
/// so a second push landing on the very tick the click window closes still
/// counts as a double click.
///
/// Rising edges mean "down", falling edges mean "up". Every `(state, input)`
/// pair not listed in the module diagram is a self-loop.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    click_ticks: Tick,
    press_ticks: Tick,
    press_repeat_ticks: Tick,
    state: ButtonState,
    /// Tick of the last edge that changed the state.
    edge_tick: Tick,
    /// Tick of the push that started the current press.
    down_tick: Tick,
    /// Next repeat of `Press` while in `Pressed`.
    next_repeat: Tick,
    press_counter: u32,
    last_tick: Tick,
}

impl GestureRecognizer {
    /// Creates a recognizer in [`ButtonState::Up`].
    #[must_use]
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            click_ticks: config.click_ticks(),
            press_ticks: config.press_ticks(),
            press_repeat_ticks: config.press_repeat_ticks(),
            state: ButtonState::Up,
            edge_tick: 0,
            down_tick: 0,
            next_repeat: 0,
            press_counter: 0,
            last_tick: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ButtonState {
        self.state
    }

    /// Returns the number of clicks (single or double) completed since the
    /// last reset.
    #[must_use]
    pub const fn press_counter(&self) -> u32 {
        self.press_counter
    }

    /// Returns for how many ticks the button has been held, measured from
    /// the push that started it. Zero unless the state is `Pressed`.
    #[must_use]
    pub const fn press_duration(&self) -> Tick {
        match self.state {
            ButtonState::Pressed => self.last_tick.saturating_sub(self.down_tick),
            _ => 0,
        }
    }

    /// Returns the most recent tick seen by the recognizer.
    #[must_use]
    pub const fn last_tick(&self) -> Tick {
        self.last_tick
    }

    /// Advances the state machine to `now`, applying `edge` first.
    pub fn step(&mut self, edge: Option<Edge>, now: Tick) -> Emitted {
        let mut out = Emitted::default();
        self.last_tick = self.last_tick.max(now);
        if let Some(edge) = edge {
            self.on_edge(edge, now, &mut out);
        }
        self.on_timer(now, &mut out);
        out
    }

    fn on_edge(&mut self, edge: Edge, now: Tick, out: &mut Emitted) {
        match (self.state, edge) {
            (ButtonState::Up, Edge::Rising) => self.push_down(now, out),
            (ButtonState::Down, Edge::Falling) => {
                if now.saturating_sub(self.edge_tick) >= self.press_ticks {
                    // The press timeout passed on ticks that were never
                    // delivered: this was a long press, not a click.
                    self.state = ButtonState::Up;
                    self.edge_tick = now;
                    out.push(GestureCode::Press);
                    out.push(GestureCode::PressEnd);
                    out.push(GestureCode::Up);
                } else {
                    self.state = ButtonState::FirstUp;
                    self.edge_tick = now;
                    out.push(GestureCode::Up);
                }
            }
            (ButtonState::FirstUp, Edge::Rising) => {
                if now.saturating_sub(self.edge_tick) > self.click_ticks {
                    // The window closed on an earlier tick that was never
                    // delivered: settle the click, then start a new press.
                    self.complete_click(out);
                    self.push_down(now, out);
                } else {
                    self.state = ButtonState::SecondDown;
                    self.edge_tick = now;
                    out.push(GestureCode::Down);
                }
            }
            (ButtonState::SecondDown, Edge::Falling) => {
                self.state = ButtonState::Up;
                self.edge_tick = now;
                self.press_counter = self.press_counter.saturating_add(1);
                out.push(GestureCode::Up);
                out.push(GestureCode::DoubleClick);
            }
            (ButtonState::Pressed, Edge::Falling) => {
                self.state = ButtonState::Up;
                self.edge_tick = now;
                out.push(GestureCode::PressEnd);
                out.push(GestureCode::Up);
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, now: Tick, out: &mut Emitted) {
        let elapsed = now.saturating_sub(self.edge_tick);
        match self.state {
            ButtonState::Down if elapsed >= self.press_ticks => {
                self.state = ButtonState::Pressed;
                self.next_repeat = self.edge_tick + self.press_ticks + self.press_repeat_ticks;
                out.push(GestureCode::Press);
            }
            ButtonState::Pressed if self.press_repeat_ticks > 0 && now >= self.next_repeat => {
                // Skipped ticks collapse into a single repeat.
                while self.next_repeat <= now {
                    self.next_repeat += self.press_repeat_ticks;
                }
                out.push(GestureCode::Press);
            }
            ButtonState::FirstUp if elapsed >= self.click_ticks => self.complete_click(out),
            _ => {}
        }
    }

    fn push_down(&mut self, now: Tick, out: &mut Emitted) {
        self.state = ButtonState::Down;
        self.edge_tick = now;
        self.down_tick = now;
        out.push(GestureCode::Down);
    }

    fn complete_click(&mut self, out: &mut Emitted) {
        self.state = ButtonState::Up;
        self.press_counter = self.press_counter.saturating_add(1);
        out.push(GestureCode::Click);
    }

    /// Forces `Up` and clears the press counter, whatever the current state.
    pub fn reset(&mut self) {
        self.state = ButtonState::Up;
        self.press_counter = 0;
        self.edge_tick = self.last_tick;
        self.down_tick = self.last_tick;
        self.next_repeat = 0;
    }

    /// Resets, then places the machine in `state` as if it had been entered
    /// at `now`.
    pub fn force_state(&mut self, state: ButtonState, now: Tick) {
        self.last_tick = self.last_tick.max(now);
        self.reset();
        self.state = state;
        self.edge_tick = now;
        self.down_tick = now;
        self.next_repeat = now + self.press_repeat_ticks;
    }
}
