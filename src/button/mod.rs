// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Momentary push buttons.
//!
//! A [`Button`] debounces its input with a [`Debouncer`](crate::input::Debouncer)
//! and feeds the stable edges to a [`GestureRecognizer`], which classifies
//! them into clicks, double clicks and long presses.
//!
//! # State machine
//!
//! ```text
//!  UP ──down──▶ DOWN ──up (< press)──▶ FIRST_UP ──timeout (click)──▶ UP  [ON_CLICK]
//!                │                        │
//!                │ held ≥ press           └──down (≤ click)──▶ SECOND_DOWN ──up──▶ UP  [ON_DBLCLICK]
//!                ▼
//!             PRESSED ──up──▶ UP  [ON_PRESS_END]
//! ```
//!
//! # Examples
//!
//! ```
//! use zthing::button::{ButtonState, GestureCode, GestureRecognizer};
//! use zthing::button::ButtonConfig;
//! use zthing::types::Edge;
//!
//! let config = ButtonConfig::default()
//!     .with_click_ticks(30)
//!     .with_press_ticks(20);
//! let mut rec = GestureRecognizer::new(&config);
//!
//! rec.step(Some(Edge::Rising), 0);
//! rec.step(Some(Edge::Falling), 5);
//! let emitted: Vec<_> = rec.step(None, 35).into_iter().collect();
//!
//! assert_eq!(emitted, vec![GestureCode::Click]);
//! assert_eq!(rec.state(), ButtonState::Up);
//! assert_eq!(rec.press_counter(), 1);
//! ```

mod config;
mod gesture;
mod instance;
mod recognizer;

pub use config::{
    ButtonConfig, DEFAULT_CLICK_TICKS, DEFAULT_DEBOUNCE_TICKS, DEFAULT_PRESS_REPEAT_TICKS,
    DEFAULT_PRESS_TICKS, RawButtonConfig,
};
pub use gesture::{ButtonState, Emitted, GestureCode};
pub use instance::Button;
pub use recognizer::GestureRecognizer;
