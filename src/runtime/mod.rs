// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialized input processing.
//!
//! Hardware events reach a thing as [`ThingInput`]s. Each thing gets one
//! [`Worker`]: a tokio task draining a FIFO queue, so ticks and edges of the
//! same thing are handled one at a time, while different things proceed
//! independently. A [`TickDriver`] feeds periodic ticks to a set of workers.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use zthing::registry::ThingRegistry;
//! use zthing::runtime::{ThingInput, TickDriver, Worker};
//! use zthing::types::Level;
//!
//! # async fn example() -> zthing::Result<()> {
//! let registry = ThingRegistry::new();
//! let handle = registry.create_button("btn1", None)?;
//! let worker = Worker::spawn(registry.lookup(handle).unwrap());
//!
//! let driver = TickDriver::spawn(Duration::from_millis(1), vec![worker.sender()]);
//!
//! // From a GPIO edge callback:
//! worker.try_send(ThingInput::Edge { pin: 4, level: Level::High, now: driver.now() })?;
//!
//! worker.send(ThingInput::Close).await?;
//! worker.join().await;
//! # Ok(())
//! # }
//! ```

mod tick_driver;
mod worker;

pub use tick_driver::TickDriver;
pub use worker::Worker;

use crate::types::{Level, Tick};

/// An input event for a single thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingInput {
    /// A timer tick; carries the current tick count.
    Tick(Tick),
    /// A raw level observed on an input pin.
    ///
    /// Buttons ignore `pin`; sensors only react to their armed interrupt pin.
    Edge {
        /// Input pin number.
        pin: u32,
        /// Raw level.
        level: Level,
        /// Tick of the observation.
        now: Tick,
    },
    /// Close the thing and stop processing.
    Close,
}
