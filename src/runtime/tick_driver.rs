// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic tick source.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::types::Tick;

use super::ThingInput;

/// Sends [`ThingInput::Tick`] to a set of worker queues at a fixed period.
///
/// Tick numbers start at 1 and increase by one per period. Queues whose
/// worker has stopped are dropped; the driver ends when none remain.
#[derive(Debug)]
pub struct TickDriver {
    now: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl TickDriver {
    /// Spawns the driver on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime or if `period` is zero.
    #[must_use]
    pub fn spawn(period: Duration, targets: Vec<mpsc::Sender<ThingInput>>) -> Self {
        let now = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(period, targets, Arc::clone(&now)));
        Self { now, task }
    }

    /// Returns the last tick sent.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.now.load(Ordering::Acquire)
    }

    /// Returns `true` once the driver has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the driver.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(period: Duration, mut targets: Vec<mpsc::Sender<ThingInput>>, now: Arc<AtomicU64>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;

    while !targets.is_empty() {
        ticker.tick().await;
        let tick = now.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(tick, targets = targets.len(), "Tick");

        let mut alive = Vec::with_capacity(targets.len());
        for target in targets {
            if target.send(ThingInput::Tick(tick)).await.is_ok() {
                alive.push(target);
            }
        }
        targets = alive;
    }
    tracing::debug!("Tick driver stopped: no targets left");
}
