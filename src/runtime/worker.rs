// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-thing processing task.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::registry::Thing;
use crate::types::Handle;

use super::ThingInput;

/// Default queue capacity of a worker.
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// A tokio task that applies inputs to one thing, in order.
///
/// The task stops after a [`ThingInput::Close`], or as soon as the thing
/// reports it is closed. Inputs sent afterwards fail with
/// [`Error::ChannelClosed`].
#[derive(Debug)]
pub struct Worker {
    handle: Handle,
    sender: mpsc::Sender<ThingInput>,
    task: JoinHandle<()>,
}

impl Worker {
    /// Spawns a worker for `thing` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn spawn(thing: Thing) -> Self {
        Self::with_capacity(thing, DEFAULT_QUEUE_CAPACITY)
    }

    /// Spawns a worker with a custom queue capacity.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn with_capacity(thing: Thing, capacity: usize) -> Self {
        let handle = thing.handle();
        let (sender, rx) = mpsc::channel(capacity);
        let task = tokio::spawn(run(thing, rx));
        Self {
            handle,
            sender,
            task,
        }
    }

    /// Returns the handle of the thing served by this worker.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Returns a sender for the worker queue.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<ThingInput> {
        self.sender.clone()
    }

    /// Queues an input, waiting for room.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelClosed` if the worker has stopped.
    pub async fn send(&self, input: ThingInput) -> Result<()> {
        self.sender
            .send(input)
            .await
            .map_err(|e| Error::ChannelClosed(e.to_string()))
    }

    /// Queues an input without waiting, for use from non-async contexts.
    ///
    /// # Errors
    ///
    /// Returns `Error::QueueFull` if the queue has no room (retry later),
    /// or `Error::ChannelClosed` if the worker has stopped.
    pub fn try_send(&self, input: ThingInput) -> Result<()> {
        self.sender.try_send(input).map_err(|e| match e {
            TrySendError::Full(_) => Error::QueueFull,
            TrySendError::Closed(_) => Error::ChannelClosed(e.to_string()),
        })
    }

    /// Waits for the worker task to finish.
    pub async fn join(self) {
        drop(self.sender);
        if let Err(e) = self.task.await {
            tracing::warn!(handle = %self.handle, error = %e, "Worker task failed");
        }
    }
}

async fn run(thing: Thing, mut rx: mpsc::Receiver<ThingInput>) {
    let handle = thing.handle();
    tracing::debug!(%handle, id = %thing.id(), "Starting thing worker");

    while let Some(input) = rx.recv().await {
        let closing = matches!(input, ThingInput::Close);
        match thing.process(input) {
            Ok(()) if !closing => {}
            Ok(()) => break,
            Err(Error::Closed) => {
                tracing::debug!(%handle, "Thing closed, stopping worker");
                break;
            }
            Err(e) => tracing::warn!(%handle, error = %e, "Input rejected"),
        }
    }

    // Anything still queued is discarded with the receiver.
    rx.close();
    tracing::debug!(%handle, "Thing worker stopped");
}
