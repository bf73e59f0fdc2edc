// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting thing events.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::subscription::CallbackRegistry;

use super::ThingEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus delivering thing events to handlers and subscribers.
///
/// Publishing first runs the matching callbacks of the shared
/// [`CallbackRegistry`] on the publishing thread, then sends the event on a
/// tokio broadcast channel. Clones share both.
///
/// # Capacity
///
/// The broadcast channel has a fixed capacity (default 256). A slow
/// subscriber loses the oldest events and gets `RecvError::Lagged`.
/// Callbacks are never skipped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ThingEvent>,
    callbacks: Arc<CallbackRegistry>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified broadcast capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            callbacks: Arc::new(CallbackRegistry::new()),
        }
    }

    /// Subscribes to the broadcast stream.
    ///
    /// The receiver gets every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ThingEvent> {
        self.sender.subscribe()
    }

    /// Returns the callback registry for synchronous handlers.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Returns the number of active broadcast subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to handlers and subscribers.
    pub fn publish(&self, event: ThingEvent) {
        self.callbacks.dispatch(&event);
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
