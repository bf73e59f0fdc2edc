// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for event subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::{EventCode, GestureEvent, StateUpdate, ThingEvent};
use crate::types::{Handle, ThingType};

/// Unique identifier for a subscription.
///
/// IDs are allocated in increasing order and never reused by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for event callbacks.
type EventCallback = Arc<dyn Fn(&ThingEvent) + Send + Sync>;

/// A registered callback and its filter.
struct Entry {
    code: EventCode,
    source: Option<Handle>,
    callback: EventCallback,
}

impl Entry {
    fn accepts(&self, event: &ThingEvent) -> bool {
        self.code.matches(event.code()) && self.source.is_none_or(|h| h == event.handle())
    }
}

/// Registry of synchronous event handlers.
///
/// Handlers are keyed by [`EventCode`] and optionally restricted to a single
/// thing. [`EventCode::Any`] receives every gesture code. Handlers run on the
/// publishing thread, in registration order.
///
/// # Thread Safety
///
/// The registry is thread-safe. Matching handlers are cloned out of the lock
/// before they run, so a handler may subscribe or unsubscribe without
/// deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    entries: RwLock<BTreeMap<SubscriptionId, Entry>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert(&self, code: EventCode, source: Option<Handle>, callback: EventCallback) -> SubscriptionId {
        let id = self.next_id();
        self.entries.write().insert(
            id,
            Entry {
                code,
                source,
                callback,
            },
        );
        id
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a handler for every event matching `code`.
    pub fn subscribe<F>(&self, code: EventCode, callback: F) -> SubscriptionId
    where
        F: Fn(&ThingEvent) + Send + Sync + 'static,
    {
        self.insert(code, None, Arc::new(callback))
    }

    /// Registers a handler for events matching `code` emitted by `source`.
    pub fn subscribe_to<F>(&self, source: Handle, code: EventCode, callback: F) -> SubscriptionId
    where
        F: Fn(&ThingEvent) + Send + Sync + 'static,
    {
        self.insert(code, Some(source), Arc::new(callback))
    }

    /// Registers a handler for every button gesture.
    pub fn on_gesture<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&GestureEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventCode::Any, move |event| {
            if let ThingEvent::Gesture(gesture) = event {
                callback(gesture);
            }
        })
    }

    /// Registers a handler for sensor state updates.
    ///
    /// Pass `Some(handle)` to receive updates of a single sensor only.
    pub fn on_state_updated<F>(&self, source: Option<Handle>, callback: F) -> SubscriptionId
    where
        F: Fn(&StateUpdate) + Send + Sync + 'static,
    {
        let callback: EventCallback = Arc::new(move |event| {
            if let ThingEvent::StateUpdated(update) = event {
                callback(update);
            }
        });
        self.insert(EventCode::StateUpdated, source, callback)
    }

    /// Registers a handler for thing registrations.
    pub fn on_created<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Handle, &str, ThingType) + Send + Sync + 'static,
    {
        self.subscribe(EventCode::Created, move |event| {
            if let ThingEvent::Created {
                handle,
                id,
                thing_type,
            } = event
            {
                callback(*handle, id, *thing_type);
            }
        })
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Unregisters every callback bound to `source`.
    ///
    /// Returns the number of removed callbacks.
    pub fn unsubscribe_source(&self, source: Handle) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.source != Some(source));
        before - entries.len()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches an event to every matching callback.
    pub fn dispatch(&self, event: &ThingEvent) {
        let matching: Vec<EventCallback> = self
            .entries
            .read()
            .values()
            .filter(|entry| entry.accepts(event))
            .map(|entry| Arc::clone(&entry.callback))
            .collect();

        for callback in matching {
            callback(event);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
