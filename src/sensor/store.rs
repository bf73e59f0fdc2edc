// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current/previous value and state-name table of a sensor.

use std::collections::BTreeMap;

use crate::types::SensorValue;

/// Holds the last two committed readings of a sensor and its value→name
/// aliases.
///
/// # Examples
///
/// ```
/// use zthing::sensor::ValueStore;
/// use zthing::types::SensorValue;
///
/// let mut store = ValueStore::new();
/// store.commit(SensorValue::Integer(5));
/// store.commit(SensorValue::Integer(6));
/// assert_eq!(store.previous(), Some(&SensorValue::Integer(5)));
/// assert_eq!(store.current(), Some(&SensorValue::Integer(6)));
///
/// store.set_name(6, "six");
/// assert_eq!(store.name_for(6), Some("six"));
/// assert_eq!(store.name_for(7), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    current: Option<SensorValue>,
    previous: Option<SensorValue>,
    names: BTreeMap<i64, String>,
}

impl ValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a new reading: the current value becomes the previous one.
    ///
    /// Always accepted.
    pub fn commit(&mut self, value: SensorValue) -> bool {
        self.previous = self.current.replace(value);
        true
    }

    /// Returns the most recently committed value.
    #[must_use]
    pub fn current(&self) -> Option<&SensorValue> {
        self.current.as_ref()
    }

    /// Returns the value committed just before the current one.
    #[must_use]
    pub fn previous(&self) -> Option<&SensorValue> {
        self.previous.as_ref()
    }

    /// Returns `true` once at least one value has been committed.
    #[must_use]
    pub fn has_committed(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the name registered for `value`.
    #[must_use]
    pub fn name_for(&self, value: i64) -> Option<&str> {
        self.names.get(&value).map(String::as_str)
    }

    /// Registers (or replaces) the name of `value`.
    pub fn set_name(&mut self, value: i64, name: impl Into<String>) {
        self.names.insert(value, name.into());
    }

    /// Removes every registered name. Values are kept.
    pub fn clear_names(&mut self) {
        self.names.clear();
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}
