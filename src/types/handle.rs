// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing handle type.

use std::fmt;

/// Stable handle of a registered thing.
///
/// Handles are allocated by the [`ThingRegistry`](crate::registry::ThingRegistry)
/// and are never reused within a registry's lifetime, so a stale handle can
/// only miss, never alias another thing.
///
/// # Examples
///
/// ```
/// use zthing::types::Handle;
///
/// let handle = Handle::from_raw(3);
/// assert_eq!(handle.value(), 3);
/// assert_eq!(handle.to_string(), "Thing(#3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Handle(u32);

impl Handle {
    /// Creates a handle from its raw index.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thing(#{})", self.0)
    }
}
