// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing registry.
//!
//! The [`ThingRegistry`] creates buttons and sensors, hands out stable
//! [`Handle`](crate::types::Handle)s, and resolves them back to a [`Thing`].
//! Things never hold references to each other or to the registry; they are
//! addressed by handle only.

mod thing;
mod thing_registry;

pub use thing::{Thing, ThingState};
pub use thing_registry::ThingRegistry;
