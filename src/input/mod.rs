// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw digital input conditioning.
//!
//! The [`Debouncer`] turns a bouncy level stream into stable edges. Both the
//! button gesture recognizer and the interrupt path of sensors consume its
//! output.

mod debounce;

pub use debounce::Debouncer;
