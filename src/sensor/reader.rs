// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware read seam.

use crate::error::ReadError;
use crate::types::SensorValue;

/// Reads the current value of the underlying hardware.
///
/// A read may block for a bounded time. It runs under the sensor's
/// processing lock and must not call back into the same sensor.
///
/// Any `FnMut() -> Result<SensorValue, ReadError> + Send` closure is a
/// reader; [`from_fn`] helps the compiler infer the closure signature.
///
/// # Examples
///
/// ```
/// use zthing::error::ReadError;
/// use zthing::sensor::{SensorReader, from_fn};
/// use zthing::types::SensorValue;
///
/// struct Thermometer {
///     celsius: f64,
/// }
///
/// impl SensorReader for Thermometer {
///     fn read(&mut self) -> Result<SensorValue, ReadError> {
///         Ok(SensorValue::Decimal(self.celsius))
///     }
/// }
///
/// let mut counter = 0;
/// let mut reader = from_fn(move || {
///     counter += 1;
///     Ok(SensorValue::Integer(counter))
/// });
/// assert_eq!(reader.read(), Ok(SensorValue::Integer(1)));
/// ```
pub trait SensorReader: Send {
    /// Performs one read.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::Hardware` when the device cannot be read.
    fn read(&mut self) -> Result<SensorValue, ReadError>;
}

impl<F> SensorReader for F
where
    F: FnMut() -> Result<SensorValue, ReadError> + Send,
{
    fn read(&mut self) -> Result<SensorValue, ReadError> {
        self()
    }
}

/// Turns a closure into a [`SensorReader`].
#[must_use]
pub fn from_fn<F>(f: F) -> F
where
    F: FnMut() -> Result<SensorValue, ReadError> + Send,
{
    f
}
