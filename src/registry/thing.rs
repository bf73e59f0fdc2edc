// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registered thing variants.

use std::sync::Arc;

use crate::button::{Button, ButtonState};
use crate::error::Result;
use crate::runtime::ThingInput;
use crate::sensor::Sensor;
use crate::types::{Handle, SensorValue, ThingType};

/// A registered thing.
///
/// Cloning is cheap; clones refer to the same instance.
#[derive(Debug, Clone)]
pub enum Thing {
    /// A push button.
    Button(Arc<Button>),
    /// A sensor.
    Sensor(Arc<Sensor>),
}

/// The state of a thing, as returned by [`Thing::state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThingState {
    /// Gesture recognizer state of a button.
    Button(ButtonState),
    /// Current value of a sensor; `None` before the first reading.
    Sensor(Option<SensorValue>),
}

impl Thing {
    /// Returns the registry handle.
    #[must_use]
    pub fn handle(&self) -> Handle {
        match self {
            Self::Button(b) => b.handle(),
            Self::Sensor(s) => s.handle(),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Button(b) => b.id(),
            Self::Sensor(s) => s.id(),
        }
    }

    /// Returns the registry type tag.
    #[must_use]
    pub fn thing_type(&self) -> ThingType {
        match self {
            Self::Button(_) => ThingType::Button,
            Self::Sensor(s) => s.thing_type(),
        }
    }

    /// Returns `true` once the thing has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Button(b) => b.is_closed(),
            Self::Sensor(s) => s.is_closed(),
        }
    }

    /// Applies one input to the thing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the thing is already closed.
    pub fn process(&self, input: ThingInput) -> Result<()> {
        match self {
            Self::Button(b) => b.process(input),
            Self::Sensor(s) => s.process(input),
        }
    }

    /// Returns the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the thing is already closed.
    pub fn state(&self) -> Result<ThingState> {
        Ok(match self {
            Self::Button(b) => ThingState::Button(b.state()?),
            Self::Sensor(s) => ThingState::Sensor(s.state()?),
        })
    }

    /// Closes the thing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the thing is already closed.
    pub fn close(&self) -> Result<()> {
        match self {
            Self::Button(b) => b.close(),
            Self::Sensor(s) => s.close(),
        }
    }

    /// Returns the button, if this thing is one.
    #[must_use]
    pub fn as_button(&self) -> Option<&Arc<Button>> {
        match self {
            Self::Button(b) => Some(b),
            Self::Sensor(_) => None,
        }
    }

    /// Returns the sensor, if this thing is one.
    #[must_use]
    pub fn as_sensor(&self) -> Option<&Arc<Sensor>> {
        match self {
            Self::Sensor(s) => Some(s),
            Self::Button(_) => None,
        }
    }
}

impl From<Arc<Button>> for Thing {
    fn from(button: Arc<Button>) -> Self {
        Self::Button(button)
    }
}

impl From<Arc<Sensor>> for Thing {
    fn from(sensor: Arc<Sensor>) -> Self {
        Self::Sensor(sensor)
    }
}
