// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing event types.

use crate::button::GestureCode;
use crate::types::{Handle, SensorValue, ThingType, Tick};

use super::EventCode;

/// A classified button gesture.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GestureEvent {
    /// Handle of the button.
    pub handle: Handle,
    /// Identifier of the button.
    pub id: String,
    /// The gesture.
    pub code: GestureCode,
    /// Tick at which the gesture was recognized.
    pub tick: Tick,
}

/// A notable sensor state transition.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StateUpdate {
    /// Handle of the sensor.
    pub handle: Handle,
    /// Identifier of the sensor.
    pub id: String,
    /// The newly committed value.
    pub value: SensorValue,
    /// The value it replaced; `None` for the first commit.
    pub previous: Option<SensorValue>,
    /// Tick of the acquisition.
    pub tick: Tick,
}

/// Events published by things.
///
/// # Examples
///
/// ```
/// use zthing::event::{EventCode, ThingEvent};
/// use zthing::types::{Handle, ThingType};
///
/// let handle = Handle::from_raw(1);
/// let created = ThingEvent::created(handle, "door", ThingType::BinarySensor);
/// assert_eq!(created.handle(), handle);
/// assert_eq!(created.code(), EventCode::Created);
/// assert!(created.is_lifecycle());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum ThingEvent {
    /// A thing was registered.
    Created {
        /// Handle of the new thing.
        handle: Handle,
        /// Identifier of the new thing.
        id: String,
        /// Type tag of the new thing.
        thing_type: ThingType,
    },

    /// A button recognized a gesture.
    Gesture(GestureEvent),

    /// A sensor committed a notable update.
    StateUpdated(StateUpdate),

    /// A thing was closed.
    Closed {
        /// Handle of the closed thing.
        handle: Handle,
        /// Identifier of the closed thing.
        id: String,
    },
}

impl ThingEvent {
    /// Returns the handle of the thing that produced the event.
    #[must_use]
    pub fn handle(&self) -> Handle {
        match self {
            Self::Created { handle, .. } | Self::Closed { handle, .. } => *handle,
            Self::Gesture(g) => g.handle,
            Self::StateUpdated(u) => u.handle,
        }
    }

    /// Returns the identifier of the thing that produced the event.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id, .. } | Self::Closed { id, .. } => id,
            Self::Gesture(g) => &g.id,
            Self::StateUpdated(u) => &u.id,
        }
    }

    /// Returns the event code.
    #[must_use]
    pub fn code(&self) -> EventCode {
        match self {
            Self::Created { .. } => EventCode::Created,
            Self::Gesture(g) => g.code.into(),
            Self::StateUpdated(_) => EventCode::StateUpdated,
            Self::Closed { .. } => EventCode::Closed,
        }
    }

    /// Returns `true` for created/closed events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Closed { .. })
    }

    /// Creates a created event.
    #[must_use]
    pub fn created(handle: Handle, id: impl Into<String>, thing_type: ThingType) -> Self {
        Self::Created {
            handle,
            id: id.into(),
            thing_type,
        }
    }

    /// Creates a closed event.
    #[must_use]
    pub fn closed(handle: Handle, id: impl Into<String>) -> Self {
        Self::Closed {
            handle,
            id: id.into(),
        }
    }

    /// Creates a gesture event.
    #[must_use]
    pub fn gesture(handle: Handle, id: impl Into<String>, code: GestureCode, tick: Tick) -> Self {
        Self::Gesture(GestureEvent {
            handle,
            id: id.into(),
            code,
            tick,
        })
    }
}
