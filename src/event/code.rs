// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric event codes.

use std::fmt;

use crate::button::GestureCode;

/// Builds an event base from a three-letter tag, the way the firmware event
/// loop namespaces its codes.
const fn event_base(tag: &[u8; 3]) -> u32 {
    ((tag[0] as u32) << 24) | ((tag[1] as u32) << 16) | ((tag[2] as u32) << 8)
}

const BUTTON_BASE: u32 = event_base(b"ZBN");
const THING_BASE: u32 = event_base(b"ZTH");

/// Code identifying a kind of event on the bus.
///
/// Gesture codes share the `ZBN` base; [`EventCode::Any`] is the base itself
/// and matches every gesture code. Thing lifecycle and state-update codes use
/// the `ZTH` base.
///
/// # Examples
///
/// ```
/// use zthing::event::EventCode;
///
/// assert_eq!(EventCode::Any.value(), 1_514_294_784);
/// assert_eq!(EventCode::Click.value(), 1_514_294_787);
/// assert!(EventCode::Any.matches(EventCode::PressEnd));
/// assert!(!EventCode::Any.matches(EventCode::StateUpdated));
/// assert_eq!(EventCode::from_value(1_514_294_788), Some(EventCode::DoubleClick));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum EventCode {
    /// Any button gesture.
    Any,
    /// Button went down.
    Down,
    /// Button went up.
    Up,
    /// Single click.
    Click,
    /// Double click.
    DoubleClick,
    /// Long press (repeats while held).
    Press,
    /// End of a long press.
    PressEnd,
    /// A thing was created and registered.
    Created,
    /// A sensor committed a notable state update.
    StateUpdated,
    /// A thing was closed.
    Closed,
}

impl EventCode {
    const ALL: [Self; 10] = [
        Self::Any,
        Self::Down,
        Self::Up,
        Self::Click,
        Self::DoubleClick,
        Self::Press,
        Self::PressEnd,
        Self::Created,
        Self::StateUpdated,
        Self::Closed,
    ];

    /// Returns the numeric code.
    #[must_use]
    pub const fn value(&self) -> u32 {
        match self {
            Self::Any => BUTTON_BASE,
            Self::Down => BUTTON_BASE + 1,
            Self::Up => BUTTON_BASE + 2,
            Self::Click => BUTTON_BASE + 3,
            Self::DoubleClick => BUTTON_BASE + 4,
            Self::Press => BUTTON_BASE + 5,
            Self::PressEnd => BUTTON_BASE + 6,
            Self::Created => THING_BASE + 1,
            Self::StateUpdated => THING_BASE + 2,
            Self::Closed => THING_BASE + 3,
        }
    }

    /// Looks up a code by its numeric value.
    #[must_use]
    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }

    /// Returns `true` for the six gesture codes (not [`EventCode::Any`]).
    #[must_use]
    pub const fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::Down | Self::Up | Self::Click | Self::DoubleClick | Self::Press | Self::PressEnd
        )
    }

    /// Returns `true` if a subscription to `self` receives events coded
    /// `other`.
    #[must_use]
    pub fn matches(&self, other: EventCode) -> bool {
        *self == other || (*self == Self::Any && other.is_gesture())
    }
}

impl From<GestureCode> for EventCode {
    fn from(value: GestureCode) -> Self {
        match value {
            GestureCode::Down => Self::Down,
            GestureCode::Up => Self::Up,
            GestureCode::Click => Self::Click,
            GestureCode::DoubleClick => Self::DoubleClick,
            GestureCode::Press => Self::Press,
            GestureCode::PressEnd => Self::PressEnd,
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}
