// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button states and gesture codes.

use std::fmt;

use crate::error::Error;

/// Lifecycle state of a button.
///
/// The discriminants are the numeric codes exposed to the binding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[repr(i32)]
pub enum ButtonState {
    /// Released and idle.
    #[default]
    Up = 0,
    /// Pushed, not yet classified.
    Down = 1,
    /// Released after a short push; waiting for a second push.
    FirstUp = 2,
    /// Pushed a second time inside the click window.
    SecondDown = 3,
    /// Held past the long-press threshold.
    Pressed = 4,
}

impl ButtonState {
    /// Returns the numeric state code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Returns `true` while the button is physically held.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down | Self::SecondDown | Self::Pressed)
    }
}

impl TryFrom<i32> for ButtonState {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Up),
            1 => Ok(Self::Down),
            2 => Ok(Self::FirstUp),
            3 => Ok(Self::SecondDown),
            4 => Ok(Self::Pressed),
            other => Err(Error::InvalidState(other)),
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::FirstUp => "FIRST_UP",
            Self::SecondDown => "SECOND_DOWN",
            Self::Pressed => "PRESSED",
        };
        f.write_str(name)
    }
}

/// A classified button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum GestureCode {
    /// The button went down.
    Down,
    /// The button went up.
    Up,
    /// A single click was confirmed.
    Click,
    /// A double click was confirmed.
    DoubleClick,
    /// The button is held (long press); repeats while held.
    Press,
    /// A long press ended.
    PressEnd,
}

impl fmt::Display for GestureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Down => "ON_DOWN",
            Self::Up => "ON_UP",
            Self::Click => "ON_CLICK",
            Self::DoubleClick => "ON_DBLCLICK",
            Self::Press => "ON_PRESS",
            Self::PressEnd => "ON_PRESS_END",
        };
        f.write_str(name)
    }
}

/// Gestures emitted by a single recognizer step, in order.
///
/// A step emits at most three codes, so this is a fixed array rather than
/// a heap allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emitted {
    codes: [Option<GestureCode>; 3],
    len: usize,
}

impl Emitted {
    pub(crate) fn push(&mut self, code: GestureCode) {
        debug_assert!(self.len < self.codes.len());
        if let Some(slot) = self.codes.get_mut(self.len) {
            *slot = Some(code);
            self.len += 1;
        }
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of emitted codes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Iterates over the emitted codes.
    pub fn iter(&self) -> impl Iterator<Item = GestureCode> + '_ {
        self.codes.iter().flatten().copied()
    }
}

impl IntoIterator for Emitted {
    type Item = GestureCode;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<GestureCode>, 3>>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes_round_trip() {
        for code in 0..5 {
            let state = ButtonState::try_from(code).unwrap();
            assert_eq!(state.code(), code);
        }
    }

    #[test]
    fn state_rejects_unknown_codes() {
        assert!(matches!(
            ButtonState::try_from(5),
            Err(Error::InvalidState(5))
        ));
        assert!(ButtonState::try_from(-1).is_err());
    }

    #[test]
    fn state_display() {
        assert_eq!(ButtonState::SecondDown.to_string(), "SECOND_DOWN");
        assert_eq!(GestureCode::DoubleClick.to_string(), "ON_DBLCLICK");
    }

    #[test]
    fn held_states() {
        assert!(ButtonState::Down.is_down());
        assert!(ButtonState::Pressed.is_down());
        assert!(!ButtonState::FirstUp.is_down());
    }

    #[test]
    fn emitted_keeps_order() {
        let mut e = Emitted::default();
        assert!(e.is_empty());
        e.push(GestureCode::Up);
        e.push(GestureCode::DoubleClick);
        assert_eq!(e.len(), 2);
        assert_eq!(
            e.into_iter().collect::<Vec<_>>(),
            vec![GestureCode::Up, GestureCode::DoubleClick]
        );
    }
}
