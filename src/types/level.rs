// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Digital input levels and edges.

use std::fmt;

/// Logic level of a digital input.
///
/// For buttons, [`Level::High`] means "pushed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Level {
    /// Logic low (released).
    #[default]
    Low,
    /// Logic high (pushed).
    High,
}

impl Level {
    /// Returns the edge that leads from `self` to `to`, if the levels differ.
    #[must_use]
    pub const fn edge_to(self, to: Level) -> Option<Edge> {
        match (self, to) {
            (Self::Low, Self::High) => Some(Edge::Rising),
            (Self::High, Self::Low) => Some(Edge::Falling),
            _ => None,
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

/// A stable transition between two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Edge {
    /// Low to high (button pushed down).
    Rising,
    /// High to low (button released).
    Falling,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rising => write!(f, "rising"),
            Self::Falling => write!(f, "falling"),
        }
    }
}

/// Which edges of an interrupt pin trigger an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Only low-to-high transitions.
    Rising,
    /// Only high-to-low transitions.
    Falling,
    /// Both transitions.
    Both,
}

impl EdgeMode {
    /// Returns `true` if `edge` qualifies under this mode.
    #[must_use]
    pub const fn matches(self, edge: Edge) -> bool {
        matches!(
            (self, edge),
            (Self::Both, _) | (Self::Rising, Edge::Rising) | (Self::Falling, Edge::Falling)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_between_levels() {
        assert_eq!(Level::Low.edge_to(Level::High), Some(Edge::Rising));
        assert_eq!(Level::High.edge_to(Level::Low), Some(Edge::Falling));
        assert_eq!(Level::High.edge_to(Level::High), None);
    }

    #[test]
    fn edge_mode_filtering() {
        assert!(EdgeMode::Rising.matches(Edge::Rising));
        assert!(!EdgeMode::Rising.matches(Edge::Falling));
        assert!(EdgeMode::Falling.matches(Edge::Falling));
        assert!(EdgeMode::Both.matches(Edge::Rising));
        assert!(EdgeMode::Both.matches(Edge::Falling));
    }

    #[test]
    fn level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert_eq!(Level::default(), Level::Low);
    }
}
