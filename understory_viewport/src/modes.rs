// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small structured option values shared by several plugins.
//!
//! Configuration files describe these with short strings such as
//! `"top-left"` or `"horizontal"`. They are parsed once through [`FromStr`]
//! and never re-interpreted while the viewport runs.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;

/// Error returned when an option string does not name a known value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    /// Creates an error for option `kind` rejecting `value`.
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// The option kind that failed to parse, such as `"direction"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rejected input text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized {} value {:?}", self.kind, self.value)
    }
}

impl core::error::Error for ParseOptionError {}

/// Implements `TryFrom<String>` through `FromStr` so serde can deserialize
/// string-valued options with `#[serde(try_from = "String")]`.
macro_rules! deserialize_from_str {
    ($($ty:ty),* $(,)?) => {$(
        #[cfg(feature = "serde")]
        impl TryFrom<alloc::string::String> for $ty {
            type Error = $crate::modes::ParseOptionError;

            fn try_from(value: alloc::string::String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    )*};
}
pub(crate) use deserialize_from_str;

/// Axes a gesture or constraint applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "alloc::string::String")
)]
pub enum Direction {
    /// Both axes.
    #[default]
    All,
    /// Horizontal axis only.
    X,
    /// Vertical axis only.
    Y,
}

impl Direction {
    /// Whether the horizontal axis is included.
    #[must_use]
    pub fn horizontal(self) -> bool {
        matches!(self, Self::All | Self::X)
    }

    /// Whether the vertical axis is included.
    #[must_use]
    pub fn vertical(self) -> bool {
        matches!(self, Self::All | Self::Y)
    }
}

impl FromStr for Direction {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(ParseOptionError::new("direction", s)),
        }
    }
}

/// Placement of content along one axis when it is smaller than the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    /// Left or top.
    Start,
    /// Centered.
    #[default]
    Center,
    /// Right or bottom.
    End,
}

impl Align {
    /// Position offset that places `content` inside `screen` (both in screen units).
    #[must_use]
    pub fn offset(self, screen: f64, content: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => (screen - content) / 2.0,
            Self::End => screen - content,
        }
    }
}

/// Alignment policy applied when the world is smaller than the screen.
///
/// Parsed from strings like `"center"`, `"top-left"` or `"bottom"`. An axis
/// that is not mentioned stays centered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "alloc::string::String")
)]
pub struct Underflow {
    /// Horizontal placement.
    pub x: Align,
    /// Vertical placement.
    pub y: Align,
}

impl Underflow {
    /// Center on both axes.
    pub const CENTER: Self = Self {
        x: Align::Center,
        y: Align::Center,
    };

    /// Pin to the top-left corner.
    pub const TOP_LEFT: Self = Self {
        x: Align::Start,
        y: Align::Start,
    };

    /// Parses the clamp variant, where `"none"` disables underflow handling.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ParseOptionError> {
        if s.trim().eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for Underflow {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut underflow = Self::CENTER;
        for token in lower.split(['-', ' ']).filter(|t| !t.is_empty()) {
            match token {
                "center" => {}
                "left" => underflow.x = Align::Start,
                "right" => underflow.x = Align::End,
                "top" => underflow.y = Align::Start,
                "bottom" => underflow.y = Align::End,
                _ => return Err(ParseOptionError::new("underflow", s)),
            }
        }
        Ok(underflow)
    }
}

bitflags! {
    /// Screen edges a bounce is allowed to correct.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Deserialize),
        serde(try_from = "alloc::string::String")
    )]
    pub struct Sides: u8 {
        /// Left edge.
        const LEFT = 1 << 0;
        /// Right edge.
        const RIGHT = 1 << 1;
        /// Top edge.
        const TOP = 1 << 2;
        /// Bottom edge.
        const BOTTOM = 1 << 3;
        /// Left and right.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Top and bottom.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        /// Every edge.
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for Sides {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "all" => return Ok(Self::ALL),
            "horizontal" => return Ok(Self::HORIZONTAL),
            "vertical" => return Ok(Self::VERTICAL),
            _ => {}
        }
        let mut sides = Self::empty();
        for token in lower.split(['-', ' ']).filter(|t| !t.is_empty()) {
            sides |= match token {
                "left" => Self::LEFT,
                "right" => Self::RIGHT,
                "top" => Self::TOP,
                "bottom" => Self::BOTTOM,
                _ => return Err(ParseOptionError::new("sides", s)),
            };
        }
        Ok(sides)
    }
}

/// Which axes the drag wheel-pan re-clamps after moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "alloc::string::String")
)]
pub enum WheelClamp {
    /// No clamping after a wheel pan.
    #[default]
    Off,
    /// Clamp both axes.
    All,
    /// Clamp only the horizontal axis.
    X,
    /// Clamp only the vertical axis.
    Y,
}

impl WheelClamp {
    pub(crate) fn horizontal(self) -> bool {
        matches!(self, Self::All | Self::X)
    }

    pub(crate) fn vertical(self) -> bool {
        matches!(self, Self::All | Self::Y)
    }
}

impl FromStr for WheelClamp {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "false" | "none" => Ok(Self::Off),
            "all" | "true" => Ok(Self::All),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(ParseOptionError::new("clamp-wheel", s)),
        }
    }
}

deserialize_from_str!(Direction, Underflow, Sides, WheelClamp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underflow_parses_corner_names() {
        assert_eq!("center".parse::<Underflow>(), Ok(Underflow::CENTER));
        assert_eq!("top-left".parse::<Underflow>(), Ok(Underflow::TOP_LEFT));
        assert_eq!(
            "bottom".parse::<Underflow>(),
            Ok(Underflow {
                x: Align::Center,
                y: Align::End
            })
        );
        assert_eq!(Underflow::parse_optional("none"), Ok(None));
        let err = "sideways".parse::<Underflow>().unwrap_err();
        assert_eq!(err.kind(), "underflow");
        assert_eq!(err.value(), "sideways");
    }

    #[test]
    fn sides_parse_groups_and_lists() {
        assert_eq!("all".parse::<Sides>(), Ok(Sides::ALL));
        assert_eq!("horizontal".parse::<Sides>(), Ok(Sides::HORIZONTAL));
        assert_eq!(
            "top-bottom-right".parse::<Sides>(),
            Ok(Sides::TOP | Sides::BOTTOM | Sides::RIGHT)
        );
        assert!("up".parse::<Sides>().is_err());
    }

    #[test]
    fn align_offsets() {
        assert_eq!(Align::Start.offset(800.0, 100.0), 0.0);
        assert_eq!(Align::Center.offset(800.0, 100.0), 350.0);
        assert_eq!(Align::End.offset(800.0, 100.0), 700.0);
    }

    #[test]
    fn direction_and_wheel_clamp() {
        assert_eq!("X".parse::<Direction>(), Ok(Direction::X));
        assert!(Direction::All.horizontal() && Direction::All.vertical());
        assert!(!Direction::Y.horizontal());
        assert_eq!("true".parse::<WheelClamp>(), Ok(WheelClamp::All));
        assert!(WheelClamp::X.horizontal() && !WheelClamp::X.vertical());
    }

    #[test]
    fn parse_error_display() {
        let err = "diagonal".parse::<Direction>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized direction value \"diagonal\"");
    }
}
