// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use understory_viewport::{Ease, ParseOptionError, Underflow};

/// When a scrollbar is shown on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "alloc::string::String")
)]
pub enum Overflow {
    /// Only when the content is larger than the box.
    #[default]
    Auto,
    /// Always.
    Scroll,
    /// Never. Parsed from `"hidden"` or `"none"`.
    Hidden,
}

impl Overflow {
    /// Whether a bar is shown for content of `scroll` length in a box of `size`.
    #[must_use]
    pub fn shows_bar(self, scroll: f64, size: f64) -> bool {
        match self {
            Self::Auto => scroll > size,
            Self::Scroll => true,
            Self::Hidden => false,
        }
    }
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Scroll => "scroll",
            Self::Hidden => "hidden",
        })
    }
}

impl FromStr for Overflow {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "scroll" => Ok(Self::Scroll),
            "hidden" | "none" => Ok(Self::Hidden),
            _ => Err(ParseOptionError::new("overflow", s)),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<alloc::string::String> for Overflow {
    type Error = ParseOptionError;

    fn try_from(value: alloc::string::String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Options for [`Scrollbox`](crate::Scrollbox).
///
/// Sizes are in box pixels, times in milliseconds.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ScrollboxOptions {
    /// Width of the box, scrollbar included.
    pub box_width: f64,
    /// Height of the box, scrollbar included.
    pub box_height: f64,
    /// Thickness of each scrollbar.
    pub scrollbar_size: f64,
    /// Vertical shift of the horizontal scrollbar.
    pub scrollbar_offset_horizontal: f64,
    /// Horizontal shift of the vertical scrollbar.
    pub scrollbar_offset_vertical: f64,
    /// Horizontal scrollbar policy.
    pub overflow_x: Overflow,
    /// Vertical scrollbar policy.
    pub overflow_y: Overflow,
    /// Dragging the content scrolls it.
    pub drag_scroll: bool,
    /// Ask the host to stop propagation of events the box handled.
    pub stop_propagation: bool,
    /// Placement of content smaller than the box; `None` leaves it in place.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "underflow"))]
    pub underflow: Option<Underflow>,
    /// Fade the scrollbars out when idle.
    pub fade: bool,
    /// Length of the fade-out.
    pub fade_scrollbar_time: f64,
    /// Idle time before the fade-out starts.
    pub fade_scrollbox_wait: f64,
    /// Curve of the fade-out.
    pub fade_scrollbox_ease: Ease,
    /// Never ask the host to prevent the default wheel action.
    pub passive_wheel: bool,
    /// Wheel scrolling stops at the content edges.
    pub clamp_wheel: bool,
}

impl Default for ScrollboxOptions {
    fn default() -> Self {
        Self {
            box_width: 100.0,
            box_height: 100.0,
            scrollbar_size: 10.0,
            scrollbar_offset_horizontal: 0.0,
            scrollbar_offset_vertical: 0.0,
            overflow_x: Overflow::Auto,
            overflow_y: Overflow::Auto,
            drag_scroll: true,
            stop_propagation: true,
            underflow: Some(Underflow::TOP_LEFT),
            fade: false,
            fade_scrollbar_time: 1000.0,
            fade_scrollbox_wait: 3000.0,
            fade_scrollbox_ease: Ease::InOutSine,
            passive_wheel: false,
            clamp_wheel: true,
        }
    }
}

#[cfg(feature = "serde")]
fn underflow<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Underflow>, D::Error> {
    use serde::Deserialize as _;

    let text = alloc::string::String::deserialize(deserializer)?;
    Underflow::parse_optional(&text).map_err(serde::de::Error::custom)
}
