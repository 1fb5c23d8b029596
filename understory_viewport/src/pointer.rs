// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and wheel input consumed by the viewport.
//!
//! Hosts translate their platform events (DOM, winit, `ui-events`) into these
//! small records. Positions are in the renderer's global (screen) space.

use core::str::FromStr;

use bitflags::bitflags;
use kurbo::Point;

use crate::modes::{ParseOptionError, deserialize_from_str};

/// Identifier of a pointer, stable for the duration of one contact.
pub type PointerId = u64;

/// The kind of device that produced a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// A mouse; tracked as a single "mouse down" flag.
    #[default]
    Mouse,
    /// A finger on a touch surface.
    Touch,
    /// A stylus.
    Pen,
}

/// A single mouse button, as reported for the button that changed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Auxiliary button, usually the wheel.
    Middle,
    /// Secondary button.
    Right,
}

impl MouseButton {
    /// The bit of this button inside a [`MouseButtons`] mask.
    #[must_use]
    pub fn mask(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Middle => MouseButtons::MIDDLE,
            Self::Right => MouseButtons::RIGHT,
        }
    }
}

bitflags! {
    /// A set of mouse buttons, laid out like the DOM `buttons` mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Deserialize),
        serde(try_from = "alloc::string::String")
    )]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT = 1 << 0;
        /// Secondary button.
        const RIGHT = 1 << 1;
        /// Auxiliary button.
        const MIDDLE = 1 << 2;
    }
}

impl FromStr for MouseButtons {
    type Err = ParseOptionError;

    /// Parses `"all"` or a dash-separated list such as `"left-right"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "all" {
            return Ok(Self::all());
        }
        let mut buttons = Self::empty();
        for token in lower.split(['-', ' ']).filter(|t| !t.is_empty()) {
            buttons |= match token {
                "left" => Self::LEFT,
                "middle" => Self::MIDDLE,
                "right" => Self::RIGHT,
                _ => return Err(ParseOptionError::new("mouse-buttons", s)),
            };
        }
        Ok(buttons)
    }
}

deserialize_from_str!(MouseButtons);

/// A pointer press, move, release or cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer identity.
    pub pointer_id: PointerId,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Button whose state changed, if any.
    pub button: Option<MouseButton>,
    /// Buttons currently held.
    pub buttons: MouseButtons,
    /// Position in global (screen) coordinates.
    pub position: Point,
    /// Whether this is the primary pointer of its kind.
    pub is_primary: bool,
}

impl PointerEvent {
    /// Identifier used for mouse events built by [`PointerEvent::mouse`].
    pub const MOUSE_ID: PointerId = 1;

    /// A primary mouse event with the left button changing state.
    #[must_use]
    pub fn mouse(position: Point) -> Self {
        Self {
            pointer_id: Self::MOUSE_ID,
            pointer_type: PointerType::Mouse,
            button: Some(MouseButton::Left),
            buttons: MouseButtons::LEFT,
            position,
            is_primary: true,
        }
    }

    /// A touch event for pointer `id`.
    ///
    /// The first finger of a gesture should be marked primary with
    /// [`PointerEvent::with_primary`]; this constructor leaves it unset.
    #[must_use]
    pub fn touch(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            pointer_type: PointerType::Touch,
            button: None,
            buttons: MouseButtons::empty(),
            position,
            is_primary: false,
        }
    }

    /// Replaces the changed button.
    #[must_use]
    pub fn with_button(mut self, button: Option<MouseButton>) -> Self {
        self.button = button;
        self
    }

    /// Replaces the held-button mask.
    #[must_use]
    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Replaces the primary flag.
    #[must_use]
    pub fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    /// Moves the event to a new position.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Whether the event came from a mouse.
    #[must_use]
    pub fn is_mouse(&self) -> bool {
        self.pointer_type == PointerType::Mouse
    }
}

/// Unit of wheel deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DeltaMode {
    /// Deltas are pixels.
    #[default]
    Pixel,
    /// Deltas are lines.
    Line,
    /// Deltas are pages.
    Page,
}

/// A wheel or trackpad scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    /// Pointer position in global (screen) coordinates.
    pub position: Point,
    /// Horizontal delta.
    pub delta_x: f64,
    /// Vertical delta.
    pub delta_y: f64,
    /// Depth delta.
    pub delta_z: f64,
    /// Unit of the deltas.
    pub delta_mode: DeltaMode,
}

impl WheelEvent {
    /// A vertical pixel scroll at `position`.
    #[must_use]
    pub fn new(position: Point, delta_y: f64) -> Self {
        Self {
            position,
            delta_x: 0.0,
            delta_y,
            delta_z: 0.0,
            delta_mode: DeltaMode::Pixel,
        }
    }

    /// Replaces the horizontal delta.
    #[must_use]
    pub fn with_delta_x(mut self, delta_x: f64) -> Self {
        self.delta_x = delta_x;
        self
    }

    /// Replaces the delta unit.
    #[must_use]
    pub fn with_delta_mode(mut self, delta_mode: DeltaMode) -> Self {
        self.delta_mode = delta_mode;
        self
    }
}
