// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer bookkeeping: active touches, the mouse flag and click detection.
//!
//! The [`InputManager`] does not dispatch anything itself. The viewport
//! feeds it every pointer event around the plugin fan-out:
//!
//! 1) on press, before plugins run, so `count()` already includes the new pointer;
//! 2) on move, after plugins run, to revoke click eligibility past the threshold;
//! 3) on release, before plugins run, then asks whether a click completed.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_viewport::{InputManager, PointerEvent};
//!
//! let mut input = InputManager::new(5.0);
//! let down = PointerEvent::touch(7, Point::new(10.0, 10.0));
//! input.press(&down, true);
//! assert_eq!(input.count(), 1);
//! assert!(input.is_click_eligible());
//!
//! // Moving 3px stays a click; 6px makes it a drag.
//! input.track_move(&down.at(Point::new(13.0, 10.0)));
//! assert!(input.is_click_eligible());
//! input.track_move(&down.at(Point::new(16.0, 10.0)));
//! assert!(!input.is_click_eligible());
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use smallvec::SmallVec;

use crate::pointer::{PointerEvent, PointerId};

/// An active non-mouse pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    /// Pointer identity.
    pub id: PointerId,
    /// Last position recorded by a gesture plugin, if any.
    pub last: Option<Point>,
}

/// Tracks which pointers are down and whether the current press is a click.
#[derive(Clone, Debug)]
pub struct InputManager {
    touches: SmallVec<[Touch; 4]>,
    mouse_down: bool,
    click_anchor: Option<Point>,
    click_eligible: bool,
    threshold: f64,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl InputManager {
    /// Creates a manager with the given click/drag threshold in screen pixels.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            touches: SmallVec::new(),
            mouse_down: false,
            click_anchor: None,
            click_eligible: false,
            threshold,
        }
    }

    /// Movement, in screen pixels, that turns a press into a drag.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sets the click/drag threshold.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Whether a displacement along one axis reaches the threshold.
    #[must_use]
    pub fn check_threshold(&self, change: f64) -> bool {
        change.abs() >= self.threshold
    }

    /// Number of active pointers: the mouse (if pressed) plus every touch.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.mouse_down) + self.touches.len()
    }

    /// Whether the mouse is pressed.
    #[must_use]
    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Active touches in arrival order.
    #[must_use]
    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }

    /// Active touches in arrival order, for plugins that record positions.
    pub fn touches_mut(&mut self) -> &mut [Touch] {
        &mut self.touches
    }

    /// The touch with identity `id`.
    #[must_use]
    pub fn touch(&self, id: PointerId) -> Option<&Touch> {
        self.touches.iter().find(|t| t.id == id)
    }

    /// Whether the current press can still complete as a click.
    #[must_use]
    pub fn is_click_eligible(&self) -> bool {
        self.click_eligible
    }

    /// Screen point where the current single-pointer press started.
    #[must_use]
    pub fn click_anchor(&self) -> Option<Point> {
        self.click_anchor
    }

    /// Registers a press.
    ///
    /// `allow_click` is false while a fling or bounce is running so a tap that
    /// stops the motion is not reported as a click.
    pub fn press(&mut self, event: &PointerEvent, allow_click: bool) {
        if event.is_mouse() {
            self.mouse_down = true;
        } else if self.touch(event.pointer_id).is_none() {
            self.touches.push(Touch {
                id: event.pointer_id,
                last: None,
            });
        }
        if self.count() == 1 {
            self.click_anchor = Some(event.position);
            self.click_eligible = allow_click;
        } else {
            self.click_eligible = false;
        }
    }

    /// Revokes click eligibility once the pointer travels past the threshold.
    pub fn track_move(&mut self, event: &PointerEvent) {
        if !self.click_eligible {
            return;
        }
        if let Some(anchor) = self.click_anchor {
            let delta = event.position - anchor;
            if self.check_threshold(delta.x) || self.check_threshold(delta.y) {
                self.click_eligible = false;
            }
        }
    }

    /// Registers a release or cancel.
    pub fn release(&mut self, event: &PointerEvent) {
        if event.is_mouse() {
            self.mouse_down = false;
        } else {
            self.touches.retain(|t| t.id != event.pointer_id);
        }
    }

    /// Returns the click anchor if the last pointer just lifted from an
    /// eligible press, consuming the eligibility.
    pub fn take_click(&mut self) -> Option<Point> {
        if self.click_eligible && self.count() == 0 {
            self.click_eligible = false;
            self.click_anchor
        } else {
            None
        }
    }

    /// Forgets every pointer without reporting anything.
    pub fn pause(&mut self) {
        self.touches.clear();
        self.mouse_down = false;
        self.click_eligible = false;
    }
}
