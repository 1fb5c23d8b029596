// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::event::{MoveKind, ViewportEvent};
use crate::plugin::Plugin;
use crate::pointer::{MouseButtons, PointerEvent};
use crate::registry::Context;

/// Frames per millisecond at the 60 Hz rate the speeds are tuned for.
const FRAME_RATE: f64 = 60.0 / 1000.0;

/// Options for [`MouseEdges`].
///
/// Either `radius`, `distance`, or any of the individual edges selects the
/// trigger zone; `radius` wins over the others.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct MouseEdgesOptions {
    /// Scroll whenever the pointer is at least this far from the screen center.
    pub radius: Option<f64>,
    /// Width of a trigger band along every screen edge.
    pub distance: Option<f64>,
    /// Width of the top band.
    pub top: Option<f64>,
    /// Width of the bottom band.
    pub bottom: Option<f64>,
    /// Width of the left band.
    pub left: Option<f64>,
    /// Width of the right band.
    pub right: Option<f64>,
    /// Scroll speed in screen pixels per frame.
    pub speed: f64,
    /// Scroll away from the edge instead of toward it.
    pub reverse: bool,
    /// Stop dead when leaving the zone instead of handing off to
    /// [`Decelerate`](crate::Decelerate).
    pub no_decelerate: bool,
    /// In radial mode, scroll only along the dominant axes.
    pub linear: bool,
    /// Keep scrolling while mouse buttons are held.
    pub allow_buttons: bool,
}

impl Default for MouseEdgesOptions {
    fn default() -> Self {
        Self {
            radius: None,
            distance: None,
            top: None,
            bottom: None,
            left: None,
            right: None,
            speed: 8.0,
            reverse: false,
            no_decelerate: false,
            linear: false,
            allow_buttons: false,
        }
    }
}

/// Trigger lines in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Edges {
    left: Option<f64>,
    right: Option<f64>,
    top: Option<f64>,
    bottom: Option<f64>,
}

/// Scrolls the viewport while the mouse hovers near the screen edges.
#[derive(Clone, Debug)]
pub struct MouseEdges {
    options: MouseEdgesOptions,
    edges: Edges,
    horizontal: f64,
    vertical: f64,
}

impl MouseEdges {
    /// Creates the plugin. Edge positions are computed when it is added.
    #[must_use]
    pub fn new(options: MouseEdgesOptions) -> Self {
        Self {
            options,
            edges: Edges::default(),
            horizontal: 0.0,
            vertical: 0.0,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &MouseEdgesOptions {
        &self.options
    }

    /// Whether the pointer is in the trigger zone and the viewport is scrolling.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }

    /// Current scroll rate. Each frame the center moves by this times `speed`.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical)
    }

    fn reverse(&self) -> f64 {
        if self.options.reverse { 1.0 } else { -1.0 }
    }

    fn compute_edges(&mut self, cx: &Context<'_>) {
        let width = cx.node.screen_width();
        let height = cx.node.screen_height();
        let o = &self.options;
        self.edges = if let Some(distance) = o.distance {
            Edges {
                left: Some(distance),
                top: Some(distance),
                right: Some(width - distance),
                bottom: Some(height - distance),
            }
        } else {
            Edges {
                left: o.left,
                top: o.top,
                right: o.right.map(|r| width - r),
                bottom: o.bottom.map(|b| height - b),
            }
        };
    }

    fn hand_off_horizontal(&self, cx: &mut Context<'_>) {
        if self.horizontal == 0.0 || self.options.no_decelerate {
            return;
        }
        let velocity = self.horizontal * self.options.speed * self.reverse() * FRAME_RATE;
        if let Some(decelerate) = cx.plugins.decelerate_mut() {
            decelerate.activate(Some(velocity), None);
        }
    }

    fn hand_off_vertical(&self, cx: &mut Context<'_>) {
        if self.vertical == 0.0 || self.options.no_decelerate {
            return;
        }
        let velocity = self.vertical * self.options.speed * self.reverse() * FRAME_RATE;
        if let Some(decelerate) = cx.plugins.decelerate_mut() {
            decelerate.activate(None, Some(velocity));
        }
    }

    fn set_motion(&mut self, cx: &mut Context<'_>, horizontal: f64, vertical: f64) {
        let was_active = self.is_active();
        self.horizontal = horizontal;
        self.vertical = vertical;
        match (was_active, self.is_active()) {
            (false, true) => cx.emit(ViewportEvent::MouseEdgeStart),
            (true, false) => cx.emit(ViewportEvent::MouseEdgeEnd),
            _ => {}
        }
    }

    fn radial(&mut self, cx: &mut Context<'_>, position: Point, radius: f64) {
        let center = cx.node.to_global(cx.node.center());
        let offset = center - position;
        if offset.length_squared() >= radius * radius {
            let angle = offset.atan2();
            let step = self.options.speed * self.reverse() * FRAME_RATE;
            let (mut dx, mut dy) = (angle.cos(), angle.sin());
            if self.options.linear {
                dx = dx.round();
                dy = dy.round();
            }
            self.set_motion(cx, dx * step, dy * step);
        } else {
            self.hand_off_horizontal(cx);
            self.hand_off_vertical(cx);
            self.set_motion(cx, 0.0, 0.0);
        }
    }

    fn banded(&mut self, cx: &mut Context<'_>, position: Point) {
        let step = self.reverse() * self.options.speed * FRAME_RATE;
        let edges = self.edges;
        let horizontal = if edges.left.is_some_and(|l| position.x < l) {
            step
        } else if edges.right.is_some_and(|r| position.x > r) {
            -step
        } else {
            self.hand_off_horizontal(cx);
            0.0
        };
        let vertical = if edges.top.is_some_and(|t| position.y < t) {
            step
        } else if edges.bottom.is_some_and(|b| position.y > b) {
            -step
        } else {
            self.hand_off_vertical(cx);
            0.0
        };
        self.set_motion(cx, horizontal, vertical);
    }
}

impl Plugin for MouseEdges {
    fn added(&mut self, cx: &mut Context<'_>) {
        self.compute_edges(cx);
    }

    fn resize(&mut self, cx: &mut Context<'_>) {
        self.compute_edges(cx);
    }

    fn pointer_down(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if !self.options.allow_buttons {
            self.set_motion(cx, 0.0, 0.0);
        }
        false
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        if !event.is_mouse() && event.pointer_id != PointerEvent::MOUSE_ID {
            return false;
        }
        if !self.options.allow_buttons && event.buttons != MouseButtons::empty() {
            return false;
        }
        match self.options.radius.filter(|r| *r > 0.0) {
            Some(radius) => self.radial(cx, event.position, radius),
            None => self.banded(cx, event.position),
        }
        false
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        self.hand_off_horizontal(cx);
        self.hand_off_vertical(cx);
        self.set_motion(cx, 0.0, 0.0);
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, _elapsed: f64) {
        if !self.is_active() {
            return;
        }
        let speed = self.options.speed;
        let center = cx.node.center() + Vec2::new(self.horizontal * speed, self.vertical * speed);
        cx.move_center(center);
        cx.emit(ViewportEvent::moved(MoveKind::MouseEdges));
    }
}
