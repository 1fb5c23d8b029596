// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ease::Ease;
use crate::event::{MoveKind, ViewportEvent};
use crate::modes::{Sides, Underflow};
use crate::node::ViewportNode;
use crate::plugin::Plugin;
use crate::pointer::PointerEvent;
use crate::registry::Context;

/// Options for [`Bounce`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct BounceOptions {
    /// Edges that bounce back.
    pub sides: Sides,
    /// Decay handed to [`Decelerate`](crate::Decelerate) while a fling is out of bounds.
    pub friction: f64,
    /// Bounce-back duration in milliseconds. Zero or less snaps back instantly.
    pub time: f64,
    /// Bounce-back curve.
    pub ease: Ease,
    /// Alignment when the world is smaller than the screen.
    pub underflow: Underflow,
}

impl Default for BounceOptions {
    fn default() -> Self {
        Self {
            sides: Sides::ALL,
            friction: 0.5,
            time: 150.0,
            ease: Ease::InOutSine,
            underflow: Underflow::CENTER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween {
    time: f64,
    start: f64,
    delta: f64,
    end: f64,
}

impl Tween {
    fn new(start: f64, end: f64) -> Self {
        Self {
            time: 0.0,
            start,
            delta: end - start,
            end,
        }
    }
}

/// Eases the viewport back inside the world after it was dragged or flung
/// past an edge.
///
/// Bounce waits until no drag or pinch is active and the fling on that axis
/// has stopped. While a fling is still travelling out of bounds, its decay
/// is replaced with this plugin's `friction` so it stops sooner.
#[derive(Clone, Debug)]
pub struct Bounce {
    options: BounceOptions,
    to_x: Option<Tween>,
    to_y: Option<Tween>,
}

impl Bounce {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: BounceOptions) -> Self {
        Self {
            options,
            to_x: None,
            to_y: None,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &BounceOptions {
        &self.options
    }

    /// Whether a bounce-back is animating on either axis.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.to_x.is_some() || self.to_y.is_some()
    }

    /// Starts a bounce-back on each out-of-bounds axis that is not already
    /// animating.
    pub fn bounce(&mut self, cx: &mut Context<'_>) {
        let sides = self.options.sides;
        let mut velocity = kurbo::Vec2::ZERO;
        if let Some(decelerate) = cx.plugins.decelerate_mut() {
            velocity = decelerate.velocity();
            let friction = decelerate.options().friction;
            let fresh_x = velocity.x != 0.0 && decelerate.friction().x == friction;
            let fresh_y = velocity.y != 0.0 && decelerate.friction().y == friction;
            if fresh_x || fresh_y {
                let oob = cx.node.oob();
                if (oob.left && sides.contains(Sides::LEFT))
                    || (oob.right && sides.contains(Sides::RIGHT))
                {
                    decelerate.set_friction_x(self.options.friction);
                }
                if (oob.top && sides.contains(Sides::TOP))
                    || (oob.bottom && sides.contains(Sides::BOTTOM))
                {
                    decelerate.set_friction_y(self.options.friction);
                }
            }
        }

        let dragging = cx.plugins.drag().is_some_and(|d| d.is_active());
        let pinching = cx.plugins.pinch().is_some_and(|p| p.is_active());
        if dragging || pinching {
            return;
        }
        if (self.to_x.is_some() && self.to_y.is_some()) || (velocity.x != 0.0 && velocity.y != 0.0)
        {
            return;
        }

        let oob = cx.node.oob();
        if self.to_x.is_none() && velocity.x == 0.0 {
            let underflows = cx.node.screen_world_width() < cx.node.screen_width();
            let target = if oob.left && sides.contains(Sides::LEFT) {
                Some(if underflows { self.underflow_x(cx.node) } else { 0.0 })
            } else if oob.right && sides.contains(Sides::RIGHT) {
                Some(if underflows {
                    self.underflow_x(cx.node)
                } else {
                    -oob.corner_point.x
                })
            } else {
                None
            };
            if let Some(x) = target.filter(|x| *x != cx.node.x()) {
                self.to_x = Some(Tween::new(cx.node.x(), x));
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_x();
                }
                tracing::trace!(from = cx.node.x(), to = x, "horizontal bounce started");
                cx.emit(ViewportEvent::BounceXStart);
            }
        }
        if self.to_y.is_none() && velocity.y == 0.0 {
            let underflows = cx.node.screen_world_height() < cx.node.screen_height();
            let target = if oob.top && sides.contains(Sides::TOP) {
                Some(if underflows { self.underflow_y(cx.node) } else { 0.0 })
            } else if oob.bottom && sides.contains(Sides::BOTTOM) {
                Some(if underflows {
                    self.underflow_y(cx.node)
                } else {
                    -oob.corner_point.y
                })
            } else {
                None
            };
            if let Some(y) = target.filter(|y| *y != cx.node.y()) {
                self.to_y = Some(Tween::new(cx.node.y(), y));
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_y();
                }
                tracing::trace!(from = cx.node.y(), to = y, "vertical bounce started");
                cx.emit(ViewportEvent::BounceYStart);
            }
        }
    }

    fn underflow_x(&self, node: &ViewportNode) -> f64 {
        self.options
            .underflow
            .x
            .offset(node.screen_width(), node.screen_world_width())
    }

    fn underflow_y(&self, node: &ViewportNode) -> f64 {
        self.options
            .underflow
            .y
            .offset(node.screen_height(), node.screen_world_height())
    }

    /// Advances a tween, returning the new value and whether it finished.
    fn step(&self, tween: &mut Tween, elapsed: f64) -> (f64, bool) {
        tween.time += elapsed;
        if tween.time >= self.options.time {
            (tween.end, true)
        } else {
            let value =
                self.options
                    .ease
                    .apply(tween.time, tween.start, tween.delta, self.options.time);
            (value, false)
        }
    }
}

impl Plugin for Bounce {
    fn pointer_down(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        self.to_x = None;
        self.to_y = None;
        false
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        self.bounce(cx);
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        self.bounce(cx);
        if let Some(mut tween) = self.to_x {
            let (x, finished) = self.step(&mut tween, elapsed);
            cx.node.set_x(x);
            cx.emit(ViewportEvent::moved(MoveKind::BounceX));
            if finished {
                self.to_x = None;
                cx.emit(ViewportEvent::BounceXEnd);
            } else {
                self.to_x = Some(tween);
            }
        }
        if let Some(mut tween) = self.to_y {
            let (y, finished) = self.step(&mut tween, elapsed);
            cx.node.set_y(y);
            cx.emit(ViewportEvent::moved(MoveKind::BounceY));
            if finished {
                self.to_y = None;
                cx.emit(ViewportEvent::BounceYEnd);
            } else {
                self.to_y = Some(tween);
            }
        }
    }

    fn reset(&mut self, cx: &mut Context<'_>) {
        self.to_x = None;
        self.to_y = None;
        self.bounce(cx);
    }
}
