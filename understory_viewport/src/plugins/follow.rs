// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::event::{MoveKind, ViewportEvent};
use crate::plugin::Plugin;
use crate::registry::Context;

/// Something with a world position the viewport can follow.
///
/// Implemented for a fixed [`Point`] and for a shared `Rc<Cell<Point>>`
/// that the host updates as its object moves.
pub trait FollowTarget: fmt::Debug {
    /// Current world position.
    fn position(&self) -> Point;
}

impl FollowTarget for Point {
    fn position(&self) -> Point {
        *self
    }
}

impl FollowTarget for Rc<Cell<Point>> {
    fn position(&self) -> Point {
        self.get()
    }
}

/// Options for [`Follow`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct FollowOptions {
    /// Maximum travel per frame in world units; zero jumps straight to the target.
    pub speed: f64,
    /// Ramps speed up and down by this much per millisecond; requires `speed`.
    pub acceleration: Option<f64>,
    /// The camera only moves once the target leaves a circle of this radius
    /// around the center.
    pub radius: Option<f64>,
}

/// Keeps the viewport centered on a moving target.
#[derive(Debug)]
pub struct Follow {
    options: FollowOptions,
    target: Box<dyn FollowTarget>,
    velocity: Vec2,
}

impl Follow {
    /// Creates the plugin following `target`.
    pub fn new(target: impl FollowTarget + 'static, options: FollowOptions) -> Self {
        Self {
            options,
            target: Box::new(target),
            velocity: Vec2::ZERO,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &FollowOptions {
        &self.options
    }

    /// Current position of the followed target.
    #[must_use]
    pub fn target(&self) -> Point {
        self.target.position()
    }

    /// Switches to a new target, keeping the current speed.
    pub fn set_target(&mut self, target: impl FollowTarget + 'static) {
        self.target = Box::new(target);
    }

    /// Where the center should head this frame, or `None` if the target is
    /// inside the dead zone.
    fn goal(&self, center: Point) -> Option<Point> {
        let target = self.target.position();
        match self.options.radius.filter(|r| *r > 0.0) {
            Some(radius) => {
                let offset = target - center;
                if offset.hypot() > radius {
                    let angle = offset.atan2();
                    Some(target - Vec2::from_angle(angle) * radius)
                } else {
                    None
                }
            }
            None => Some(target),
        }
    }

    /// One step from `center` toward `goal` with the per-axis `step` length,
    /// landing on the goal instead of overshooting it.
    fn approach(center: Point, goal: Point, step: Vec2) -> Point {
        let delta = goal - center;
        let direction = Vec2::from_angle(delta.atan2());
        let change = Vec2::new(direction.x * step.x, direction.y * step.y);
        Point::new(
            if change.x.abs() > delta.x.abs() {
                goal.x
            } else {
                center.x + change.x
            },
            if change.y.abs() > delta.y.abs() {
                goal.y
            } else {
                center.y + change.y
            },
        )
    }
}

impl Plugin for Follow {
    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        let center = cx.node.center();
        let Some(goal) = self.goal(center) else {
            return;
        };
        let delta = goal - center;
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }

        let speed = self.options.speed;
        let next = if speed == 0.0 {
            goal
        } else if let Some(acceleration) = self.options.acceleration.filter(|a| *a != 0.0) {
            let braking = self.velocity.length_squared() / (2.0 * acceleration);
            let change = acceleration * elapsed;
            self.velocity = if delta.hypot() > braking {
                Vec2::new(
                    (self.velocity.x + change).min(speed),
                    (self.velocity.y + change).min(speed),
                )
            } else {
                Vec2::new(
                    (self.velocity.x - change).max(0.0),
                    (self.velocity.y - change).max(0.0),
                )
            };
            Self::approach(center, goal, self.velocity)
        } else {
            Self::approach(center, goal, Vec2::new(speed, speed))
        };
        cx.move_center(next);
        cx.emit(ViewportEvent::moved(MoveKind::Follow));
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::event::EventQueue;
    use crate::input::InputManager;
    use crate::node::ViewportNode;
    use crate::registry::PluginRegistry;

    fn step(follow: &mut Follow, node: &mut ViewportNode, elapsed: f64) -> usize {
        let mut input = InputManager::default();
        let mut plugins = PluginRegistry::new();
        let mut events = EventQueue::default();
        let mut cx = Context::new(node, &mut input, &mut plugins, &mut events, 0.0);
        follow.update(&mut cx, elapsed);
        events.as_slice().len()
    }

    fn node() -> ViewportNode {
        let mut node = ViewportNode::new(Size::new(800.0, 600.0));
        node.set_center(Point::ZERO);
        node
    }

    #[test]
    fn zero_speed_teleports() {
        let mut node = node();
        let mut follow = Follow::new(Point::new(500.0, -20.0), FollowOptions::default());
        assert_eq!(step(&mut follow, &mut node, 16.0), 1);
        let center = node.center();
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y + 20.0).abs() < 1e-9);
    }

    #[test]
    fn constant_speed_moves_along_the_line() {
        let mut node = node();
        let mut follow = Follow::new(
            Point::new(300.0, 400.0),
            FollowOptions {
                speed: 5.0,
                ..FollowOptions::default()
            },
        );
        step(&mut follow, &mut node, 16.0);
        let center = node.center();
        assert!((center.x - 3.0).abs() < 1e-9);
        assert!((center.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn radius_is_a_dead_zone() {
        let mut node = node();
        let mut follow = Follow::new(
            Point::new(30.0, 40.0),
            FollowOptions {
                radius: Some(100.0),
                ..FollowOptions::default()
            },
        );
        assert_eq!(step(&mut follow, &mut node, 16.0), 0);

        follow.set_target(Point::new(0.0, 150.0));
        step(&mut follow, &mut node, 16.0);
        let center = node.center();
        assert!(center.x.abs() < 1e-9);
        assert!((center.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn shared_target_is_read_every_frame() {
        let mut node = node();
        let target = Rc::new(Cell::new(Point::new(10.0, 0.0)));
        let mut follow = Follow::new(target.clone(), FollowOptions::default());
        step(&mut follow, &mut node, 16.0);
        target.set(Point::new(20.0, 0.0));
        step(&mut follow, &mut node, 16.0);
        assert!((node.center().x - 20.0).abs() < 1e-9);
    }
}
