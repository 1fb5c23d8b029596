// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

use crate::event::{MoveKind, ViewportEvent};
use crate::plugin::{Plugin, PluginName};
use crate::pointer::PointerEvent;
use crate::registry::Context;

/// Samples kept before pruning.
const MAX_SAMPLES: usize = 60;
/// Samples dropped from the front when pruning.
const PRUNE_SAMPLES: usize = 30;
/// How far back, in milliseconds, a release looks for its velocity sample.
const VELOCITY_WINDOW: f64 = 100.0;
/// Positions closer than this are treated as the same clamp-corrected sample.
const CLAMP_TOLERANCE: f64 = 1e-6;

/// Options for [`Decelerate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct DecelerateOptions {
    /// Velocity multiplier applied every frame.
    pub friction: f64,
    /// Speed, in screen pixels per millisecond, below which motion stops.
    pub min_speed: f64,
}

impl Default for DecelerateOptions {
    fn default() -> Self {
        Self {
            friction: 0.95,
            min_speed: 0.01,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    position: Vec2,
    time: f64,
}

/// Momentum after a fling.
///
/// While one pointer moves, the plugin records the viewport position with
/// the viewport clock. On release it derives a velocity from the oldest
/// sample inside the last 100 ms and then decays it by `friction` every
/// frame, moving the viewport by `velocity * elapsed`.
#[derive(Clone, Debug)]
pub struct Decelerate {
    options: DecelerateOptions,
    saved: Vec<Sample>,
    velocity: Vec2,
    friction: Vec2,
}

impl Decelerate {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: DecelerateOptions) -> Self {
        Self {
            options,
            saved: Vec::new(),
            velocity: Vec2::ZERO,
            friction: Vec2::new(options.friction, options.friction),
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &DecelerateOptions {
        &self.options
    }

    /// Current velocity in screen pixels per millisecond. Zero means idle.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Per-axis decay currently applied each frame.
    ///
    /// Starts at the configured friction. Bounce and Snap replace it to
    /// settle a fling faster.
    #[must_use]
    pub fn friction(&self) -> Vec2 {
        self.friction
    }

    /// Replaces the horizontal decay.
    pub fn set_friction_x(&mut self, friction: f64) {
        self.friction.x = friction;
    }

    /// Replaces the vertical decay.
    pub fn set_friction_y(&mut self, friction: f64) {
        self.friction.y = friction;
    }

    /// Whether either axis is still moving.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity.x != 0.0 || self.velocity.y != 0.0
    }

    /// Starts motion manually, for example to hand off edge scrolling.
    pub fn activate(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(x) = x {
            self.velocity.x = x;
            self.friction.x = self.options.friction;
        }
        if let Some(y) = y {
            self.velocity.y = y;
            self.friction.y = self.options.friction;
        }
    }

    /// Stops horizontal motion.
    pub fn stop_x(&mut self) {
        self.velocity.x = 0.0;
    }

    /// Stops vertical motion.
    pub fn stop_y(&mut self) {
        self.velocity.y = 0.0;
    }

    /// Stops all motion.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Corrects the latest sample after a horizontal clamp.
    ///
    /// If the sample was recorded at the clamp's pre-correction position,
    /// it is moved to the corrected one so the clamp does not read as a fling.
    pub fn reconcile_clamp_x(&mut self, original: f64, corrected: f64) {
        if let Some(last) = self.saved.last_mut() {
            if (last.position.x - original).abs() <= CLAMP_TOLERANCE {
                last.position.x = corrected;
            }
        }
    }

    /// Corrects the latest sample after a vertical clamp.
    pub fn reconcile_clamp_y(&mut self, original: f64, corrected: f64) {
        if let Some(last) = self.saved.last_mut() {
            if (last.position.y - original).abs() <= CLAMP_TOLERANCE {
                last.position.y = corrected;
            }
        }
    }
}

impl Plugin for Decelerate {
    fn pointer_down(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        self.saved.clear();
        self.velocity = Vec2::ZERO;
        false
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        let count = cx.input.count();
        if count == 1 || (count > 1 && !cx.plugins.contains(PluginName::Pinch)) {
            self.saved.push(Sample {
                position: cx.node.position(),
                time: cx.now(),
            });
            if self.saved.len() > MAX_SAMPLES {
                self.saved.drain(..PRUNE_SAMPLES);
            }
        }
        false
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if cx.input.count() != 0 {
            return false;
        }
        let now = cx.now();
        if let Some(sample) = self.saved.iter().find(|s| s.time >= now - VELOCITY_WINDOW) {
            let dt = now - sample.time;
            if dt > 0.0 {
                self.velocity = (cx.node.position() - sample.position) / dt;
                self.friction = Vec2::new(self.options.friction, self.options.friction);
                tracing::trace!(velocity = ?self.velocity, "fling started");
            }
        }
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        let mut moved = false;
        if self.velocity.x != 0.0 {
            cx.node.set_x(cx.node.x() + self.velocity.x * elapsed);
            self.velocity.x *= self.friction.x;
            if self.velocity.x.abs() < self.options.min_speed {
                self.velocity.x = 0.0;
            }
            moved = true;
        }
        if self.velocity.y != 0.0 {
            cx.node.set_y(cx.node.y() + self.velocity.y * elapsed);
            self.velocity.y *= self.friction.y;
            if self.velocity.y.abs() < self.options.min_speed {
                self.velocity.y = 0.0;
            }
            moved = true;
        }
        if moved {
            if !self.is_active() {
                tracing::trace!("fling finished");
            }
            cx.emit(ViewportEvent::moved(MoveKind::Decelerate));
        }
    }

    fn reset(&mut self, _cx: &mut Context<'_>) {
        self.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_resets_friction_per_axis() {
        let mut decelerate = Decelerate::new(DecelerateOptions::default());
        decelerate.set_friction_x(0.5);
        decelerate.set_friction_y(0.5);
        decelerate.activate(Some(2.0), None);
        assert_eq!(decelerate.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(decelerate.friction(), Vec2::new(0.95, 0.5));
        assert!(decelerate.is_active());
        decelerate.stop_x();
        assert!(!decelerate.is_active());
    }

    #[test]
    fn clamp_reconciliation_uses_tolerance() {
        let mut decelerate = Decelerate::new(DecelerateOptions::default());
        decelerate.saved.push(Sample {
            position: Vec2::new(10.0 + 1e-9, 4.0),
            time: 0.0,
        });
        decelerate.reconcile_clamp_x(10.0, 0.0);
        decelerate.reconcile_clamp_y(5.0, 0.0);
        assert_eq!(decelerate.saved[0].position, Vec2::new(0.0, 4.0));
    }
}
