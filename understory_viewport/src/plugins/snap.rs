// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::ease::Ease;
use crate::event::{MoveKind, ViewportEvent};
use crate::plugin::{Plugin, PluginName};
use crate::pointer::{PointerEvent, WheelEvent};
use crate::registry::Context;

/// Positions closer than this to the target count as arrived.
const ARRIVED: f64 = 1e-6;

/// Options for [`Snap`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct SnapOptions {
    /// Snap the top-left corner instead of the center.
    pub top_left: bool,
    /// Decay handed to [`Decelerate`](crate::Decelerate) when a fling ends
    /// while this plugin is registered.
    pub friction: f64,
    /// Duration in milliseconds. Zero or less snaps instantly.
    pub time: f64,
    /// Animation curve.
    pub ease: Ease,
    /// Pause while any pointer is down and drop a running animation on press.
    pub interrupt: bool,
    /// Remove the plugin when the animation finishes.
    pub remove_on_complete: bool,
    /// Remove the plugin on press or wheel.
    pub remove_on_interrupt: bool,
    /// Start animating as soon as the plugin is added.
    pub force_start: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            top_left: false,
            friction: 0.8,
            time: 1000.0,
            ease: Ease::InOutSine,
            interrupt: true,
            remove_on_complete: false,
            remove_on_interrupt: false,
            force_start: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Snapping {
    time: f64,
    start: Point,
    delta: Vec2,
}

/// Eases the center (or top-left corner) of the viewport to a world point.
///
/// The animation starts the first frame the viewport is somewhere else, so
/// it also pulls the camera back after the user moves it away.
#[derive(Clone, Debug)]
pub struct Snap {
    options: SnapOptions,
    target: Point,
    snapping: Option<Snapping>,
}

impl Snap {
    /// Creates the plugin targeting world point `target`.
    #[must_use]
    pub fn new(target: Point, options: SnapOptions) -> Self {
        Self {
            options,
            target,
            snapping: None,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &SnapOptions {
        &self.options
    }

    /// World point the viewport is snapped to.
    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Whether an animation is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.snapping.is_some()
    }

    fn current(&self, cx: &Context<'_>) -> Point {
        if self.options.top_left {
            cx.node.corner()
        } else {
            cx.node.center()
        }
    }

    fn start(&mut self, cx: &mut Context<'_>) {
        let start = self.current(cx);
        self.snapping = Some(Snapping {
            time: 0.0,
            start,
            delta: self.target - start,
        });
        tracing::trace!(from = ?start, to = ?self.target, "snap started");
        cx.emit(ViewportEvent::SnapStart);
    }

    fn interrupted(&mut self, cx: &mut Context<'_>) {
        if self.options.remove_on_interrupt {
            cx.remove_plugin(PluginName::Snap);
        }
    }
}

impl Plugin for Snap {
    fn added(&mut self, cx: &mut Context<'_>) {
        if self.options.force_start {
            self.start(cx);
        }
    }

    fn pointer_down(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if self.options.remove_on_interrupt {
            self.interrupted(cx);
        } else if self.options.interrupt {
            self.snapping = None;
        }
        false
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if cx.input.count() == 0 {
            let friction = self.options.friction;
            if let Some(decelerate) = cx.plugins.decelerate_mut() {
                if decelerate.is_active() {
                    decelerate.set_friction_x(friction);
                    decelerate.set_friction_y(friction);
                }
            }
        }
        false
    }

    fn wheel(&mut self, cx: &mut Context<'_>, _event: &WheelEvent) -> bool {
        self.interrupted(cx);
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        if self.options.interrupt && cx.input.count() != 0 {
            return;
        }
        let Some(mut snapping) = self.snapping else {
            let offset = self.current(cx) - self.target;
            if offset.x.abs() > ARRIVED || offset.y.abs() > ARRIVED {
                self.start(cx);
            }
            return;
        };

        snapping.time += elapsed;
        let finished = snapping.time >= self.options.time;
        let point = if finished {
            self.target
        } else {
            let percent = self
                .options
                .ease
                .apply(snapping.time, 0.0, 1.0, self.options.time);
            snapping.start + snapping.delta * percent
        };
        if self.options.top_left {
            cx.move_corner(point);
        } else {
            cx.move_center(point);
        }
        cx.emit(ViewportEvent::moved(MoveKind::Snap));

        if finished {
            self.snapping = None;
            if self.options.remove_on_complete {
                cx.remove_plugin(PluginName::Snap);
            }
            tracing::trace!(at = ?point, "snap finished");
            cx.emit(ViewportEvent::SnapEnd);
        } else {
            self.snapping = Some(snapping);
        }
    }

    fn reset(&mut self, _cx: &mut Context<'_>) {
        self.snapping = None;
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

    struct Parts {
        node: ViewportNode,
        input: InputManager,
        plugins: PluginRegistry,
        events: EventQueue,
    }

    impl Parts {
        fn new() -> Self {
            let mut node = ViewportNode::new(Size::new(800.0, 600.0));
            node.set_content_size(Size::new(4000.0, 4000.0));
            Self {
                node,
                input: InputManager::default(),
                plugins: PluginRegistry::new(),
                events: EventQueue::default(),
            }
        }

        fn cx(&mut self) -> Context<'_> {
            Context::new(
                &mut self.node,
                &mut self.input,
                &mut self.plugins,
                &mut self.events,
                0.0,
            )
        }
    }

    #[test]
    fn starts_lazily_and_lands_on_target() {
        let mut parts = Parts::new();
        let mut snap = Snap::new(Point::new(1000.0, 1000.0), SnapOptions::default());
        snap.update(&mut parts.cx(), 16.0);
        assert!(snap.is_active());
        assert_eq!(parts.events.as_slice(), [ViewportEvent::SnapStart]);

        for _ in 0..70 {
            snap.update(&mut parts.cx(), 16.0);
        }
        assert!(!snap.is_active());
        let center = parts.node.center();
        assert!((center.x - 1000.0).abs() < 1e-9);
        assert!((center.y - 1000.0).abs() < 1e-9);
        assert_eq!(
            parts.events.as_slice().last(),
            Some(&ViewportEvent::SnapEnd)
        );
    }

    #[test]
    fn zero_time_snaps_on_first_animated_frame() {
        let mut parts = Parts::new();
        let mut snap = Snap::new(
            Point::new(0.0, 0.0),
            SnapOptions {
                top_left: true,
                time: 0.0,
                force_start: true,
                ..SnapOptions::default()
            },
        );
        snap.added(&mut parts.cx());
        parts.node.set_corner(Point::new(300.0, 300.0));
        snap.update(&mut parts.cx(), 0.0);
        assert_eq!(parts.node.corner(), Point::ZERO);
        assert!(!snap.is_active());
    }

    #[test]
    fn arrived_viewport_does_not_restart() {
        let mut parts = Parts::new();
        let center = parts.node.center();
        let mut snap = Snap::new(center, SnapOptions::default());
        snap.update(&mut parts.cx(), 16.0);
        assert!(!snap.is_active());
        assert!(parts.events.is_empty());
    }
}
