// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::ease::Ease;
use crate::event::{ViewportEvent, ZoomKind};
use crate::plugin::{Plugin, PluginName};
use crate::pointer::{PointerEvent, WheelEvent};
use crate::registry::Context;

/// Options for [`SnapZoom`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct SnapZoomOptions {
    /// World width to show. When only one of width and height is given,
    /// the other axis takes the same scale.
    pub width: Option<f64>,
    /// World height to show.
    pub height: Option<f64>,
    /// Duration in milliseconds. Zero or less applies the zoom when added.
    pub time: f64,
    /// Animation curve.
    pub ease: Ease,
    /// World point kept centered while zooming; `None` keeps the current center.
    pub center: Option<Point>,
    /// Pause while any pointer is down and drop a running animation on press.
    pub interrupt: bool,
    /// Remove the plugin when the animation finishes.
    pub remove_on_complete: bool,
    /// Remove the plugin on press or wheel.
    pub remove_on_interrupt: bool,
    /// Start animating as soon as the plugin is added.
    pub force_start: bool,
    /// Zoom about the top-left instead of re-centering.
    pub no_move: bool,
}

impl Default for SnapZoomOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            time: 1000.0,
            ease: Ease::InOutSine,
            center: None,
            interrupt: true,
            remove_on_complete: false,
            remove_on_interrupt: false,
            force_start: false,
            no_move: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Snapping {
    time: f64,
    start: Vec2,
    delta: Vec2,
}

/// Eases the zoom so a given world width and/or height fills the screen.
#[derive(Clone, Debug)]
pub struct SnapZoom {
    options: SnapZoomOptions,
    target: Option<Vec2>,
    snapping: Option<Snapping>,
}

impl SnapZoom {
    /// Creates the plugin. The target scale is computed when it is added.
    #[must_use]
    pub fn new(options: SnapZoomOptions) -> Self {
        Self {
            options,
            target: None,
            snapping: None,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &SnapZoomOptions {
        &self.options
    }

    /// Scale the plugin zooms to, once added.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Whether an animation is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.snapping.is_some()
    }

    fn compute_target(&mut self, cx: &Context<'_>) {
        let x = self
            .options
            .width
            .filter(|w| *w > 0.0)
            .map(|w| cx.node.screen_width() / w);
        let y = self
            .options
            .height
            .filter(|h| *h > 0.0)
            .map(|h| cx.node.screen_height() / h);
        self.target = Some(match (x, y) {
            (Some(x), Some(y)) => Vec2::new(x, y),
            (Some(x), None) => Vec2::new(x, x),
            (None, Some(y)) => Vec2::new(y, y),
            (None, None) => cx.node.scale(),
        });
    }

    fn start(&mut self, cx: &mut Context<'_>, target: Vec2) {
        let start = cx.node.scale();
        self.snapping = Some(Snapping {
            time: 0.0,
            start,
            delta: target - start,
        });
        tracing::trace!(from = ?start, to = ?target, "snap-zoom started");
        cx.emit(ViewportEvent::SnapZoomStart);
    }

    fn interrupted(&mut self, cx: &mut Context<'_>) {
        if self.options.remove_on_interrupt {
            cx.remove_plugin(PluginName::SnapZoom);
        }
    }
}

impl Plugin for SnapZoom {
    fn added(&mut self, cx: &mut Context<'_>) {
        self.compute_target(cx);
        let Some(target) = self.target else {
            return;
        };
        if self.options.time <= 0.0 {
            cx.node.set_scale(target);
            if self.options.remove_on_complete {
                cx.remove_plugin(PluginName::SnapZoom);
            }
        } else if self.options.force_start {
            self.start(cx, target);
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

    fn wheel(&mut self, cx: &mut Context<'_>, _event: &WheelEvent) -> bool {
        self.interrupted(cx);
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        if self.options.interrupt && cx.input.count() != 0 {
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        let Some(mut snapping) = self.snapping else {
            if cx.node.scale() != target {
                self.start(cx, target);
            }
            return;
        };

        let old_center = cx.node.center();
        snapping.time += elapsed;
        let finished = snapping.time >= self.options.time;
        if finished {
            cx.node.set_scale(target);
        } else {
            let (time, duration) = (snapping.time, self.options.time);
            let ease = self.options.ease;
            cx.node.set_scale(Vec2::new(
                ease.apply(time, snapping.start.x, snapping.delta.x, duration),
                ease.apply(time, snapping.start.y, snapping.delta.y, duration),
            ));
        }
        cx.clamp_zoom();
        if !self.options.no_move {
            cx.move_center(self.options.center.unwrap_or(old_center));
        }
        cx.emit(ViewportEvent::Zoomed {
            kind: ZoomKind::SnapZoom,
        });

        if finished {
            self.snapping = None;
            if self.options.remove_on_complete {
                cx.remove_plugin(PluginName::SnapZoom);
            }
            tracing::trace!(scale = ?target, "snap-zoom finished");
            cx.emit(ViewportEvent::SnapZoomEnd);
        } else {
            self.snapping = Some(snapping);
        }
    }

    fn resize(&mut self, cx: &mut Context<'_>) {
        self.snapping = None;
        if self.options.width.is_some() || self.options.height.is_some() {
            self.compute_target(cx);
        }
    }

    fn reset(&mut self, _cx: &mut Context<'_>) {
        self.snapping = None;
    }

    fn resume(&mut self) {
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
            node.set_content_size(Size::new(2000.0, 2000.0));
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
    fn single_dimension_mirrors_scale() {
        let mut parts = Parts::new();
        let mut snap_zoom = SnapZoom::new(SnapZoomOptions {
            width: Some(400.0),
            ..SnapZoomOptions::default()
        });
        snap_zoom.added(&mut parts.cx());
        assert_eq!(snap_zoom.target(), Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn zero_time_applies_immediately() {
        let mut parts = Parts::new();
        let mut snap_zoom = SnapZoom::new(SnapZoomOptions {
            height: Some(1200.0),
            time: 0.0,
            ..SnapZoomOptions::default()
        });
        snap_zoom.added(&mut parts.cx());
        assert_eq!(parts.node.scale(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn animation_keeps_center_and_finishes() {
        let mut parts = Parts::new();
        let before = parts.node.center();
        let mut snap_zoom = SnapZoom::new(SnapZoomOptions {
            width: Some(400.0),
            time: 100.0,
            ..SnapZoomOptions::default()
        });
        snap_zoom.added(&mut parts.cx());
        snap_zoom.update(&mut parts.cx(), 16.0);
        assert!(snap_zoom.is_active());
        for _ in 0..7 {
            snap_zoom.update(&mut parts.cx(), 16.0);
        }
        assert!(!snap_zoom.is_active());
        assert_eq!(parts.node.scale(), Vec2::new(2.0, 2.0));
        let after = parts.node.center();
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
        assert_eq!(
            parts.events.as_slice().last(),
            Some(&ViewportEvent::SnapZoomEnd)
        );
    }

    #[test]
    fn resize_recomputes_target() {
        let mut parts = Parts::new();
        let mut snap_zoom = SnapZoom::new(SnapZoomOptions {
            width: Some(400.0),
            ..SnapZoomOptions::default()
        });
        snap_zoom.added(&mut parts.cx());
        parts.node.set_screen_size(Size::new(1200.0, 600.0));
        snap_zoom.resize(&mut parts.cx());
        assert_eq!(snap_zoom.target(), Some(Vec2::new(3.0, 3.0)));
    }
}
