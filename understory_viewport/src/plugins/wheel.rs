// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::event::{MoveKind, ViewportEvent, ZoomKind};
use crate::plugin::Plugin;
use crate::pointer::{DeltaMode, PointerEvent, WheelEvent};
use crate::registry::Context;

/// Pixels per line or page when the wheel reports coarse deltas.
const LINE_HEIGHT: f64 = 120.0;
/// Wheel delta that doubles the zoom at `percent = 0`.
const STEP_DIVISOR: f64 = 500.0;

/// Options for [`Wheel`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct WheelOptions {
    /// Extra zoom sensitivity on top of the base step.
    pub percent: f64,
    /// Spread each zoom step over this many frames.
    pub smooth: Option<u32>,
    /// A press cancels a smoothed zoom in progress.
    pub interrupt: bool,
    /// Zoom in when scrolling down.
    pub reverse: bool,
    /// World point kept centered while zooming; `None` zooms about the pointer.
    pub center: Option<Point>,
}

impl Default for WheelOptions {
    fn default() -> Self {
        Self {
            percent: 0.1,
            smooth: None,
            interrupt: true,
            reverse: false,
            center: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Smoothing {
    step: Vec2,
    frames: u32,
    point: Point,
}

/// Zooms with the mouse wheel, keeping the world point under the cursor fixed.
#[derive(Clone, Debug)]
pub struct Wheel {
    options: WheelOptions,
    smoothing: Option<Smoothing>,
}

impl Wheel {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: WheelOptions) -> Self {
        Self {
            options,
            smoothing: None,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &WheelOptions {
        &self.options
    }

    /// Whether a smoothed zoom is still being applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.smoothing.is_some()
    }

    /// Scale factor for one wheel event.
    fn change(&self, event: &WheelEvent) -> f64 {
        let sign = if self.options.reverse { -1.0 } else { 1.0 };
        let unit = if event.delta_mode == DeltaMode::Pixel {
            1.0
        } else {
            LINE_HEIGHT
        };
        let step = sign * -event.delta_y * unit / STEP_DIVISOR;
        2_f64.powf((1.0 + self.options.percent) * step)
    }

    /// Applies `scale`, then restores the anchor under `point` or the
    /// configured center.
    fn zoom_to(&self, cx: &mut Context<'_>, point: Point, scale: Vec2) {
        let anchor = cx.node.to_local(point);
        cx.node.set_scale(scale);
        cx.emit(ViewportEvent::Zoomed {
            kind: ZoomKind::Wheel,
        });
        cx.clamp_zoom();
        if let Some(center) = self.options.center {
            cx.move_center(center);
        } else {
            let moved = cx.node.to_global(anchor);
            cx.node.translate(point - moved);
        }
    }
}

impl Plugin for Wheel {
    fn pointer_down(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if self.options.interrupt {
            self.smoothing = None;
        }
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, _elapsed: f64) {
        let Some(mut smoothing) = self.smoothing else {
            return;
        };
        let scale = cx.node.scale() + smoothing.step;
        self.zoom_to(cx, smoothing.point, scale);
        smoothing.frames += 1;
        self.smoothing = match self.options.smooth {
            Some(total) if smoothing.frames < total => Some(smoothing),
            _ => None,
        };
    }

    fn wheel(&mut self, cx: &mut Context<'_>, event: &WheelEvent) -> bool {
        let change = self.change(event);
        let scale = cx.node.scale();
        match self.options.smooth.filter(|frames| *frames > 0) {
            Some(frames) => {
                let frames = f64::from(frames);
                // Fold what is left of a running smoothed zoom into the new one.
                let pending = self.smoothing.map_or(Vec2::ZERO, |s| {
                    s.step * (frames - f64::from(s.frames))
                });
                self.smoothing = Some(Smoothing {
                    step: ((scale + pending) * change - scale) / frames,
                    frames: 0,
                    point: event.position,
                });
            }
            None => self.zoom_to(cx, event.position, scale * change),
        }
        cx.emit(ViewportEvent::moved(MoveKind::Wheel));
        cx.emit(ViewportEvent::Wheel {
            dx: event.delta_x,
            dy: event.delta_y,
            dz: event.delta_z,
        });
        true
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
            Self {
                node: ViewportNode::new(Size::new(800.0, 600.0)),
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
    fn scrolling_up_zooms_in_about_pointer() {
        let mut parts = Parts::new();
        let mut wheel = Wheel::new(WheelOptions::default());
        let pointer = Point::new(200.0, 150.0);
        let before = parts.node.to_local(pointer);
        assert!(wheel.wheel(&mut parts.cx(), &WheelEvent::new(pointer, -100.0)));

        let expected = 2_f64.powf(1.1 * 0.2);
        assert!((parts.node.scale().x - expected).abs() < 1e-12);
        let after = parts.node.to_local(pointer);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
        assert!(matches!(
            parts.events.as_slice().last(),
            Some(ViewportEvent::Wheel { dy, .. }) if *dy == -100.0
        ));
    }

    #[test]
    fn line_mode_scales_delta() {
        let wheel = Wheel::new(WheelOptions {
            percent: 0.0,
            ..WheelOptions::default()
        });
        let event = WheelEvent::new(Point::ZERO, 25.0 / 6.0).with_delta_mode(DeltaMode::Line);
        assert!((wheel.change(&event) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn smoothing_spreads_zoom_over_frames() {
        let mut parts = Parts::new();
        let mut wheel = Wheel::new(WheelOptions {
            smooth: Some(4),
            ..WheelOptions::default()
        });
        wheel.wheel(&mut parts.cx(), &WheelEvent::new(Point::new(400.0, 300.0), -100.0));
        assert_eq!(parts.node.scale(), Vec2::new(1.0, 1.0));
        for _ in 0..4 {
            assert!(wheel.is_active());
            wheel.update(&mut parts.cx(), 16.0);
        }
        assert!(!wheel.is_active());
        let expected = 2_f64.powf(1.1 * 0.2);
        assert!((parts.node.scale().x - expected).abs() < 1e-12);
    }
}
