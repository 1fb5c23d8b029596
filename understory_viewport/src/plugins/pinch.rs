// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::event::{MoveKind, ViewportEvent, ZoomKind};
use crate::plugin::Plugin;
use crate::pointer::PointerEvent;
use crate::registry::Context;

/// Options for [`Pinch`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct PinchOptions {
    /// Ignore movement of the midpoint; only zoom.
    pub no_drag: bool,
    /// Zoom sensitivity multiplier.
    pub percent: f64,
    /// World point kept centered while zooming; `None` zooms about the
    /// midpoint of the two fingers.
    pub center: Option<Point>,
}

impl Default for PinchOptions {
    fn default() -> Self {
        Self {
            no_drag: false,
            percent: 1.0,
            center: None,
        }
    }
}

/// Two-finger zoom, with optional panning by the finger midpoint.
///
/// Only the first two touches count. The world point under their midpoint
/// stays under it while the distance between them changes.
#[derive(Clone, Debug)]
pub struct Pinch {
    options: PinchOptions,
    active: bool,
    pinching: bool,
    last_center: Option<Point>,
}

impl Pinch {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: PinchOptions) -> Self {
        Self {
            options,
            active: false,
            pinching: false,
            last_center: None,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &PinchOptions {
        &self.options
    }

    /// Whether two or more pointers are down and owned by the pinch.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Plugin for Pinch {
    fn pointer_down(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if cx.input.count() >= 2 {
            self.active = true;
            true
        } else {
            false
        }
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        if !self.active {
            return false;
        }
        let (first, second) = match cx.input.touches_mut() {
            [first, second, ..] => (first, second),
            _ => return false,
        };
        let previous = first
            .last
            .zip(second.last)
            .map(|(a, b)| (b - a).hypot())
            .filter(|d| *d != 0.0);
        if first.id == event.pointer_id {
            first.last = Some(event.position);
        } else if second.id == event.pointer_id {
            second.last = Some(event.position);
        }
        let (Some(previous), Some(a), Some(b)) = (previous, first.last, second.last) else {
            if !self.pinching {
                self.pinching = true;
                cx.emit(ViewportEvent::PinchStart);
            }
            return true;
        };

        let point = a.midpoint(b);
        let anchor = cx.node.to_local(point);
        let distance = (b - a).hypot();
        let scale = cx.node.scale();
        let change = (distance - previous) / cx.node.screen_width() * scale.x * self.options.percent;
        cx.node.set_scale(scale + Vec2::new(change, change));
        cx.emit(ViewportEvent::Zoomed {
            kind: ZoomKind::Pinch,
        });
        cx.clamp_zoom();

        if let Some(center) = self.options.center {
            cx.move_center(center);
        } else {
            let moved = cx.node.to_global(anchor);
            cx.node.translate(point - moved);
            cx.emit(ViewportEvent::moved(MoveKind::Pinch));
        }
        if !self.options.no_drag {
            if let Some(last_center) = self.last_center {
                cx.node.translate(point - last_center);
                cx.emit(ViewportEvent::moved(MoveKind::Pinch));
            }
        }
        self.last_center = Some(point);
        true
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if cx.input.touches().len() > 1 {
            return false;
        }
        self.active = false;
        self.last_center = None;
        if self.pinching {
            self.pinching = false;
            cx.emit(ViewportEvent::PinchEnd);
            true
        } else {
            false
        }
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

    fn press(parts: &mut Parts, pinch: &mut Pinch, event: &PointerEvent) -> bool {
        parts.input.press(event, true);
        pinch.pointer_down(&mut parts.cx(), event)
    }

    #[test]
    fn spreading_fingers_zooms_about_midpoint() {
        let mut parts = Parts::new();
        let mut pinch = Pinch::new(PinchOptions {
            no_drag: true,
            ..PinchOptions::default()
        });
        let a = PointerEvent::touch(1, Point::new(300.0, 300.0));
        let b = PointerEvent::touch(2, Point::new(500.0, 300.0));
        assert!(!press(&mut parts, &mut pinch, &a));
        assert!(press(&mut parts, &mut pinch, &b));

        pinch.pointer_move(&mut parts.cx(), &a);
        pinch.pointer_move(&mut parts.cx(), &b);
        assert_eq!(parts.events.as_slice(), [ViewportEvent::PinchStart]);

        // The next midpoint, sampled before the zoom is applied.
        let mid = Point::new(440.0, 300.0);
        let world_before = parts.node.to_local(mid);
        pinch.pointer_move(&mut parts.cx(), &b.at(Point::new(580.0, 300.0)));
        assert!(parts.node.scale().x > 1.0);

        let world_after = parts.node.to_local(mid);
        assert!((world_after.x - world_before.x).abs() < 1e-9);
        assert!((world_after.y - world_before.y).abs() < 1e-9);
    }

    #[test]
    fn lifting_to_one_finger_ends_pinch() {
        let mut parts = Parts::new();
        let mut pinch = Pinch::new(PinchOptions::default());
        let a = PointerEvent::touch(1, Point::new(300.0, 300.0));
        let b = PointerEvent::touch(2, Point::new(500.0, 300.0));
        press(&mut parts, &mut pinch, &a);
        press(&mut parts, &mut pinch, &b);
        pinch.pointer_move(&mut parts.cx(), &a);
        parts.input.release(&b);
        assert!(pinch.pointer_up(&mut parts.cx(), &b));
        assert!(!pinch.is_active());
        assert_eq!(
            parts.events.as_slice().last(),
            Some(&ViewportEvent::PinchEnd)
        );
    }
}
