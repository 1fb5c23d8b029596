// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::event::{MoveKind, ViewportEvent};
use crate::modes::{Direction, Underflow, WheelClamp};
use crate::plugin::{Plugin, PluginName};
use crate::pointer::{MouseButtons, PointerEvent, PointerId, WheelEvent};
use crate::registry::Context;

/// Options for [`Drag`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct DragOptions {
    /// Axes the drag may move.
    pub direction: Direction,
    /// Pan with the wheel when no [`Wheel`](crate::Wheel) plugin is registered.
    pub wheel: bool,
    /// Multiplier for wheel panning.
    pub wheel_scroll: f64,
    /// Pan in the wheel's direction instead of against it.
    pub reverse: bool,
    /// Axes re-clamped to the world after a wheel pan.
    pub clamp_wheel: WheelClamp,
    /// Alignment of a world smaller than the screen when clamping a wheel pan.
    pub underflow: Underflow,
    /// Multiplier applied to pointer movement.
    pub factor: f64,
    /// Mouse buttons that start a drag. Touch and pen always do.
    pub mouse_buttons: MouseButtons,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            direction: Direction::All,
            wheel: true,
            wheel_scroll: 1.0,
            reverse: false,
            clamp_wheel: WheelClamp::Off,
            underflow: Underflow::CENTER,
            factor: 1.0,
            mouse_buttons: MouseButtons::all(),
        }
    }
}

/// Pans the viewport by following a single pointer.
///
/// Movement below the input threshold is ignored until the gesture has
/// started, so taps stay clicks. With two or more pointers the drag only
/// continues if no [`Pinch`](crate::Pinch) is registered.
#[derive(Clone, Debug)]
pub struct Drag {
    options: DragOptions,
    last: Option<Point>,
    current: Option<PointerId>,
    moved: bool,
}

impl Drag {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: DragOptions) -> Self {
        Self {
            options,
            last: None,
            current: None,
            moved: false,
        }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &DragOptions {
        &self.options
    }

    /// Whether the pointer has moved past the threshold in this gesture.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.moved
    }

    fn single_pointer(cx: &Context<'_>) -> bool {
        let count = cx.input.count();
        count == 1 || (count > 1 && !cx.plugins.contains(PluginName::Pinch))
    }

    fn check_buttons(&self, cx: &Context<'_>, event: &PointerEvent) -> bool {
        Self::single_pointer(cx)
            && (!event.is_mouse()
                || event
                    .button
                    .is_none_or(|button| self.options.mouse_buttons.contains(button.mask())))
    }

    fn wheel_sign(&self) -> f64 {
        if self.options.reverse { 1.0 } else { -1.0 }
    }

    fn clamp_wheel(&self, cx: &mut Context<'_>) {
        let clamp = self.options.clamp_wheel;
        let underflow = self.options.underflow;
        if clamp.horizontal() {
            let (screen, world) = (cx.node.screen_width(), cx.node.screen_world_width());
            if world < screen {
                cx.node.set_x(underflow.x.offset(screen, world));
            } else if cx.node.left() < 0.0 {
                cx.node.set_left(0.0);
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_x();
                }
            } else if cx.node.right() > cx.node.world_width() {
                let right = cx.node.world_width();
                cx.node.set_right(right);
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_x();
                }
            }
        }
        if clamp.vertical() {
            let (screen, world) = (cx.node.screen_height(), cx.node.screen_world_height());
            if world < screen {
                cx.node.set_y(underflow.y.offset(screen, world));
            } else if cx.node.top() < 0.0 {
                cx.node.set_top(0.0);
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_y();
                }
            } else if cx.node.bottom() > cx.node.world_height() {
                let bottom = cx.node.world_height();
                cx.node.set_bottom(bottom);
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_y();
                }
            }
        }
    }
}

impl Plugin for Drag {
    fn pointer_down(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        if self.check_buttons(cx, event) {
            self.last = Some(event.position);
            self.current = Some(event.pointer_id);
            true
        } else {
            self.last = None;
            false
        }
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        if self.current != Some(event.pointer_id) {
            return false;
        }
        if !Self::single_pointer(cx) {
            self.moved = false;
            return false;
        }

        let distance = event.position - last;
        let direction = self.options.direction;
        let past_threshold = (direction.horizontal() && cx.input.check_threshold(distance.x))
            || (direction.vertical() && cx.input.check_threshold(distance.y));
        if !self.moved && !past_threshold {
            return false;
        }

        let factor = self.options.factor;
        let mut delta = Vec2::ZERO;
        if direction.horizontal() {
            delta.x = distance.x * factor;
        }
        if direction.vertical() {
            delta.y = distance.y * factor;
        }
        cx.node.translate(delta);
        self.last = Some(event.position);
        if !self.moved {
            let world = cx.to_world(event.position);
            cx.emit(ViewportEvent::DragStart {
                screen: event.position,
                world,
            });
        }
        self.moved = true;
        cx.emit(ViewportEvent::moved(MoveKind::Drag));
        true
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        if let [remaining] = cx.input.touches() {
            // Continue the drag with the finger that is still down.
            if let Some(last) = remaining.last {
                self.last = Some(last);
                self.current = Some(remaining.id);
            }
            self.moved = false;
            return true;
        }
        let mut consumed = false;
        if let Some(last) = self.last {
            if self.moved {
                let world = cx.to_world(last);
                cx.emit(ViewportEvent::DragEnd {
                    screen: last,
                    world,
                });
                self.last = None;
                self.moved = false;
                consumed = true;
            }
        }
        if cx.input.count() == 0 {
            self.last = None;
            self.moved = false;
        }
        consumed
    }

    fn wheel(&mut self, cx: &mut Context<'_>, event: &WheelEvent) -> bool {
        if !self.options.wheel || cx.plugins.contains(PluginName::Wheel) {
            return false;
        }
        let scale = self.options.wheel_scroll * self.wheel_sign();
        let direction = self.options.direction;
        let mut delta = Vec2::ZERO;
        if direction.horizontal() {
            delta.x = event.delta_x * scale;
        }
        if direction.vertical() {
            delta.y = event.delta_y * scale;
        }
        cx.node.translate(delta);
        if self.options.clamp_wheel != WheelClamp::Off {
            self.clamp_wheel(cx);
        }
        cx.emit(ViewportEvent::WheelScroll);
        cx.emit(ViewportEvent::moved(MoveKind::WheelScroll));
        true
    }

    fn resume(&mut self) {
        self.last = None;
    }
}
