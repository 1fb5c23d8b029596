// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::{Point, Rect, Size};
use understory_viewport::{
    ClampOptions, DecelerateOptions, Direction, DragOptions, PluginName, PointerEvent, Viewport,
    ViewportEvent, ViewportOptions, WheelClamp, WheelEvent,
};

use crate::options::{Overflow, ScrollboxOptions};

/// Track and thumb of one visible scrollbar, in box coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scrollbar {
    /// The full length of the bar.
    pub track: Rect,
    /// The draggable part, proportional to the visible share of the content.
    pub thumb: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug)]
struct ThumbDrag {
    axis: Axis,
    last: Point,
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    wait: f64,
    elapsed: f64,
}

/// Start and length of a thumb along a track.
#[derive(Clone, Copy, Debug, Default)]
struct Span {
    start: f64,
    length: f64,
}

impl Span {
    /// Places a thumb for content scrolled to `position` out of `extent`.
    fn new(position: f64, extent: f64, track: f64) -> Self {
        if extent <= 0.0 {
            return Self {
                start: 0.0,
                length: track,
            };
        }
        let start = (position / extent * track).max(0.0);
        let length = (track / extent * track).min(track - start);
        Self { start, length }
    }

    fn contains(self, value: f64) -> bool {
        self.start <= value && value <= self.start + self.length
    }
}

/// A fixed-size box that scrolls its content.
///
/// The content lives in a [`Viewport`] sized to the box, wired with
/// deceleration and, when `drag_scroll` is set, dragging and clamping along
/// the axes that have a scrollbar. The box reports scrollbar geometry and
/// an opacity for the host to draw; it never draws anything itself.
///
/// Pointer positions are in box coordinates, with the origin at the box's
/// top-left corner.
#[derive(Debug)]
pub struct Scrollbox {
    options: ScrollboxOptions,
    content: Viewport,
    scroll_width: Option<f64>,
    scroll_height: Option<f64>,
    disabled: bool,
    horizontal: bool,
    vertical: bool,
    thumb_x: Span,
    thumb_y: Span,
    thumb_drag: Option<ThumbDrag>,
    fade: Option<Fade>,
    alpha: f64,
    moved: Rc<Cell<bool>>,
}

impl Scrollbox {
    /// Creates a scroll box with empty content.
    #[must_use]
    pub fn new(options: ScrollboxOptions) -> Self {
        let mut content = Viewport::new(ViewportOptions {
            screen_width: options.box_width,
            screen_height: options.box_height,
            passive_wheel: options.passive_wheel,
            stop_propagation: options.stop_propagation,
            ..ViewportOptions::default()
        });
        content.decelerate(DecelerateOptions::default());

        let moved = Rc::new(Cell::new(false));
        let flag = moved.clone();
        content.subscribe(move |event| {
            if matches!(event, ViewportEvent::Moved { .. }) {
                flag.set(true);
            }
        });

        let mut scrollbox = Self {
            options,
            content,
            scroll_width: None,
            scroll_height: None,
            disabled: false,
            horizontal: false,
            vertical: false,
            thumb_x: Span::default(),
            thumb_y: Span::default(),
            thumb_drag: None,
            fade: None,
            alpha: 1.0,
            moved,
        };
        scrollbox.refresh();
        scrollbox
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &ScrollboxOptions {
        &self.options
    }

    /// The content viewport.
    #[must_use]
    pub fn content(&self) -> &Viewport {
        &self.content
    }

    /// The content viewport, for moving the content directly. Call
    /// [`refresh`](Self::refresh) afterwards to update the scrollbars.
    pub fn content_mut(&mut self) -> &mut Viewport {
        &mut self.content
    }

    /// Sets the unscaled size of the content and refreshes.
    pub fn set_content_size(&mut self, size: Size) {
        self.content.set_content_size(size);
        self.refresh();
    }

    /// Recomputes the scrollbars and re-installs the drag and clamp plugins.
    ///
    /// Call after the content changes size.
    pub fn refresh(&mut self) {
        self.layout();
        if self.disabled {
            self.thumb_drag = None;
            return;
        }
        if self.options.drag_scroll {
            let direction = match (self.horizontal, self.vertical) {
                (true, true) => Direction::All,
                (true, false) => Direction::X,
                _ => Direction::Y,
            };
            tracing::debug!(?direction, "scrollbox wiring drag and clamp");
            let clamp_wheel = if self.options.clamp_wheel {
                WheelClamp::All
            } else {
                WheelClamp::Off
            };
            self.content
                .drag(DragOptions {
                    direction,
                    clamp_wheel,
                    ..DragOptions::default()
                })
                .clamp(ClampOptions {
                    direction: Some(direction),
                    underflow: self.options.underflow,
                    ..ClampOptions::default()
                });
        }
        self.sync();
    }

    /// Relayouts the scrollbars if the content moved since the last check.
    fn sync(&mut self) {
        if self.moved.replace(false) {
            self.layout();
        }
    }

    fn layout(&mut self) {
        if self.disabled {
            self.horizontal = false;
            self.vertical = false;
            return;
        }
        let ScrollboxOptions {
            box_width,
            box_height,
            scrollbar_size,
            overflow_x,
            overflow_y,
            ..
        } = self.options;
        let scroll_width = self.scroll_width();
        let scroll_height = self.scroll_height();
        self.horizontal = overflow_x.shows_bar(scroll_width, box_width);
        self.vertical = overflow_y.shows_bar(scroll_height, box_height);

        let width = scroll_width + if self.vertical { scrollbar_size } else { 0.0 };
        let height = scroll_height + if self.horizontal { scrollbar_size } else { 0.0 };
        self.thumb_x = Span::new(self.content.left(), width, box_width);
        self.thumb_y = Span::new(self.content.top(), height, box_height);
        self.activate_fade();
    }

    /// Makes the scrollbars opaque and restarts the fade timer.
    fn activate_fade(&mut self) {
        if !self.options.fade {
            return;
        }
        if self.fade.is_none() {
            tracing::trace!("scrollbar fade armed");
        }
        self.alpha = 1.0;
        self.fade = Some(Fade {
            wait: self.options.fade_scrollbox_wait,
            elapsed: 0.0,
        });
    }

    /// Advances the content viewport and the scrollbar fade.
    pub fn update(&mut self, elapsed: f64) {
        self.content.update(elapsed);
        self.sync();

        let Some(mut fade) = self.fade else {
            return;
        };
        let mut step = elapsed;
        if fade.wait > 0.0 {
            fade.wait -= elapsed;
            if fade.wait > 0.0 {
                self.fade = Some(fade);
                return;
            }
            step = -fade.wait;
        }
        fade.elapsed += step;
        let time = self.options.fade_scrollbar_time;
        if fade.elapsed >= time {
            self.fade = None;
            self.alpha = 0.0;
            tracing::trace!("scrollbar fade finished");
        } else {
            self.alpha = self
                .options
                .fade_scrollbox_ease
                .apply(fade.elapsed, 1.0, -1.0, time);
            self.fade = Some(fade);
        }
        self.content.set_dirty(true);
    }

    // Input

    /// Handles a press: on a thumb it starts a thumb drag, on a track it
    /// pages, elsewhere it goes to the content.
    ///
    /// Returns whether the host should stop propagating the event.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if !self.disabled && self.scrollbar_down(event.position) {
            return self.options.stop_propagation;
        }
        let stop = self.content.pointer_down(event);
        self.sync();
        stop
    }

    /// Whether `point` hit a scrollbar; starts a thumb drag or pages if so.
    fn scrollbar_down(&mut self, point: Point) -> bool {
        let ScrollboxOptions {
            box_width,
            box_height,
            scrollbar_size,
            ..
        } = self.options;
        if self.horizontal && point.y > box_height - scrollbar_size {
            if self.thumb_x.contains(point.x) {
                self.thumb_drag = Some(ThumbDrag {
                    axis: Axis::Horizontal,
                    last: point,
                });
            } else {
                let page = self.content.node().world_screen_width();
                let left = self.content.left();
                let sign = if point.x > self.thumb_x.start { 1.0 } else { -1.0 };
                self.content.set_left(left + sign * page);
                self.refresh();
            }
            return true;
        }
        if self.vertical && point.x > box_width - scrollbar_size {
            if self.thumb_y.contains(point.y) {
                self.thumb_drag = Some(ThumbDrag {
                    axis: Axis::Vertical,
                    last: point,
                });
            } else {
                let page = self.content.node().world_screen_height();
                let top = self.content.top();
                let sign = if point.y > self.thumb_y.start { 1.0 } else { -1.0 };
                self.content.set_top(top + sign * page);
                self.refresh();
            }
            return true;
        }
        false
    }

    /// Handles a move, dragging the thumb if one is held.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        if let Some(drag) = &mut self.thumb_drag {
            let delta = event.position - drag.last;
            drag.last = event.position;
            match drag.axis {
                Axis::Horizontal => {
                    let left = self.content.left();
                    self.content.set_left(left + delta.x);
                }
                Axis::Vertical => {
                    let top = self.content.top();
                    self.content.set_top(top + delta.y);
                }
            }
            self.refresh();
            return self.options.stop_propagation;
        }
        let stop = self.content.pointer_move(event);
        self.sync();
        stop
    }

    /// Handles a release, ending any thumb drag.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        self.thumb_drag = None;
        let stop = self.content.pointer_up(event);
        self.sync();
        stop
    }

    /// Handles a cancelled pointer.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> bool {
        self.thumb_drag = None;
        let stop = self.content.pointer_cancel(event);
        self.sync();
        stop
    }

    /// Handles a wheel event. Returns whether the host should prevent the
    /// default wheel action.
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        let prevent = self.content.wheel(event);
        self.sync();
        prevent
    }

    // Geometry

    /// Width of the box, scrollbar included.
    #[must_use]
    pub fn box_width(&self) -> f64 {
        self.options.box_width
    }

    /// Height of the box, scrollbar included.
    #[must_use]
    pub fn box_height(&self) -> f64 {
        self.options.box_height
    }

    /// Changes the box width without scaling the content.
    pub fn set_box_width(&mut self, width: f64) {
        self.options.box_width = width;
        self.content
            .resize(width, self.options.box_height, None, None);
        self.refresh();
    }

    /// Changes the box height without scaling the content.
    pub fn set_box_height(&mut self, height: f64) {
        self.options.box_height = height;
        self.content
            .resize(self.options.box_width, height, None, None);
        self.refresh();
    }

    /// Resizes the box and optionally pins the scrollable extents.
    pub fn resize(
        &mut self,
        box_width: f64,
        box_height: f64,
        scroll_width: Option<f64>,
        scroll_height: Option<f64>,
    ) {
        self.options.box_width = box_width;
        self.options.box_height = box_height;
        if scroll_width.is_some() {
            self.scroll_width = scroll_width;
        }
        if scroll_height.is_some() {
            self.scroll_height = scroll_height;
        }
        let (width, height) = (self.scroll_width(), self.scroll_height());
        self.content
            .resize(box_width, box_height, Some(width), Some(height));
        self.refresh();
    }

    /// Box width less the vertical scrollbar, if shown.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        let bar = if self.vertical {
            self.options.scrollbar_size
        } else {
            0.0
        };
        self.options.box_width - bar
    }

    /// Box height less the horizontal scrollbar, if shown.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        let bar = if self.horizontal {
            self.options.scrollbar_size
        } else {
            0.0
        };
        self.options.box_height - bar
    }

    /// Scrollable width: the pinned value, or the content's scaled width.
    #[must_use]
    pub fn scroll_width(&self) -> f64 {
        self.scroll_width
            .unwrap_or_else(|| self.content.node().width())
    }

    /// Scrollable height: the pinned value, or the content's scaled height.
    #[must_use]
    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
            .unwrap_or_else(|| self.content.node().height())
    }

    /// Pins or unpins the scrollable width.
    pub fn set_scroll_width(&mut self, width: Option<f64>) {
        self.scroll_width = width;
    }

    /// Pins or unpins the scrollable height.
    pub fn set_scroll_height(&mut self, height: Option<f64>) {
        self.scroll_height = height;
    }

    /// Content coordinate at the left edge of the box.
    #[must_use]
    pub fn scroll_left(&self) -> f64 {
        self.content.left()
    }

    /// Content coordinate at the top edge of the box.
    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.content.top()
    }

    /// Scrolls the minimum needed to show `rect`, in content coordinates.
    pub fn ensure_visible(&mut self, rect: Rect) {
        self.content.ensure_visible(rect);
        self.moved.set(false);
        self.layout();
    }

    // Scrollbars

    /// Whether the horizontal scrollbar is shown.
    #[must_use]
    pub fn is_scrollbar_horizontal(&self) -> bool {
        self.horizontal
    }

    /// Whether the vertical scrollbar is shown.
    #[must_use]
    pub fn is_scrollbar_vertical(&self) -> bool {
        self.vertical
    }

    /// Geometry of the horizontal scrollbar, if shown.
    #[must_use]
    pub fn horizontal_scrollbar(&self) -> Option<Scrollbar> {
        if !self.horizontal {
            return None;
        }
        let size = self.options.scrollbar_size;
        let y = self.options.box_height - size + self.options.scrollbar_offset_horizontal;
        let thumb = self.thumb_x;
        Some(Scrollbar {
            track: Rect::new(0.0, y, self.options.box_width, y + size),
            thumb: Rect::new(thumb.start, y, thumb.start + thumb.length, y + size),
        })
    }

    /// Geometry of the vertical scrollbar, if shown.
    #[must_use]
    pub fn vertical_scrollbar(&self) -> Option<Scrollbar> {
        if !self.vertical {
            return None;
        }
        let size = self.options.scrollbar_size;
        let x = self.options.box_width - size + self.options.scrollbar_offset_vertical;
        let thumb = self.thumb_y;
        Some(Scrollbar {
            track: Rect::new(x, 0.0, x + size, self.options.box_height),
            thumb: Rect::new(x, thumb.start, x + size, thumb.start + thumb.length),
        })
    }

    /// Opacity to draw the scrollbars with; below 1 only while fading.
    #[must_use]
    pub fn scrollbar_alpha(&self) -> f64 {
        self.alpha
    }

    /// Sets the scrollbar thickness.
    pub fn set_scrollbar_size(&mut self, size: f64) {
        self.options.scrollbar_size = size;
        self.refresh();
    }

    /// Sets the policy for both scrollbars.
    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.options.overflow_x = overflow;
        self.options.overflow_y = overflow;
        self.refresh();
    }

    /// Sets the horizontal scrollbar policy.
    pub fn set_overflow_x(&mut self, overflow: Overflow) {
        self.options.overflow_x = overflow;
        self.refresh();
    }

    /// Sets the vertical scrollbar policy.
    pub fn set_overflow_y(&mut self, overflow: Overflow) {
        self.options.overflow_y = overflow;
        self.refresh();
    }

    /// Turns content dragging on or off.
    pub fn set_drag_scroll(&mut self, drag_scroll: bool) {
        self.options.drag_scroll = drag_scroll;
        if !drag_scroll {
            self.content.remove_plugin(PluginName::Drag);
        }
        self.refresh();
    }

    // State

    /// Whether the box is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables the box: scrollbars are hidden and every event goes to the
    /// content.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            self.disabled = disabled;
            tracing::debug!(disabled, "scrollbox disabled changed");
            self.refresh();
        }
    }

    /// Whether the content needs redrawing.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.content.is_dirty()
    }

    /// Sets or clears the dirty flag, typically after rendering.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.content.set_dirty(dirty);
    }
}
