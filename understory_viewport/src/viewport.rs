// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewport facade: owns the node, input, plugins and listeners.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};

use crate::event::{EventQueue, ViewportEvent};
use crate::input::InputManager;
use crate::node::{OutOfBounds, ViewportNode};
use crate::plugin::{AnyPlugin, Plugin, PluginName};
use crate::plugins::{
    Bounce, BounceOptions, Clamp, ClampOptions, ClampZoom, ClampZoomOptions, Decelerate,
    DecelerateOptions, Drag, DragOptions, Follow, FollowOptions, FollowTarget, MouseEdges,
    MouseEdgesOptions, Pinch, PinchOptions, Snap, SnapOptions, SnapZoom, SnapZoomOptions, Wheel,
    WheelOptions,
};
use crate::pointer::{PointerEvent, WheelEvent};
use crate::registry::{Context, PluginRegistry};

/// Options for [`Viewport`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ViewportOptions {
    /// Width of the viewport on screen.
    pub screen_width: f64,
    /// Height of the viewport on screen.
    pub screen_height: f64,
    /// World width; `None` uses the content width.
    pub world_width: Option<f64>,
    /// World height; `None` uses the content height.
    pub world_height: Option<f64>,
    /// Pointer travel, in screen pixels, that turns a press into a drag.
    pub threshold: f64,
    /// Never ask the host to prevent the default wheel action.
    pub passive_wheel: bool,
    /// Ask the host to stop propagation of pointer events a plugin consumed.
    pub stop_propagation: bool,
    /// Fixed hit area in world coordinates; `None` tracks the visible bounds.
    pub force_hit_area: Option<Rect>,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            world_width: None,
            world_height: None,
            threshold: 5.0,
            passive_wheel: true,
            stop_propagation: false,
            force_hit_area: None,
        }
    }
}

/// Handle returned by [`Viewport::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ViewportEvent)>;

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameState {
    position: Vec2,
    scale: Vec2,
}

/// A pannable, zoomable 2D camera driven by pointer input and plugins.
///
/// Feed it pointer and wheel events plus one [`update`](Self::update) per
/// frame; read the transform back from [`node`](Self::node). Events raised
/// while handling a call are delivered to subscribers before the call
/// returns.
///
/// ```
/// use kurbo::Point;
/// use understory_viewport::{
///     ClampOptions, DecelerateOptions, DragOptions, PointerEvent, Viewport, ViewportOptions,
/// };
///
/// let mut viewport = Viewport::new(ViewportOptions {
///     world_width: Some(2000.0),
///     world_height: Some(2000.0),
///     ..ViewportOptions::default()
/// });
/// viewport
///     .drag(DragOptions::default())
///     .decelerate(DecelerateOptions::default())
///     .clamp(ClampOptions::default());
///
/// let down = PointerEvent::mouse(Point::new(400.0, 300.0));
/// viewport.pointer_down(&down);
/// viewport.pointer_move(&down.at(Point::new(300.0, 250.0)));
/// viewport.pointer_up(&down.at(Point::new(300.0, 250.0)));
/// assert_eq!(viewport.corner(), Point::new(100.0, 50.0));
/// ```
pub struct Viewport {
    options: ViewportOptions,
    node: ViewportNode,
    input: InputManager,
    plugins: PluginRegistry,
    events: EventQueue,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    paused: bool,
    last_frame: Option<FrameState>,
    moving: bool,
    zooming: bool,
    dirty: bool,
    clock: f64,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("options", &self.options)
            .field("node", &self.node)
            .field("input", &self.input)
            .field("plugins", &self.plugins)
            .field("listeners", &self.listeners.len())
            .field("paused", &self.paused)
            .field("dirty", &self.dirty)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportOptions::default())
    }
}

impl Viewport {
    /// Creates a viewport with no plugins.
    #[must_use]
    pub fn new(options: ViewportOptions) -> Self {
        let mut node = ViewportNode::new(Size::new(options.screen_width, options.screen_height));
        node.set_world_width(options.world_width);
        node.set_world_height(options.world_height);
        let hit_area = options
            .force_hit_area
            .unwrap_or_else(|| Rect::new(0.0, 0.0, node.world_width(), node.world_height()));
        node.set_hit_area(hit_area);
        Self {
            options,
            node,
            input: InputManager::new(options.threshold),
            plugins: PluginRegistry::new(),
            events: EventQueue::default(),
            listeners: Vec::new(),
            next_listener: 0,
            paused: false,
            last_frame: None,
            moving: false,
            zooming: false,
            dirty: false,
            clock: 0.0,
        }
    }

    /// Options the viewport was created with.
    #[must_use]
    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// The transform node.
    #[must_use]
    pub fn node(&self) -> &ViewportNode {
        &self.node
    }

    /// Pointer state.
    #[must_use]
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Registered plugins.
    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Registered plugins, mutably, for typed access such as
    /// `plugins_mut().decelerate_mut()`.
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Viewport clock in milliseconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock
    }

    fn cx(&mut self) -> Context<'_> {
        Context::new(
            &mut self.node,
            &mut self.input,
            &mut self.plugins,
            &mut self.events,
            self.clock,
        )
    }

    fn accepts_input(&self) -> bool {
        !self.paused && self.node.is_visible()
    }

    /// Delivers queued events to listeners.
    fn flush(&mut self) {
        for event in self.events.drain() {
            tracing::trace!(%event, "viewport event");
            for (_, listener) in &mut self.listeners {
                listener(&event);
            }
        }
    }

    // Input

    /// Handles a pointer press.
    ///
    /// Returns whether the host should stop propagating the event: a plugin
    /// consumed it and `stop_propagation` is set.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let busy = self.plugins.decelerate().is_some_and(Decelerate::is_active)
            || self.plugins.bounce().is_some_and(Bounce::is_active);
        self.input.press(event, !busy);
        let consumed = self
            .cx()
            .dispatch(|plugin, cx| plugin.pointer_down(cx, event));
        self.flush();
        consumed && self.options.stop_propagation
    }

    /// Handles a pointer move. Returns like [`pointer_down`](Self::pointer_down).
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let consumed = self
            .cx()
            .dispatch(|plugin, cx| plugin.pointer_move(cx, event));
        self.input.track_move(event);
        self.flush();
        consumed && self.options.stop_propagation
    }

    /// Handles a pointer release, reporting a click if the press qualified.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.input.release(event);
        let consumed = self
            .cx()
            .dispatch(|plugin, cx| plugin.pointer_up(cx, event));
        if let Some(screen) = self.input.take_click() {
            let world = self.node.to_local(screen);
            self.events.push(ViewportEvent::Clicked { screen, world });
        }
        self.flush();
        consumed && self.options.stop_propagation
    }

    /// Handles a cancelled pointer (also used for up-outside and pointer-out).
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> bool {
        self.pointer_up(event)
    }

    /// Handles a wheel event if the pointer is over the viewport.
    ///
    /// Returns whether the host should prevent the default wheel action.
    pub fn wheel(&mut self, event: &WheelEvent) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let point = self.node.to_local(event.position);
        let inside = self.node.left() <= point.x
            && point.x <= self.node.right()
            && self.node.top() <= point.y
            && point.y <= self.node.bottom();
        if !inside {
            return false;
        }
        let consumed = self.cx().dispatch(|plugin, cx| plugin.wheel(cx, event));
        self.flush();
        consumed && !self.options.passive_wheel
    }

    // Frame

    /// Advances every plugin by `elapsed` milliseconds.
    ///
    /// Also detects when motion or zoom stops, refreshes the hit area and
    /// the dirty flag, then emits `frame-end`. Does nothing while paused.
    pub fn update(&mut self, elapsed: f64) {
        if self.paused {
            return;
        }
        self.clock += elapsed;
        self.cx().dispatch(|plugin, cx| {
            plugin.update(cx, elapsed);
            false
        });

        let frame = FrameState {
            position: self.node.position(),
            scale: self.node.scale(),
        };
        if let Some(last) = self.last_frame {
            if last.position != frame.position {
                self.moving = true;
            } else if self.moving {
                self.moving = false;
                self.events.push(ViewportEvent::MovedEnd);
            }
            if last.scale != frame.scale {
                self.zooming = true;
            } else if self.zooming {
                self.zooming = false;
                self.events.push(ViewportEvent::ZoomedEnd);
            }
        }
        if self.options.force_hit_area.is_none() {
            let bounds = self.node.visible_bounds();
            self.node.set_hit_area(bounds);
        }
        self.dirty |= self.last_frame != Some(frame);
        self.last_frame = Some(frame);
        self.events.push(ViewportEvent::FrameEnd);
        self.flush();
    }

    /// Changes the screen size and, when given, the world size, then lets
    /// every plugin recompute.
    pub fn resize(
        &mut self,
        screen_width: f64,
        screen_height: f64,
        world_width: Option<f64>,
        world_height: Option<f64>,
    ) {
        self.node
            .set_screen_size(Size::new(screen_width, screen_height));
        if world_width.is_some() {
            self.node.set_world_width(world_width);
        }
        if world_height.is_some() {
            self.node.set_world_height(world_height);
        }
        tracing::debug!(screen_width, screen_height, ?world_width, ?world_height, "viewport resized");
        self.resize_plugins();
    }

    fn resize_plugins(&mut self) {
        self.cx().dispatch(|plugin, cx| {
            plugin.resize(cx);
            false
        });
        self.flush();
    }

    /// Whether input and frame updates are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspends or resumes the viewport. Pausing forgets all pointers.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.last_frame = None;
        self.moving = false;
        self.zooming = false;
        if paused {
            self.input.pause();
        }
        tracing::debug!(paused, "viewport pause changed");
    }

    /// Shows or hides the viewport; hidden viewports ignore input.
    pub fn set_visible(&mut self, visible: bool) {
        self.node.set_visible(visible);
    }

    /// Whether the transform changed since the flag was last cleared.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sets or clears the dirty flag, typically after rendering.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    // Plugins

    /// Registers a plugin, replacing any plugin with the same name.
    ///
    /// With `index`, the plugin's name moves to that dispatch position.
    pub fn add_plugin(&mut self, plugin: impl Into<AnyPlugin>, index: Option<usize>) -> &mut Self {
        let plugin = plugin.into();
        let name = plugin.name();
        if let Some(mut replaced) = self.plugins.insert(plugin, index) {
            replaced.destroy();
        }
        self.cx().with_plugin(name, |plugin, cx| plugin.added(cx));
        self.flush();
        self
    }

    /// Registers a user plugin under `name`.
    pub fn add_custom(
        &mut self,
        name: &'static str,
        plugin: impl Plugin + 'static,
        index: Option<usize>,
    ) -> &mut Self {
        self.add_plugin(AnyPlugin::custom(name, plugin), index)
    }

    /// Removes a plugin, emitting `<name>-remove`. Returns whether it existed.
    pub fn remove_plugin(&mut self, name: PluginName) -> bool {
        let removed = self.cx().remove_plugin(name);
        self.flush();
        removed
    }

    /// Suspends a plugin without removing it.
    pub fn pause_plugin(&mut self, name: PluginName) {
        self.plugins.pause(name);
    }

    /// Resumes a paused plugin.
    pub fn resume_plugin(&mut self, name: PluginName) {
        self.plugins.resume(name);
    }

    /// Adds [`Drag`].
    pub fn drag(&mut self, options: DragOptions) -> &mut Self {
        self.add_plugin(Drag::new(options), None)
    }

    /// Adds [`Pinch`].
    pub fn pinch(&mut self, options: PinchOptions) -> &mut Self {
        self.add_plugin(Pinch::new(options), None)
    }

    /// Adds [`Wheel`].
    pub fn wheel_zoom(&mut self, options: WheelOptions) -> &mut Self {
        self.add_plugin(Wheel::new(options), None)
    }

    /// Adds [`Decelerate`].
    pub fn decelerate(&mut self, options: DecelerateOptions) -> &mut Self {
        self.add_plugin(Decelerate::new(options), None)
    }

    /// Adds [`Bounce`].
    pub fn bounce(&mut self, options: BounceOptions) -> &mut Self {
        self.add_plugin(Bounce::new(options), None)
    }

    /// Adds [`Clamp`].
    pub fn clamp(&mut self, options: ClampOptions) -> &mut Self {
        self.add_plugin(Clamp::new(options), None)
    }

    /// Adds [`ClampZoom`].
    pub fn clamp_zoom(&mut self, options: ClampZoomOptions) -> &mut Self {
        self.add_plugin(ClampZoom::new(options), None)
    }

    /// Adds [`Snap`] toward world point `(x, y)`.
    pub fn snap(&mut self, x: f64, y: f64, options: SnapOptions) -> &mut Self {
        self.add_plugin(Snap::new(Point::new(x, y), options), None)
    }

    /// Adds [`SnapZoom`].
    pub fn snap_zoom(&mut self, options: SnapZoomOptions) -> &mut Self {
        self.add_plugin(SnapZoom::new(options), None)
    }

    /// Adds [`Follow`] for `target`.
    pub fn follow(&mut self, target: impl FollowTarget + 'static, options: FollowOptions) -> &mut Self {
        self.add_plugin(Follow::new(target, options), None)
    }

    /// Adds [`MouseEdges`].
    pub fn mouse_edges(&mut self, options: MouseEdgesOptions) -> &mut Self {
        self.add_plugin(MouseEdges::new(options), None)
    }

    // Events

    /// Calls `listener` with every event the viewport emits from now on.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewportEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drops a listener. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    // Geometry

    /// Maps a screen point to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        self.node.to_local(screen)
    }

    /// Maps a world point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        self.node.to_global(world)
    }

    /// The visible world rectangle.
    #[must_use]
    pub fn visible_bounds(&self) -> Rect {
        self.node.visible_bounds()
    }

    /// World point at the center of the screen.
    #[must_use]
    pub fn center(&self) -> Point {
        self.node.center()
    }

    /// Centers the screen on a world point.
    pub fn move_center(&mut self, center: Point) -> &mut Self {
        self.cx().move_center(center);
        self.dirty = true;
        self.flush();
        self
    }

    /// World point at the top-left of the screen.
    #[must_use]
    pub fn corner(&self) -> Point {
        self.node.corner()
    }

    /// Puts a world point at the top-left of the screen.
    pub fn move_corner(&mut self, corner: Point) -> &mut Self {
        self.cx().move_corner(corner);
        self.dirty = true;
        self.flush();
        self
    }

    /// World coordinate at the left edge of the screen.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.node.left()
    }

    /// World coordinate at the right edge of the screen.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.node.right()
    }

    /// World coordinate at the top edge of the screen.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.node.top()
    }

    /// World coordinate at the bottom edge of the screen.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.node.bottom()
    }

    /// Moves so the left edge shows `value`, then resets the plugins.
    pub fn set_left(&mut self, value: f64) {
        self.node.set_left(value);
        self.reset_plugins();
    }

    /// Moves so the right edge shows `value`, then resets the plugins.
    pub fn set_right(&mut self, value: f64) {
        self.node.set_right(value);
        self.reset_plugins();
    }

    /// Moves so the top edge shows `value`, then resets the plugins.
    pub fn set_top(&mut self, value: f64) {
        self.node.set_top(value);
        self.reset_plugins();
    }

    /// Moves so the bottom edge shows `value`, then resets the plugins.
    pub fn set_bottom(&mut self, value: f64) {
        self.node.set_bottom(value);
        self.reset_plugins();
    }

    fn reset_plugins(&mut self) {
        self.cx().reset();
        self.flush();
    }

    /// World width: explicit if set, otherwise the content width.
    #[must_use]
    pub fn world_width(&self) -> f64 {
        self.node.world_width()
    }

    /// World height: explicit if set, otherwise the content height.
    #[must_use]
    pub fn world_height(&self) -> f64 {
        self.node.world_height()
    }

    /// Sets or clears the explicit world width and lets plugins recompute.
    pub fn set_world_width(&mut self, width: Option<f64>) {
        self.node.set_world_width(width);
        self.resize_plugins();
    }

    /// Sets or clears the explicit world height and lets plugins recompute.
    pub fn set_world_height(&mut self, height: Option<f64>) {
        self.node.set_world_height(height);
        self.resize_plugins();
    }

    /// Sets the unscaled size of the viewport's content.
    pub fn set_content_size(&mut self, size: Size) {
        self.node.set_content_size(size);
    }

    /// Out-of-bounds flags and the bottom-right corner point.
    #[must_use]
    pub fn oob(&self) -> OutOfBounds {
        self.node.oob()
    }

    /// Applies a scale, then the zoom limits, optionally keeping the center.
    fn apply_scale(&mut self, scale: Vec2, keep_center: bool, clamp: bool) {
        let center = self.node.center();
        self.node.set_scale(scale);
        let mut cx = self.cx();
        if clamp {
            cx.clamp_zoom();
        }
        if keep_center {
            cx.move_center(center);
            self.dirty = true;
        }
        self.flush();
    }

    /// Zooms so `width` world units fill the screen width, both axes alike.
    pub fn fit_width(&mut self, width: f64, keep_center: bool) -> &mut Self {
        let x = self.node.screen_width() / width;
        self.apply_scale(Vec2::new(x, x), keep_center, true);
        self
    }

    /// Zooms so `height` world units fill the screen height, both axes alike.
    pub fn fit_height(&mut self, height: f64, keep_center: bool) -> &mut Self {
        let y = self.node.screen_height() / height;
        self.apply_scale(Vec2::new(y, y), keep_center, true);
        self
    }

    /// Zooms so the whole world fits on screen.
    pub fn fit_world(&mut self, keep_center: bool) -> &mut Self {
        let size = Size::new(self.node.world_width(), self.node.world_height());
        self.fit(keep_center, size)
    }

    /// Zooms so a `size` area of the world fits on screen.
    pub fn fit(&mut self, keep_center: bool, size: Size) -> &mut Self {
        let scale = (self.node.screen_width() / size.width)
            .min(self.node.screen_height() / size.height);
        self.apply_scale(Vec2::new(scale, scale), keep_center, true);
        self
    }

    /// Sets a uniform zoom.
    pub fn set_zoom(&mut self, scale: f64, keep_center: bool) -> &mut Self {
        self.apply_scale(Vec2::new(scale, scale), keep_center, true);
        self
    }

    /// Zooms by a fraction of the current scale, e.g. `0.25` for 25% closer.
    pub fn zoom_percent(&mut self, percent: f64, keep_center: bool) -> &mut Self {
        let x = self.node.scale().x;
        self.set_zoom(x + x * percent, keep_center)
    }

    /// Widens (positive) or narrows (negative) the visible world by `change` units.
    pub fn zoom(&mut self, change: f64, keep_center: bool) -> &mut Self {
        let width = change + self.node.world_screen_width();
        self.fit_width(width, keep_center)
    }

    /// Horizontal scale.
    #[must_use]
    pub fn scaled(&self) -> f64 {
        self.node.scale().x
    }

    /// Sets a uniform zoom, keeping the center.
    pub fn set_scaled(&mut self, scale: f64) {
        self.set_zoom(scale, true);
    }

    /// Scrolls the minimum needed to show the world rectangle `rect`.
    pub fn ensure_visible(&mut self, rect: Rect) {
        let mut changed = false;
        if rect.x0 < self.node.left() {
            self.node.set_left(rect.x0);
            changed = true;
        } else if rect.x1 > self.node.right() {
            self.node.set_right(rect.x1);
            changed = true;
        }
        if rect.y0 < self.node.top() {
            self.node.set_top(rect.y0);
            changed = true;
        } else if rect.y1 > self.node.bottom() {
            self.node.set_bottom(rect.y1);
            changed = true;
        }
        if changed {
            self.reset_plugins();
        }
    }

    /// The pinned hit area, if any.
    #[must_use]
    pub fn force_hit_area(&self) -> Option<Rect> {
        self.options.force_hit_area
    }

    /// Pins the hit area, or with `None` returns it to the world rectangle
    /// until the next frame tracks the visible bounds again.
    pub fn set_force_hit_area(&mut self, area: Option<Rect>) {
        self.options.force_hit_area = area;
        let hit_area = area.unwrap_or_else(|| {
            Rect::new(0.0, 0.0, self.node.world_width(), self.node.world_height())
        });
        self.node.set_hit_area(hit_area);
    }
}
