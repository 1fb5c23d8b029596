// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// The transformable node a viewport drives.
///
/// `ViewportNode` holds the camera's position (the screen offset of the world
/// origin) and per-axis scale, together with the on-screen size of the
/// viewport and the logical world size. Everything else is derived:
/// - world-space screen edges ([`left`](Self::left), [`right`](Self::right),
///   [`top`](Self::top), [`bottom`](Self::bottom)),
/// - [`center`](Self::center) and [`corner`](Self::corner),
/// - the screen size in world units and the world size in screen units.
///
/// Plugins mutate the node directly; none of the setters here notify other
/// plugins. The viewport facade and plugin context wrap the setters that
/// must trigger a plugin reset.
#[derive(Clone, Debug)]
pub struct ViewportNode {
    position: Vec2,
    scale: Vec2,
    screen_size: Size,
    world_width: Option<f64>,
    world_height: Option<f64>,
    content_size: Size,
    parent_transform: Affine,
    hit_area: Rect,
    visible: bool,
    local_to_global: Affine,
    global_to_local: Affine,
}

/// Out-of-bounds state of a node relative to its world size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutOfBounds {
    /// The visible area extends past the world's left edge.
    pub left: bool,
    /// The visible area extends past the world's right edge.
    pub right: bool,
    /// The visible area extends past the world's top edge.
    pub top: bool,
    /// The visible area extends past the world's bottom edge.
    pub bottom: bool,
    /// Scaled world size minus screen size: the position magnitude that puts
    /// the world's bottom-right corner at the screen's bottom-right.
    pub corner_point: Point,
}

impl ViewportNode {
    /// Creates a node for a viewport of `screen_size` at unit scale.
    ///
    /// World width and height default to the content size until set.
    #[must_use]
    pub fn new(screen_size: Size) -> Self {
        let mut node = Self {
            position: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            screen_size,
            world_width: None,
            world_height: None,
            content_size: Size::ZERO,
            parent_transform: Affine::IDENTITY,
            hit_area: Rect::ZERO,
            visible: true,
            local_to_global: Affine::IDENTITY,
            global_to_local: Affine::IDENTITY,
        };
        node.rebuild_transforms();
        node
    }

    /// Screen offset of the world origin.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Sets the screen offset of the world origin.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rebuild_transforms();
    }

    /// Horizontal position.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Sets the horizontal position.
    pub fn set_x(&mut self, x: f64) {
        self.position.x = x;
        self.rebuild_transforms();
    }

    /// Vertical position.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Sets the vertical position.
    pub fn set_y(&mut self, y: f64) {
        self.position.y = y;
        self.rebuild_transforms();
    }

    /// Translates the position by `delta` screen units.
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Per-axis scale (screen units per world unit).
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sets the per-axis scale.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.rebuild_transforms();
    }

    /// Sets the horizontal scale.
    pub fn set_scale_x(&mut self, x: f64) {
        self.scale.x = x;
        self.rebuild_transforms();
    }

    /// Sets the vertical scale.
    pub fn set_scale_y(&mut self, y: f64) {
        self.scale.y = y;
        self.rebuild_transforms();
    }

    /// On-screen size of the viewport.
    #[must_use]
    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    /// Sets the on-screen size of the viewport.
    pub fn set_screen_size(&mut self, size: Size) {
        self.screen_size = size;
    }

    /// On-screen width of the viewport.
    #[must_use]
    pub fn screen_width(&self) -> f64 {
        self.screen_size.width
    }

    /// On-screen height of the viewport.
    #[must_use]
    pub fn screen_height(&self) -> f64 {
        self.screen_size.height
    }

    /// Unscaled bounding size of the node's content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Sets the unscaled bounding size of the node's content.
    ///
    /// Hosts call this when the scene below the viewport changes size.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    /// Content width at the current scale.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.content_size.width * self.scale.x
    }

    /// Content height at the current scale.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.content_size.height * self.scale.y
    }

    /// World width: the explicit value, or the content width when unset.
    #[must_use]
    pub fn world_width(&self) -> f64 {
        self.world_width.unwrap_or(self.content_size.width)
    }

    /// World height: the explicit value, or the content height when unset.
    #[must_use]
    pub fn world_height(&self) -> f64 {
        self.world_height.unwrap_or(self.content_size.height)
    }

    /// The explicitly configured world width, if any.
    #[must_use]
    pub fn explicit_world_width(&self) -> Option<f64> {
        self.world_width
    }

    /// The explicitly configured world height, if any.
    #[must_use]
    pub fn explicit_world_height(&self) -> Option<f64> {
        self.world_height
    }

    /// Sets or clears the explicit world width.
    pub fn set_world_width(&mut self, width: Option<f64>) {
        self.world_width = width;
    }

    /// Sets or clears the explicit world height.
    pub fn set_world_height(&mut self, height: Option<f64>) {
        self.world_height = height;
    }

    /// Screen width expressed in world units.
    #[must_use]
    pub fn world_screen_width(&self) -> f64 {
        self.screen_size.width / self.scale.x
    }

    /// Screen height expressed in world units.
    #[must_use]
    pub fn world_screen_height(&self) -> f64 {
        self.screen_size.height / self.scale.y
    }

    /// World width expressed in screen units.
    #[must_use]
    pub fn screen_world_width(&self) -> f64 {
        self.world_width() * self.scale.x
    }

    /// World height expressed in screen units.
    #[must_use]
    pub fn screen_world_height(&self) -> f64 {
        self.world_height() * self.scale.y
    }

    /// World coordinate of the screen's left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        -self.position.x / self.scale.x
    }

    /// World coordinate of the screen's right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left() + self.world_screen_width()
    }

    /// World coordinate of the screen's top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        -self.position.y / self.scale.y
    }

    /// World coordinate of the screen's bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top() + self.world_screen_height()
    }

    /// Moves so the screen's left edge shows world coordinate `value`.
    pub fn set_left(&mut self, value: f64) {
        self.set_x(-value * self.scale.x);
    }

    /// Moves so the screen's right edge shows world coordinate `value`.
    pub fn set_right(&mut self, value: f64) {
        self.set_x(-value * self.scale.x + self.screen_size.width);
    }

    /// Moves so the screen's top edge shows world coordinate `value`.
    pub fn set_top(&mut self, value: f64) {
        self.set_y(-value * self.scale.y);
    }

    /// Moves so the screen's bottom edge shows world coordinate `value`.
    pub fn set_bottom(&mut self, value: f64) {
        self.set_y(-value * self.scale.y + self.screen_size.height);
    }

    /// World coordinate shown at the center of the screen.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.world_screen_width() / 2.0 - self.position.x / self.scale.x,
            self.world_screen_height() / 2.0 - self.position.y / self.scale.y,
        )
    }

    /// Moves so the center of the screen shows world point `center`.
    pub fn set_center(&mut self, center: Point) {
        self.set_position(Vec2::new(
            (self.world_screen_width() / 2.0 - center.x) * self.scale.x,
            (self.world_screen_height() / 2.0 - center.y) * self.scale.y,
        ));
    }

    /// World coordinate shown at the top-left of the screen.
    #[must_use]
    pub fn corner(&self) -> Point {
        Point::new(
            -self.position.x / self.scale.x,
            -self.position.y / self.scale.y,
        )
    }

    /// Moves so the top-left of the screen shows world point `corner`.
    pub fn set_corner(&mut self, corner: Point) {
        self.set_position(Vec2::new(
            -corner.x * self.scale.x,
            -corner.y * self.scale.y,
        ));
    }

    /// The visible world rectangle.
    #[must_use]
    pub fn visible_bounds(&self) -> Rect {
        let left = self.left();
        let top = self.top();
        Rect::new(
            left,
            top,
            left + self.world_screen_width(),
            top + self.world_screen_height(),
        )
    }

    /// Out-of-bounds test against the world size.
    #[must_use]
    pub fn oob(&self) -> OutOfBounds {
        let world_width = self.world_width();
        let world_height = self.world_height();
        OutOfBounds {
            left: self.left() < 0.0,
            right: self.right() > world_width,
            top: self.top() < 0.0,
            bottom: self.bottom() > world_height,
            corner_point: Point::new(
                world_width * self.scale.x - self.screen_size.width,
                world_height * self.scale.y - self.screen_size.height,
            ),
        }
    }

    /// Transform of the node's parent in global space.
    #[must_use]
    pub fn parent_transform(&self) -> Affine {
        self.parent_transform
    }

    /// Sets the transform of the node's parent in global space.
    pub fn set_parent_transform(&mut self, transform: Affine) {
        self.parent_transform = transform;
        self.rebuild_transforms();
    }

    /// Maps a global (screen) point into the node's local (world) space.
    #[must_use]
    pub fn to_local(&self, global: Point) -> Point {
        self.global_to_local * global
    }

    /// Maps a local (world) point into global (screen) space.
    #[must_use]
    pub fn to_global(&self, local: Point) -> Point {
        self.local_to_global * local
    }

    /// Local to global transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.local_to_global
    }

    /// Region, in world coordinates, that accepts hits.
    #[must_use]
    pub fn hit_area(&self) -> Rect {
        self.hit_area
    }

    /// Sets the region, in world coordinates, that accepts hits.
    pub fn set_hit_area(&mut self, hit_area: Rect) {
        self.hit_area = hit_area;
    }

    /// Whether the node is shown; hidden nodes ignore input.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the node.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn rebuild_transforms(&mut self) {
        // Local → global: scale into screen units, translate by position, then
        // apply the parent's transform.
        self.local_to_global = self.parent_transform
            * Affine::translate(self.position)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y);
        self.global_to_local = self.local_to_global.inverse();
    }
}
