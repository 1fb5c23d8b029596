// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_viewport --heading-base-level=0

//! Understory Viewport: a headless 2D camera driven by pointer input.
//!
//! A [`Viewport`] owns a pan/zoom transform ([`ViewportNode`]), tracks the
//! active pointers ([`InputManager`]) and runs an ordered pipeline of
//! plugins over every input event and every frame. Built-in plugins cover
//! the usual camera behaviors:
//! - Gestures: [`Drag`], [`Pinch`], [`Wheel`], [`MouseEdges`].
//! - Animations: [`Decelerate`], [`Bounce`], [`Snap`], [`SnapZoom`], [`Follow`].
//! - Constraints: [`Clamp`], [`ClampZoom`].
//!
//! Plugins run in a fixed priority order regardless of when they were
//! added: a drag sees each pointer first, a pinch takes over the gesture
//! once two pointers are down, and clamping runs after everything that
//! moves the camera. Hosts can register
//! their own [`Plugin`]s under a custom name.
//!
//! The crate does not render or own a scene. Callers:
//! - Translate platform pointer and wheel events into [`PointerEvent`] and
//!   [`WheelEvent`].
//! - Call [`Viewport::update`] once per frame with the elapsed milliseconds.
//! - Read the transform from [`Viewport::node`] and redraw when
//!   [`Viewport::is_dirty`] says so.
//! - Optionally [`subscribe`](Viewport::subscribe) to [`ViewportEvent`]s.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_viewport::{
//!     ClampOptions, DecelerateOptions, DragOptions, PointerEvent, Viewport, ViewportOptions,
//!     WheelOptions,
//! };
//!
//! let mut viewport = Viewport::new(ViewportOptions {
//!     world_width: Some(4000.0),
//!     world_height: Some(4000.0),
//!     ..ViewportOptions::default()
//! });
//! viewport
//!     .drag(DragOptions::default())
//!     .wheel_zoom(WheelOptions::default())
//!     .decelerate(DecelerateOptions::default())
//!     .clamp(ClampOptions::default());
//!
//! // A quick flick to the left.
//! let start = PointerEvent::mouse(Point::new(600.0, 300.0));
//! viewport.pointer_down(&start);
//! viewport.update(16.0);
//! viewport.pointer_move(&start.at(Point::new(550.0, 300.0)));
//! viewport.update(16.0);
//! viewport.pointer_move(&start.at(Point::new(500.0, 300.0)));
//! viewport.pointer_up(&start.at(Point::new(500.0, 300.0)));
//!
//! // The camera keeps gliding for a few frames after release.
//! let released = viewport.left();
//! for _ in 0..10 {
//!     viewport.update(16.0);
//! }
//! assert!(viewport.left() > released);
//!
//! // Cull against what is on screen.
//! let visible: Rect = viewport.visible_bounds();
//! assert!(visible.width() > 0.0);
//! ```
//!
//! ## Events
//!
//! Every entry point queues the [`ViewportEvent`]s raised while it runs and
//! hands them to subscribers before returning. Their [`Display`](core::fmt::Display)
//! form is the kebab-case event name (`"drag-start"`, `"moved"`, ...).
//!
//! ## Configuration
//!
//! With the `serde` feature, [`ViewportOptions`] and every plugin's options
//! deserialize from configuration files. Missing fields take their defaults,
//! and modes such as [`Direction`] or [`Ease`] are read from their names.
//!
//! ## Logging
//!
//! The crate logs through `tracing`: plugin lifecycle and animation
//! boundaries at `debug`/`trace`. Install a subscriber in the host to see them.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod ease;
mod event;
mod input;
mod modes;
mod node;
mod plugin;
mod plugins;
mod pointer;
mod registry;
mod viewport;

pub use ease::{Ease, EaseFn};
pub use event::{EventQueue, MoveKind, ViewportEvent, ZoomKind};
pub use input::{InputManager, Touch};
pub use modes::{Align, Direction, ParseOptionError, Sides, Underflow, WheelClamp};
pub use node::{OutOfBounds, ViewportNode};
pub use plugin::{AnyPlugin, Plugin, PluginName};
pub use plugins::{
    Bounce, BounceOptions, Clamp, ClampBound, ClampOptions, ClampZoom, ClampZoomOptions,
    Decelerate, DecelerateOptions, Drag, DragOptions, Follow, FollowOptions, FollowTarget,
    MouseEdges, MouseEdgesOptions, Pinch, PinchOptions, Snap, SnapOptions, SnapZoom,
    SnapZoomOptions, Wheel, WheelOptions,
};
pub use pointer::{
    DeltaMode, MouseButton, MouseButtons, PointerEvent, PointerId, PointerType, WheelEvent,
};
pub use registry::{Context, PluginRegistry};
pub use viewport::{ListenerId, Viewport, ViewportOptions};
