// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scrollbox --heading-base-level=0

//! Understory Scrollbox: a headless scroll box built on `understory_viewport`.
//!
//! A [`Scrollbox`] is a fixed-size box whose content lives in a
//! [`Viewport`](understory_viewport::Viewport). It decides which scrollbars
//! to show from its [`Overflow`] policies, computes their track and thumb
//! rectangles, and routes pointer input:
//! - A press on a thumb drags it, moving the content by the pointer delta.
//! - A press elsewhere on a track pages the content by one box.
//! - Everything else goes to the content viewport, which drags, flings and
//!   clamps along the scrollable axes.
//!
//! Optionally the scrollbars fade out after the content has been idle for a
//! while; [`Scrollbox::scrollbar_alpha`] gives the opacity to draw them with.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_scrollbox::{Scrollbox, ScrollboxOptions};
//! use understory_viewport::PointerEvent;
//!
//! let mut scrollbox = Scrollbox::new(ScrollboxOptions {
//!     box_width: 200.0,
//!     box_height: 100.0,
//!     ..ScrollboxOptions::default()
//! });
//! scrollbox.set_content_size(Size::new(200.0, 1000.0));
//! assert!(scrollbox.is_scrollbar_vertical());
//! assert!(!scrollbox.is_scrollbar_horizontal());
//!
//! // Drag the content up by 40 pixels.
//! let press = PointerEvent::mouse(Point::new(50.0, 80.0));
//! scrollbox.pointer_down(&press);
//! scrollbox.pointer_move(&press.at(Point::new(50.0, 40.0)));
//! scrollbox.pointer_up(&press.at(Point::new(50.0, 40.0)));
//! assert_eq!(scrollbox.scroll_top(), 40.0);
//!
//! let bar = scrollbox.vertical_scrollbar().unwrap();
//! assert_eq!(bar.thumb.y0, 4.0);
//! ```
//!
//! ## Configuration
//!
//! With the `serde` feature, [`ScrollboxOptions`] deserializes from
//! configuration files, with [`Overflow`] policies read from their names.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod options;
mod scrollbox;

pub use options::{Overflow, ScrollboxOptions};
pub use scrollbox::{Scrollbar, Scrollbox};
