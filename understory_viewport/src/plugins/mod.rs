// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in gesture and animation plugins.
//!
//! Gestures ([`Drag`], [`Pinch`], [`Wheel`], [`MouseEdges`]) react to input;
//! animations ([`Decelerate`], [`Bounce`], [`Snap`], [`SnapZoom`],
//! [`Follow`]) advance on every frame; constraints ([`Clamp`],
//! [`ClampZoom`]) correct the transform whenever it changes.

mod bounce;
mod clamp;
mod clamp_zoom;
mod decelerate;
mod drag;
mod follow;
mod mouse_edges;
mod pinch;
mod snap;
mod snap_zoom;
mod wheel;

pub use bounce::{Bounce, BounceOptions};
pub use clamp::{Clamp, ClampBound, ClampOptions};
pub use clamp_zoom::{ClampZoom, ClampZoomOptions};
pub use decelerate::{Decelerate, DecelerateOptions};
pub use drag::{Drag, DragOptions};
pub use follow::{Follow, FollowOptions, FollowTarget};
pub use mouse_edges::{MouseEdges, MouseEdgesOptions};
pub use pinch::{Pinch, PinchOptions};
pub use snap::{Snap, SnapOptions};
pub use snap_zoom::{SnapZoom, SnapZoomOptions};
pub use wheel::{Wheel, WheelOptions};
