// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic events emitted by the viewport and its plugins.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::plugin::PluginName;

/// What moved the viewport, carried by [`ViewportEvent::Moved`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Pointer drag.
    Drag,
    /// Two-finger pinch (zoom anchor correction and two-finger pan).
    Pinch,
    /// Wheel zoom anchor correction.
    Wheel,
    /// Wheel used as a pan by the drag plugin.
    WheelScroll,
    /// Momentum after a fling.
    Decelerate,
    /// Horizontal bounce-back.
    BounceX,
    /// Vertical bounce-back.
    BounceY,
    /// Horizontal clamp correction.
    ClampX,
    /// Vertical clamp correction.
    ClampY,
    /// Snap animation.
    Snap,
    /// Follow plugin.
    Follow,
    /// Edge scrolling.
    MouseEdges,
}

impl MoveKind {
    /// The event `type` string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Pinch => "pinch",
            Self::Wheel => "wheel",
            Self::WheelScroll => "wheel-scroll",
            Self::Decelerate => "decelerate",
            Self::BounceX => "bounce-x",
            Self::BounceY => "bounce-y",
            Self::ClampX => "clamp-x",
            Self::ClampY => "clamp-y",
            Self::Snap => "snap",
            Self::Follow => "follow",
            Self::MouseEdges => "mouse-edges",
        }
    }
}

/// What zoomed the viewport, carried by [`ViewportEvent::Zoomed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomKind {
    /// Two-finger pinch.
    Pinch,
    /// Mouse wheel.
    Wheel,
    /// Zoom limits enforced.
    ClampZoom,
    /// Animated zoom.
    SnapZoom,
}

impl ZoomKind {
    /// The event `type` string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pinch => "pinch",
            Self::Wheel => "wheel",
            Self::ClampZoom => "clamp-zoom",
            Self::SnapZoom => "snap-zoom",
        }
    }
}

/// A semantic event. [`Display`](fmt::Display) yields the event name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// A press and release without movement past the threshold.
    Clicked {
        /// Anchor in screen coordinates.
        screen: Point,
        /// Anchor in world coordinates.
        world: Point,
    },
    /// A drag passed the threshold.
    DragStart {
        /// Pointer in screen coordinates.
        screen: Point,
        /// Pointer in world coordinates.
        world: Point,
    },
    /// A drag ended.
    DragEnd {
        /// Last pointer position in screen coordinates.
        screen: Point,
        /// Last pointer position in world coordinates.
        world: Point,
    },
    /// A plugin was removed from the registry.
    PluginRemoved(PluginName),
    /// Two touches started pinching.
    PinchStart,
    /// Pinching stopped.
    PinchEnd,
    /// Snap animation started.
    SnapStart,
    /// Snap animation finished.
    SnapEnd,
    /// Snap-zoom animation started.
    SnapZoomStart,
    /// Snap-zoom animation finished.
    SnapZoomEnd,
    /// Horizontal bounce-back started.
    BounceXStart,
    /// Horizontal bounce-back finished.
    BounceXEnd,
    /// Vertical bounce-back started.
    BounceYStart,
    /// Vertical bounce-back finished.
    BounceYEnd,
    /// Wheel zoom happened, with the raw deltas.
    Wheel {
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
        /// Depth delta.
        dz: f64,
    },
    /// The wheel was used to pan.
    WheelScroll,
    /// Edge scrolling started.
    MouseEdgeStart,
    /// Edge scrolling stopped.
    MouseEdgeEnd,
    /// The position changed.
    Moved {
        /// Cause of the move.
        kind: MoveKind,
        /// Position before a clamp correction.
        original: Option<Point>,
    },
    /// The position stopped changing.
    MovedEnd,
    /// The scale changed.
    Zoomed {
        /// Cause of the zoom.
        kind: ZoomKind,
    },
    /// The scale stopped changing.
    ZoomedEnd,
    /// A frame update finished.
    FrameEnd,
}

impl ViewportEvent {
    pub(crate) fn moved(kind: MoveKind) -> Self {
        Self::Moved {
            kind,
            original: None,
        }
    }
}

impl fmt::Display for ViewportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clicked { .. } => "clicked",
            Self::DragStart { .. } => "drag-start",
            Self::DragEnd { .. } => "drag-end",
            Self::PluginRemoved(name) => return write!(f, "{name}-remove"),
            Self::PinchStart => "pinch-start",
            Self::PinchEnd => "pinch-end",
            Self::SnapStart => "snap-start",
            Self::SnapEnd => "snap-end",
            Self::SnapZoomStart => "snap-zoom-start",
            Self::SnapZoomEnd => "snap-zoom-end",
            Self::BounceXStart => "bounce-x-start",
            Self::BounceXEnd => "bounce-x-end",
            Self::BounceYStart => "bounce-y-start",
            Self::BounceYEnd => "bounce-y-end",
            Self::Wheel { .. } => "wheel",
            Self::WheelScroll => "wheel-scroll",
            Self::MouseEdgeStart => "mouse-edge-start",
            Self::MouseEdgeEnd => "mouse-edge-end",
            Self::Moved { .. } => "moved",
            Self::MovedEnd => "moved-end",
            Self::Zoomed { .. } => "zoomed",
            Self::ZoomedEnd => "zoomed-end",
            Self::FrameEnd => "frame-end",
        };
        f.write_str(name)
    }
}

/// Events queued during one entry point, in emission order.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<ViewportEvent>,
}

impl EventQueue {
    /// Appends an event.
    pub fn push(&mut self, event: ViewportEvent) {
        self.events.push(event);
    }

    /// Queued events, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[ViewportEvent] {
        &self.events
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and yields every queued event.
    pub fn drain(&mut self) -> alloc::vec::Drain<'_, ViewportEvent> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn names_match_the_published_event_set() {
        assert_eq!(ViewportEvent::moved(MoveKind::Drag).to_string(), "moved");
        assert_eq!(
            ViewportEvent::PluginRemoved(PluginName::Snap).to_string(),
            "snap-remove"
        );
        assert_eq!(
            ViewportEvent::PluginRemoved(PluginName::MouseEdges).to_string(),
            "mouse-edges-remove"
        );
        assert_eq!(ViewportEvent::BounceYEnd.to_string(), "bounce-y-end");
        assert_eq!(MoveKind::ClampX.as_str(), "clamp-x");
        assert_eq!(ZoomKind::ClampZoom.as_str(), "clamp-zoom");
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue = EventQueue::default();
        queue.push(ViewportEvent::PinchStart);
        queue.push(ViewportEvent::PinchEnd);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            [ViewportEvent::PinchStart, ViewportEvent::PinchEnd]
        );
        assert!(queue.is_empty());
    }
}
