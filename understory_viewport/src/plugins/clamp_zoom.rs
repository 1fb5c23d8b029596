// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

use crate::event::{ViewportEvent, ZoomKind};
use crate::plugin::Plugin;
use crate::registry::Context;

/// Options for [`ClampZoom`]. Limits are world units visible on screen.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ClampZoomOptions {
    /// Smallest visible world width (most zoomed in).
    pub min_width: Option<f64>,
    /// Smallest visible world height.
    pub min_height: Option<f64>,
    /// Largest visible world width (most zoomed out).
    pub max_width: Option<f64>,
    /// Largest visible world height.
    pub max_height: Option<f64>,
}

/// Zoom limits expressed as visible world size.
///
/// A violated width limit refits the horizontal scale and scales the
/// vertical axis by the same ratio to keep the aspect; height limits work
/// the other way round.
#[derive(Clone, Debug)]
pub struct ClampZoom {
    options: ClampZoomOptions,
}

impl ClampZoom {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: ClampZoomOptions) -> Self {
        Self { options }
    }

    /// Configured options.
    #[must_use]
    pub fn options(&self) -> &ClampZoomOptions {
        &self.options
    }

    /// Applies the limits to the current scale.
    pub fn clamp(&mut self, cx: &mut Context<'_>) {
        let ClampZoomOptions {
            min_width,
            min_height,
            max_width,
            max_height,
        } = self.options;
        if let Some(limit) = min_width {
            if cx.node.world_screen_width() < limit {
                fit_width(cx, limit);
            }
        }
        if let Some(limit) = max_width {
            if cx.node.world_screen_width() > limit {
                fit_width(cx, limit);
            }
        }
        if let Some(limit) = min_height {
            if cx.node.world_screen_height() < limit {
                fit_height(cx, limit);
            }
        }
        if let Some(limit) = max_height {
            if cx.node.world_screen_height() > limit {
                fit_height(cx, limit);
            }
        }
    }
}

/// Shows exactly `width` world units horizontally, scaling y by the same ratio.
fn fit_width(cx: &mut Context<'_>, width: f64) {
    let scale = cx.node.scale();
    let x = cx.node.screen_width() / width;
    cx.node.set_scale(Vec2::new(x, scale.y * x / scale.x));
    cx.emit(ViewportEvent::Zoomed {
        kind: ZoomKind::ClampZoom,
    });
}

/// Shows exactly `height` world units vertically, scaling x by the same ratio.
fn fit_height(cx: &mut Context<'_>, height: f64) {
    let scale = cx.node.scale();
    let y = cx.node.screen_height() / height;
    cx.node.set_scale(Vec2::new(scale.x * y / scale.y, y));
    cx.emit(ViewportEvent::Zoomed {
        kind: ZoomKind::ClampZoom,
    });
}

impl Plugin for ClampZoom {
    fn added(&mut self, cx: &mut Context<'_>) {
        self.clamp(cx);
    }

    fn resize(&mut self, cx: &mut Context<'_>) {
        self.clamp(cx);
    }

    fn reset(&mut self, cx: &mut Context<'_>) {
        self.clamp(cx);
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

    fn run(options: ClampZoomOptions, scale: Vec2) -> (Vec2, usize) {
        let mut node = ViewportNode::new(Size::new(800.0, 600.0));
        node.set_scale(scale);
        let mut input = InputManager::default();
        let mut plugins = PluginRegistry::new();
        let mut events = EventQueue::default();
        let mut cx = Context::new(&mut node, &mut input, &mut plugins, &mut events, 0.0);
        ClampZoom::new(options).clamp(&mut cx);
        (node.scale(), events.as_slice().len())
    }

    #[test]
    fn min_width_limits_zoom_in_and_keeps_aspect() {
        let (scale, zooms) = run(
            ClampZoomOptions {
                min_width: Some(400.0),
                ..ClampZoomOptions::default()
            },
            Vec2::new(4.0, 4.0),
        );
        assert_eq!(scale, Vec2::new(2.0, 2.0));
        assert_eq!(zooms, 1);
    }

    #[test]
    fn max_height_limits_zoom_out() {
        let (scale, _) = run(
            ClampZoomOptions {
                max_height: Some(1200.0),
                ..ClampZoomOptions::default()
            },
            Vec2::new(0.25, 0.25),
        );
        assert_eq!(scale, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn satisfied_limits_leave_scale_alone() {
        let (scale, zooms) = run(
            ClampZoomOptions {
                min_width: Some(100.0),
                max_width: Some(1600.0),
                ..ClampZoomOptions::default()
            },
            Vec2::new(1.0, 1.0),
        );
        assert_eq!(scale, Vec2::new(1.0, 1.0));
        assert_eq!(zooms, 0);
    }
}
