// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::event::{MoveKind, ViewportEvent};
use crate::modes::{Direction, Underflow};
use crate::plugin::Plugin;
use crate::pointer::PointerEvent;
use crate::registry::Context;

/// One edge limit of a [`Clamp`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClampBound {
    /// The world's own edge: `0` for left/top, the world size for right/bottom.
    World,
    /// A fixed world coordinate.
    At(f64),
}

impl ClampBound {
    fn resolve(self, world_edge: f64) -> f64 {
        match self {
            Self::World => world_edge,
            Self::At(value) => value,
        }
    }
}

/// Options for [`Clamp`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ClampOptions {
    /// Left limit; `None` leaves the edge free.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "serde_support::bound"))]
    pub left: Option<ClampBound>,
    /// Right limit.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "serde_support::bound"))]
    pub right: Option<ClampBound>,
    /// Top limit.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "serde_support::bound"))]
    pub top: Option<ClampBound>,
    /// Bottom limit.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "serde_support::bound"))]
    pub bottom: Option<ClampBound>,
    /// Shorthand that clamps the named axes to the world edges, replacing
    /// the per-edge limits.
    pub direction: Option<Direction>,
    /// Alignment when the world is smaller than the screen; `None` leaves
    /// small worlds where they are.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "serde_support::underflow")
    )]
    pub underflow: Option<Underflow>,
}

impl Default for ClampOptions {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            top: None,
            bottom: None,
            direction: None,
            underflow: Some(Underflow::CENTER),
        }
    }
}

/// Keeps the viewport inside configured edges.
///
/// Runs on every pointer move, every frame and every reset. When the world
/// is narrower than the screen the axis is aligned by the underflow policy
/// instead. Every correction stops [`Decelerate`](crate::Decelerate) on that
/// axis and is reported as a `moved` event of type `clamp-x`/`clamp-y`
/// carrying the position before the correction.
#[derive(Clone, Debug)]
pub struct Clamp {
    left: Option<ClampBound>,
    right: Option<ClampBound>,
    top: Option<ClampBound>,
    bottom: Option<ClampBound>,
    underflow: Option<Underflow>,
}

impl Clamp {
    /// Creates the plugin.
    #[must_use]
    pub fn new(options: ClampOptions) -> Self {
        let mut clamp = Self {
            left: options.left,
            right: options.right,
            top: options.top,
            bottom: options.bottom,
            underflow: options.underflow,
        };
        if let Some(direction) = options.direction {
            let horizontal = direction.horizontal().then_some(ClampBound::World);
            let vertical = direction.vertical().then_some(ClampBound::World);
            clamp.left = horizontal;
            clamp.right = horizontal;
            clamp.top = vertical;
            clamp.bottom = vertical;
        }
        clamp
    }

    /// Applies the limits to the current position.
    pub fn update(&mut self, cx: &mut Context<'_>) {
        let original = cx.node.position().to_point();

        if self.left.is_some() || self.right.is_some() {
            let mut moved = false;
            let screen = cx.node.screen_width();
            if cx.node.screen_world_width() < screen {
                if let Some(underflow) = self.underflow {
                    let x = underflow.x.offset(screen, cx.node.screen_world_width());
                    if cx.node.x() != x {
                        cx.node.set_x(x);
                        moved = true;
                    }
                }
            } else {
                if let Some(left) = self.left.map(|b| b.resolve(0.0)) {
                    if cx.node.left() < left {
                        cx.node.set_left(left);
                        moved = true;
                    }
                }
                if let Some(right) = self.right.map(|b| b.resolve(cx.node.world_width())) {
                    if cx.node.right() > right {
                        cx.node.set_right(right);
                        moved = true;
                    }
                }
            }
            if moved {
                let corrected = cx.node.x();
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_x();
                    decelerate.reconcile_clamp_x(original.x, corrected);
                }
                cx.emit(ViewportEvent::Moved {
                    kind: MoveKind::ClampX,
                    original: Some(original),
                });
            }
        }

        if self.top.is_some() || self.bottom.is_some() {
            let mut moved = false;
            let screen = cx.node.screen_height();
            if cx.node.screen_world_height() < screen {
                if let Some(underflow) = self.underflow {
                    let y = underflow.y.offset(screen, cx.node.screen_world_height());
                    if cx.node.y() != y {
                        cx.node.set_y(y);
                        moved = true;
                    }
                }
            } else {
                if let Some(top) = self.top.map(|b| b.resolve(0.0)) {
                    if cx.node.top() < top {
                        cx.node.set_top(top);
                        moved = true;
                    }
                }
                if let Some(bottom) = self.bottom.map(|b| b.resolve(cx.node.world_height())) {
                    if cx.node.bottom() > bottom {
                        cx.node.set_bottom(bottom);
                        moved = true;
                    }
                }
            }
            if moved {
                let corrected = cx.node.y();
                if let Some(decelerate) = cx.plugins.decelerate_mut() {
                    decelerate.stop_y();
                    decelerate.reconcile_clamp_y(original.y, corrected);
                }
                cx.emit(ViewportEvent::Moved {
                    kind: MoveKind::ClampY,
                    original: Some(original),
                });
            }
        }
    }
}

impl Plugin for Clamp {
    fn added(&mut self, cx: &mut Context<'_>) {
        self.update(cx);
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        self.update(cx);
        false
    }

    fn update(&mut self, cx: &mut Context<'_>, _elapsed: f64) {
        Self::update(self, cx);
    }

    fn reset(&mut self, cx: &mut Context<'_>) {
        Self::update(self, cx);
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use alloc::string::String;

    use serde::{Deserialize, Deserializer};

    use super::ClampBound;
    use crate::modes::Underflow;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bound {
        Flag(bool),
        At(f64),
    }

    /// `true` means the world edge, a number is a fixed edge, `false` or null is free.
    pub(super) fn bound<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ClampBound>, D::Error> {
        Ok(match Option::<Bound>::deserialize(deserializer)? {
            None | Some(Bound::Flag(false)) => None,
            Some(Bound::Flag(true)) => Some(ClampBound::World),
            Some(Bound::At(value)) => Some(ClampBound::At(value)),
        })
    }

    /// Accepts `"none"` in addition to the usual alignment strings.
    pub(super) fn underflow<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Underflow>, D::Error> {
        let text = String::deserialize(deserializer)?;
        Underflow::parse_optional(&text).map_err(serde::de::Error::custom)
    }
}
