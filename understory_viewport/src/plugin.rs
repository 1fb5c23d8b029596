// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plugin contract and the closed set of built-in plugins.
//!
//! A plugin is a bundle of lifecycle hooks. Every hook has a no-op default,
//! so a plugin only implements what it reacts to. Pointer and wheel hooks
//! return `true` when they consumed the event.
//!
//! Built-in plugins are variants of [`AnyPlugin`]; user plugins implement
//! [`Plugin`] and are registered as [`AnyPlugin::Custom`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_viewport::{Context, Plugin, PluginName, Viewport, ViewportOptions};
//!
//! #[derive(Debug, Default)]
//! struct FrameCounter(u32);
//!
//! impl Plugin for FrameCounter {
//!     fn update(&mut self, _cx: &mut Context<'_>, _elapsed: f64) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut viewport = Viewport::new(ViewportOptions::default());
//! viewport.add_custom("frame-counter", FrameCounter::default(), None);
//! viewport.update(16.0);
//! assert!(viewport.plugins().contains(PluginName::Custom("frame-counter")));
//! ```

use alloc::boxed::Box;
use core::fmt;

use crate::plugins::{
    Bounce, Clamp, ClampZoom, Decelerate, Drag, Follow, MouseEdges, Pinch, Snap, SnapZoom, Wheel,
};
use crate::pointer::{PointerEvent, WheelEvent};
use crate::registry::{Context, PluginRegistry};

/// Name of a plugin slot in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PluginName {
    /// [`Drag`].
    Drag,
    /// [`Pinch`].
    Pinch,
    /// [`Wheel`].
    Wheel,
    /// [`Follow`].
    Follow,
    /// [`MouseEdges`].
    MouseEdges,
    /// [`Decelerate`].
    Decelerate,
    /// [`Bounce`].
    Bounce,
    /// [`SnapZoom`].
    SnapZoom,
    /// [`ClampZoom`].
    ClampZoom,
    /// [`Snap`].
    Snap,
    /// [`Clamp`].
    Clamp,
    /// A user plugin.
    Custom(&'static str),
}

impl PluginName {
    /// Fixed dispatch priority of the built-in plugins.
    pub const CANONICAL_ORDER: [Self; 11] = [
        Self::Drag,
        Self::Pinch,
        Self::Wheel,
        Self::Follow,
        Self::MouseEdges,
        Self::Decelerate,
        Self::Bounce,
        Self::SnapZoom,
        Self::ClampZoom,
        Self::Snap,
        Self::Clamp,
    ];

    /// The slot name, as used in `<name>-remove` events.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Pinch => "pinch",
            Self::Wheel => "wheel",
            Self::Follow => "follow",
            Self::MouseEdges => "mouse-edges",
            Self::Decelerate => "decelerate",
            Self::Bounce => "bounce",
            Self::SnapZoom => "snap-zoom",
            Self::ClampZoom => "clamp-zoom",
            Self::Snap => "snap",
            Self::Clamp => "clamp",
            Self::Custom(name) => *name,
        }
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle hooks of a viewport plugin.
///
/// Hooks run in canonical registry order. While a hook runs, the plugin's
/// own slot is vacated, so `cx.plugins` gives access to every other plugin.
pub trait Plugin: fmt::Debug {
    /// Called once right after the plugin is registered.
    fn added(&mut self, _cx: &mut Context<'_>) {}

    /// A pointer was pressed. Returns whether the event was consumed.
    fn pointer_down(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        false
    }

    /// A pointer moved. Returns whether the event was consumed.
    fn pointer_move(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        false
    }

    /// A pointer was released or cancelled. Returns whether the event was consumed.
    fn pointer_up(&mut self, _cx: &mut Context<'_>, _event: &PointerEvent) -> bool {
        false
    }

    /// A wheel event inside the viewport. Returns whether the event was consumed.
    fn wheel(&mut self, _cx: &mut Context<'_>, _event: &WheelEvent) -> bool {
        false
    }

    /// Per-frame tick; `elapsed` is in milliseconds.
    fn update(&mut self, _cx: &mut Context<'_>, _elapsed: f64) {}

    /// The screen or world size changed.
    fn resize(&mut self, _cx: &mut Context<'_>) {}

    /// The transform was changed programmatically.
    fn reset(&mut self, _cx: &mut Context<'_>) {}

    /// The plugin's slot was paused.
    fn pause(&mut self) {}

    /// The plugin's slot was resumed.
    fn resume(&mut self) {}

    /// The plugin was removed from the registry.
    fn destroy(&mut self) {}
}

macro_rules! builtin_plugins {
    ($($name:ident => $get:ident, $get_mut:ident;)*) => {
        /// A registered plugin.
        #[derive(Debug)]
        pub enum AnyPlugin {
            $(
                #[doc = concat!("The built-in [`", stringify!($name), "`] plugin.")]
                $name($name),
            )*
            /// A user plugin.
            Custom {
                /// Slot name.
                name: &'static str,
                /// The plugin.
                plugin: Box<dyn Plugin>,
            },
        }

        impl AnyPlugin {
            /// The slot name this plugin occupies.
            #[must_use]
            pub fn name(&self) -> PluginName {
                match self {
                    $(Self::$name(_) => PluginName::$name,)*
                    Self::Custom { name, .. } => PluginName::Custom(*name),
                }
            }

            fn as_plugin_mut(&mut self) -> &mut dyn Plugin {
                match self {
                    $(Self::$name(plugin) => plugin,)*
                    Self::Custom { plugin, .. } => plugin.as_mut(),
                }
            }
        }

        $(
            impl From<$name> for AnyPlugin {
                fn from(plugin: $name) -> Self {
                    Self::$name(plugin)
                }
            }
        )*

        impl PluginRegistry {
            $(
                #[doc = concat!("The registered [`", stringify!($name), "`] plugin, if any.")]
                #[must_use]
                pub fn $get(&self) -> Option<&$name> {
                    match self.get(PluginName::$name)? {
                        AnyPlugin::$name(plugin) => Some(plugin),
                        _ => None,
                    }
                }

                #[doc = concat!("The registered [`", stringify!($name), "`] plugin, mutably.")]
                pub fn $get_mut(&mut self) -> Option<&mut $name> {
                    match self.get_mut(PluginName::$name)? {
                        AnyPlugin::$name(plugin) => Some(plugin),
                        _ => None,
                    }
                }
            )*
        }
    };
}

builtin_plugins! {
    Drag => drag, drag_mut;
    Pinch => pinch, pinch_mut;
    Wheel => wheel, wheel_mut;
    Follow => follow, follow_mut;
    MouseEdges => mouse_edges, mouse_edges_mut;
    Decelerate => decelerate, decelerate_mut;
    Bounce => bounce, bounce_mut;
    SnapZoom => snap_zoom, snap_zoom_mut;
    ClampZoom => clamp_zoom, clamp_zoom_mut;
    Snap => snap, snap_mut;
    Clamp => clamp, clamp_mut;
}

impl AnyPlugin {
    /// Wraps a user plugin under `name`.
    pub fn custom(name: &'static str, plugin: impl Plugin + 'static) -> Self {
        Self::Custom {
            name,
            plugin: Box::new(plugin),
        }
    }
}

impl Plugin for AnyPlugin {
    fn added(&mut self, cx: &mut Context<'_>) {
        self.as_plugin_mut().added(cx);
    }

    fn pointer_down(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        self.as_plugin_mut().pointer_down(cx, event)
    }

    fn pointer_move(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        self.as_plugin_mut().pointer_move(cx, event)
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>, event: &PointerEvent) -> bool {
        self.as_plugin_mut().pointer_up(cx, event)
    }

    fn wheel(&mut self, cx: &mut Context<'_>, event: &WheelEvent) -> bool {
        self.as_plugin_mut().wheel(cx, event)
    }

    fn update(&mut self, cx: &mut Context<'_>, elapsed: f64) {
        self.as_plugin_mut().update(cx, elapsed);
    }

    fn resize(&mut self, cx: &mut Context<'_>) {
        self.as_plugin_mut().resize(cx);
    }

    fn reset(&mut self, cx: &mut Context<'_>) {
        self.as_plugin_mut().reset(cx);
    }

    fn pause(&mut self) {
        self.as_plugin_mut().pause();
    }

    fn resume(&mut self) {
        self.as_plugin_mut().resume();
    }

    fn destroy(&mut self) {
        self.as_plugin_mut().destroy();
    }
}
