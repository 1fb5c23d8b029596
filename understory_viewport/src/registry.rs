// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered plugin registry and the capability handle passed to plugin hooks.
//!
//! Dispatch walks the registry in priority order and calls every active
//! plugin; there is no short-circuit once a plugin reports consumption. The
//! aggregate result is `true` if any plugin consumed the event.
//!
//! Each plugin is taken out of its slot for the duration of its hook and put
//! back afterwards. That lets the hook hold a [`Context`] with mutable access
//! to the registry (and therefore to every other plugin) while it runs.
//! Slot changes made during the hook win over the restore:
//! - a plugin removed during its own hook is destroyed instead of restored;
//! - a plugin replaced during its own hook is dropped in favour of the replacement.

use alloc::vec::Vec;

use kurbo::Point;
use smallvec::SmallVec;

use crate::event::{EventQueue, ViewportEvent};
use crate::input::InputManager;
use crate::node::ViewportNode;
use crate::plugin::{AnyPlugin, Plugin, PluginName};

#[derive(Debug)]
struct Slot {
    name: PluginName,
    plugin: Option<AnyPlugin>,
    paused: bool,
}

/// Plugins keyed by name and kept in dispatch order.
#[derive(Debug)]
pub struct PluginRegistry {
    order: Vec<PluginName>,
    slots: Vec<Slot>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// Creates an empty registry using the canonical priority order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: PluginName::CANONICAL_ORDER.to_vec(),
            slots: Vec::new(),
        }
    }

    /// Stores `plugin` under its name, returning the instance it replaced.
    ///
    /// With an `index`, the name is moved to that position of the priority
    /// order. Without one, built-in names keep their canonical position and
    /// new custom names go last.
    pub(crate) fn insert(&mut self, plugin: AnyPlugin, index: Option<usize>) -> Option<AnyPlugin> {
        let name = plugin.name();
        if let Some(index) = index {
            self.order.retain(|n| *n != name);
            let index = index.min(self.order.len());
            self.order.insert(index, name);
        } else if !self.order.contains(&name) {
            self.order.push(name);
        }
        let replaced = match self.slot_mut(name) {
            Some(slot) => {
                slot.paused = false;
                slot.plugin.replace(plugin)
            }
            None => {
                self.slots.push(Slot {
                    name,
                    plugin: Some(plugin),
                    paused: false,
                });
                None
            }
        };
        self.sort();
        tracing::debug!(plugin = %name, replaced = replaced.is_some(), "plugin added");
        replaced
    }

    /// Clears the slot for `name`.
    ///
    /// Returns `None` when no such slot exists, otherwise the stored instance
    /// (which is itself `None` if the plugin is running its own hook).
    pub(crate) fn remove(&mut self, name: PluginName) -> Option<Option<AnyPlugin>> {
        let index = self.slots.iter().position(|s| s.name == name)?;
        let slot = self.slots.remove(index);
        tracing::debug!(plugin = %name, "plugin removed");
        Some(slot.plugin)
    }

    /// The plugin stored under `name`.
    ///
    /// Returns `None` for absent names and for the plugin whose hook is
    /// currently running.
    #[must_use]
    pub fn get(&self, name: PluginName) -> Option<&AnyPlugin> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.plugin.as_ref())
    }

    /// The plugin stored under `name`, mutably.
    pub fn get_mut(&mut self, name: PluginName) -> Option<&mut AnyPlugin> {
        self.slot_mut(name).and_then(|s| s.plugin.as_mut())
    }

    /// Whether a slot named `name` exists, paused or not.
    #[must_use]
    pub fn contains(&self, name: PluginName) -> bool {
        self.slots.iter().any(|s| s.name == name)
    }

    /// Whether the slot named `name` is paused.
    #[must_use]
    pub fn is_paused(&self, name: PluginName) -> bool {
        self.slots.iter().any(|s| s.name == name && s.paused)
    }

    /// Skips the plugin during dispatch until resumed. No-op for absent names.
    pub fn pause(&mut self, name: PluginName) {
        if let Some(slot) = self.slot_mut(name) {
            if !slot.paused {
                slot.paused = true;
                if let Some(plugin) = slot.plugin.as_mut() {
                    plugin.pause();
                }
                tracing::debug!(plugin = %name, "plugin paused");
            }
        }
    }

    /// Restores dispatch for a paused plugin. No-op for absent names.
    pub fn resume(&mut self, name: PluginName) {
        if let Some(slot) = self.slot_mut(name) {
            if slot.paused {
                slot.paused = false;
                if let Some(plugin) = slot.plugin.as_mut() {
                    plugin.resume();
                }
                tracing::debug!(plugin = %name, "plugin resumed");
            }
        }
    }

    /// Registered names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = PluginName> + '_ {
        self.slots.iter().map(|s| s.name)
    }

    /// The full priority order, including names with no registered plugin.
    #[must_use]
    pub fn order(&self) -> &[PluginName] {
        &self.order
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_mut(&mut self, name: PluginName) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }

    fn sort(&mut self) {
        let order = &self.order;
        self.slots.sort_by_key(|slot| {
            order
                .iter()
                .position(|n| *n == slot.name)
                .unwrap_or(usize::MAX)
        });
    }

    fn active_names(&self) -> SmallVec<[PluginName; 12]> {
        self.slots
            .iter()
            .filter(|s| !s.paused)
            .map(|s| s.name)
            .collect()
    }

    fn take(&mut self, name: PluginName) -> Option<AnyPlugin> {
        let slot = self.slot_mut(name)?;
        if slot.paused {
            return None;
        }
        slot.plugin.take()
    }

    fn restore(&mut self, name: PluginName, mut plugin: AnyPlugin) {
        match self.slot_mut(name) {
            Some(slot) if slot.plugin.is_none() => slot.plugin = Some(plugin),
            // Replaced while running.
            Some(_) => {}
            None => plugin.destroy(),
        }
    }
}

/// Capability handle given to every plugin hook.
///
/// It exposes the shared transform node, the pointer state and the rest of
/// the registry, plus the helpers that keep plugins consistent with each
/// other: moving the camera programmatically resets the other plugins, and
/// zooming re-applies the zoom limits.
#[derive(Debug)]
pub struct Context<'a> {
    /// The transform shared by every plugin.
    pub node: &'a mut ViewportNode,
    /// Active pointers.
    pub input: &'a mut InputManager,
    /// Every other plugin. The plugin running the current hook is absent.
    pub plugins: &'a mut PluginRegistry,
    events: &'a mut EventQueue,
    now: f64,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        node: &'a mut ViewportNode,
        input: &'a mut InputManager,
        plugins: &'a mut PluginRegistry,
        events: &'a mut EventQueue,
        now: f64,
    ) -> Self {
        Self {
            node,
            input,
            plugins,
            events,
            now,
        }
    }

    /// Viewport clock in milliseconds, advanced by each frame update.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queues an event for listeners.
    pub fn emit(&mut self, event: ViewportEvent) {
        self.events.push(event);
    }

    /// Maps a screen point to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        self.node.to_local(screen)
    }

    /// Centers the screen on world point `center` and resets the other plugins.
    pub fn move_center(&mut self, center: Point) {
        self.node.set_center(center);
        self.reset();
    }

    /// Puts world point `corner` at the top-left and resets the other plugins.
    pub fn move_corner(&mut self, corner: Point) {
        self.node.set_corner(corner);
        self.reset();
    }

    /// Runs every active plugin's reset hook after a programmatic change.
    pub fn reset(&mut self) {
        for name in self.plugins.active_names() {
            self.with_plugin(name, |plugin, cx| plugin.reset(cx));
        }
    }

    /// Re-applies the zoom limits if a [`ClampZoom`](crate::ClampZoom) is registered.
    pub fn clamp_zoom(&mut self) {
        self.with_plugin(PluginName::ClampZoom, |plugin, cx| {
            if let AnyPlugin::ClampZoom(clamp_zoom) = plugin {
                clamp_zoom.clamp(cx);
            }
        });
    }

    /// Removes a plugin and emits its `<name>-remove` event.
    ///
    /// A plugin may remove itself; it is destroyed when its hook returns.
    pub fn remove_plugin(&mut self, name: PluginName) -> bool {
        match self.plugins.remove(name) {
            Some(stored) => {
                if let Some(mut plugin) = stored {
                    plugin.destroy();
                }
                self.emit(ViewportEvent::PluginRemoved(name));
                true
            }
            None => false,
        }
    }

    /// Runs `f` on the active plugin named `name`, if any.
    pub(crate) fn with_plugin<R>(
        &mut self,
        name: PluginName,
        f: impl FnOnce(&mut AnyPlugin, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let mut plugin = self.plugins.take(name)?;
        let result = f(&mut plugin, self);
        self.plugins.restore(name, plugin);
        Some(result)
    }

    /// Fans `f` out to every active plugin in order, without short-circuit.
    pub(crate) fn dispatch(
        &mut self,
        mut f: impl FnMut(&mut AnyPlugin, &mut Context<'_>) -> bool,
    ) -> bool {
        let mut consumed = false;
        for name in self.plugins.active_names() {
            if let Some(result) = self.with_plugin(name, &mut f) {
                consumed |= result;
            }
        }
        consumed
    }
}
