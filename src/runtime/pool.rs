//! Per-template window pools.

use std::collections::BTreeMap;

use crate::core::options::TemplateKey;
use crate::runtime::template::WindowTemplate;
use crate::runtime::window::Window;

/// All live instances of one template, keyed by pool-local id.
///
/// Invariant: every stored window's id equals its map key. Ids are assigned
/// as the smallest unused non-negative integer, so removing id `k` makes `k`
/// the next id handed out.
pub struct WindowPool {
    key: TemplateKey,
    template: WindowTemplate,
    windows: BTreeMap<u32, Window>,
}

impl WindowPool {
    pub(crate) fn new(key: TemplateKey, template: WindowTemplate) -> Self {
        Self {
            key,
            template,
            windows: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &TemplateKey {
        &self.key
    }

    pub fn template(&self) -> WindowTemplate {
        self.template
    }

    /// Store a window under the smallest unused id; returns the id.
    pub fn add_window(&mut self, window: Window) -> u32 {
        let mut id = 0u32;
        while self.windows.contains_key(&id) {
            id += 1;
        }
        window.set_id(id);
        self.windows.insert(id, window);
        id
    }

    pub fn get_window(&self, id: u32) -> Option<Window> {
        self.windows.get(&id).cloned()
    }

    /// All stored windows in id order, optionally only those active in the
    /// current hierarchy.
    pub fn windows(&self, only_active: bool) -> Vec<Window> {
        self.windows
            .values()
            .filter(|window| !only_active || window.is_active_in_hierarchy())
            .cloned()
            .collect()
    }

    /// Whether any stored window is active; with `include_inactive`, whether
    /// any window is stored at all.
    pub fn has_windows(&self, include_inactive: bool) -> bool {
        if include_inactive {
            return !self.windows.is_empty();
        }
        self.windows.values().any(|window| window.is_active())
    }

    /// Drop the entry; the instance itself is left alone.
    pub fn remove_window(&mut self, id: u32) -> Option<Window> {
        self.windows.remove(&id)
    }

    pub fn remove(&mut self, window: &Window) {
        self.windows.retain(|_, stored| !stored.same(window));
    }

    /// First inactive window marked reusable, in id order.
    pub fn first_reusable(&self) -> Option<Window> {
        self.windows
            .values()
            .find(|window| !window.is_active() && window.is_reusable())
            .cloned()
    }

    /// Drop entries whose scene object was destroyed out from under the
    /// pool; returns how many were dropped.
    pub fn compact(&mut self) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| window.exists());
        before - self.windows.len()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
