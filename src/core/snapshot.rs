//! Scene-subtree snapshots used to undo structural changes on hide.
//!
//! The snapshot is an arena of nodes addressed by slot index. Each slot
//! records the live node id, its captured parent, its captured active flag,
//! and the slots of its captured children. Parent/child relations are plain
//! indices, never live references, so the arena stays inert until restore.

use crate::scene::{NodeId, Scene};

#[derive(Debug)]
struct SnapshotNode {
    node: NodeId,
    parent: Option<NodeId>,
    active: bool,
    children: Vec<usize>,
    is_root: bool,
}

/// Captured shape of a window's scene subtree.
///
/// Restore undoes three classes of drift relative to the capture:
/// reparented nodes are moved back under their captured parents, children
/// added after the capture are destroyed, and active flags are reapplied
/// (the root's own flag is left alone; the window controls it directly).
#[derive(Debug, Default)]
pub struct HierarchySnapshot {
    nodes: Vec<SnapshotNode>,
}

impl HierarchySnapshot {
    /// Record the subtree rooted at `root` as it exists right now.
    pub fn capture(scene: &dyn Scene, root: NodeId) -> Self {
        let mut snapshot = Self { nodes: Vec::new() };
        snapshot.capture_node(scene, root, true);
        snapshot
    }

    fn capture_node(&mut self, scene: &dyn Scene, node: NodeId, is_root: bool) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(SnapshotNode {
            node,
            parent: scene.parent(node),
            active: scene.is_active(node),
            children: Vec::new(),
            is_root,
        });
        for child in scene.children(node) {
            let child_slot = self.capture_node(scene, child, false);
            self.nodes[slot].children.push(child_slot);
        }
        slot
    }

    /// Number of nodes captured, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` was part of the captured subtree.
    pub fn tracks(&self, node: NodeId) -> bool {
        self.nodes.iter().any(|entry| entry.node == node)
    }

    /// Put the live subtree back into its captured shape.
    ///
    /// Tracked nodes destroyed since the capture are skipped; restoring is
    /// best-effort per node and never fails.
    pub fn restore(&self, scene: &mut dyn Scene) {
        if !self.nodes.is_empty() {
            self.restore_node(scene, 0);
        }
    }

    fn restore_node(&self, scene: &mut dyn Scene, slot: usize) {
        let entry = &self.nodes[slot];
        if !scene.exists(entry.node) {
            return;
        }

        if !entry.is_root {
            scene.set_active(entry.node, entry.active);
        }

        for &child_slot in &entry.children {
            self.restore_parents(scene, child_slot);
        }

        let tracked: Vec<NodeId> = entry
            .children
            .iter()
            .map(|&child_slot| self.nodes[child_slot].node)
            .collect();
        for live_child in scene.children(entry.node) {
            if !tracked.contains(&live_child) {
                scene.destroy(live_child);
            }
        }

        for &child_slot in &entry.children {
            self.restore_node(scene, child_slot);
        }
    }

    fn restore_parents(&self, scene: &mut dyn Scene, slot: usize) {
        let entry = &self.nodes[slot];
        if !scene.exists(entry.node) {
            return;
        }
        if let Some(parent) = entry.parent {
            if scene.exists(parent) {
                scene.set_parent(entry.node, parent);
            }
        }
        for &child_slot in &entry.children {
            self.restore_parents(scene, child_slot);
        }
    }
}
