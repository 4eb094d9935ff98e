//! Host scene-graph interface.
//!
//! The windowing core never talks to a rendering framework directly. It sees
//! the host's scene graph through the [`Scene`] trait: activation, parent
//! links, sibling order, opacity, input groups, template instantiation, and
//! destruction. [`tree::SceneTree`] is the crate's reference implementation,
//! also used by the test harnesses.

pub mod tree;

/// Stable identifier for a node owned by a single scene graph.
///
/// Semantics:
/// - IDs are unique within a scene instance.
/// - IDs are never reused for the lifetime of the scene instance.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u64);

impl NodeId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Stable identifier for a registered panel template.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TemplateId(u64);

impl TemplateId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Class of overlay node a window may park beneath itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverlayKind {
    /// Visible dimmer/background that also blocks input.
    Background,
    /// Invisible input blocker.
    InputBlocker,
}

/// What the windowing core needs from the host scene graph.
///
/// Contract notes:
/// - Queries on destroyed nodes must be harmless: `exists` returns false and
///   the other getters return inert defaults.
/// - `instantiate` must produce a fresh subtree with a unique runtime name,
///   parented under the given node.
/// - Input groups are the nodes whose `interactable` flag gates event
///   delivery to their subtree; `input_groups` enumerates them for a whole
///   subtree, root included, in a deterministic order.
pub trait Scene {
    fn exists(&self, node: NodeId) -> bool;

    fn set_active(&mut self, node: NodeId, active: bool);
    fn is_active(&self, node: NodeId) -> bool;
    /// Active flag of the node and every ancestor.
    fn is_active_in_hierarchy(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    /// Detach `node` and append it as the last child of `parent`, even when
    /// the parent is unchanged.
    fn set_parent(&mut self, node: NodeId, parent: NodeId);
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Position among siblings; higher indices render in front.
    fn sibling_index(&self, node: NodeId) -> usize;
    fn set_sibling_index(&mut self, node: NodeId, index: usize);
    /// Move behind all siblings.
    fn place_first(&mut self, node: NodeId);
    /// Move in front of all siblings.
    fn place_last(&mut self, node: NodeId);

    fn opacity(&self, node: NodeId) -> f32;
    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    fn input_groups(&self, root: NodeId) -> Vec<NodeId>;
    fn is_interactable(&self, node: NodeId) -> bool;
    fn set_interactable(&mut self, node: NodeId, interactable: bool);

    fn create_overlay(&mut self, parent: NodeId, kind: OverlayKind) -> NodeId;
    fn instantiate(&mut self, template: TemplateId, parent: NodeId) -> Option<NodeId>;

    /// Destroy `node` and its whole subtree.
    fn destroy(&mut self, node: NodeId);
}
