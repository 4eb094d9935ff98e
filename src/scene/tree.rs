//! Arena-backed reference scene graph.
//!
//! `SceneTree` implements [`Scene`] over a slot arena: node ids index into
//! `slots`, destroyed nodes leave a `None` behind, and ids are never reused.
//! Templates are detached prototype subtrees registered by their root node;
//! instantiation deep-clones the prototype with a fresh unique runtime name.

use crate::scene::{NodeId, OverlayKind, Scene, TemplateId};

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    opacity: f32,
    input_group: bool,
    interactable: bool,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            active: true,
            opacity: 1.0,
            input_group: false,
            interactable: true,
        }
    }
}

#[derive(Default)]
pub struct SceneTree {
    slots: Vec<Option<Node>>,
    templates: Vec<NodeId>,
    instance_counter: u64,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node, optionally parented. Detached nodes are prototype or
    /// root material; everything else should hang off a parent.
    pub fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_raw(self.slots.len() as u64);
        self.slots.push(Some(Node::new(name.to_string())));
        if let Some(parent) = parent {
            self.attach(id, parent);
        }
        id
    }

    /// Register a detached subtree as a template prototype.
    pub fn register_template(&mut self, root: NodeId) -> TemplateId {
        let id = TemplateId::from_raw(self.templates.len() as u64);
        self.templates.push(root);
        id
    }

    /// Mark a node as an input group (its `interactable` flag then gates its
    /// subtree).
    pub fn set_input_group(&mut self, node: NodeId, enabled: bool) {
        if let Some(slot) = self.node_mut(node) {
            slot.input_group = enabled;
        }
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|slot| slot.name.as_str())
    }

    /// Live node count, templates included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.slots.get(node.raw() as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(node.raw() as usize)
            .and_then(Option::as_mut)
    }

    fn attach(&mut self, node: NodeId, parent: NodeId) {
        self.detach(node);
        if let Some(slot) = self.node_mut(parent) {
            slot.children.push(node);
        }
        if let Some(slot) = self.node_mut(node) {
            slot.parent = Some(parent);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|slot| slot.parent) else {
            return;
        };
        if let Some(slot) = self.node_mut(parent) {
            slot.children.retain(|&child| child != node);
        }
        if let Some(slot) = self.node_mut(node) {
            slot.parent = None;
        }
    }

    fn clone_subtree(&mut self, source: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let prototype = self.node(source)?.clone();
        let clone = self.create_node(&prototype.name, parent);
        if let Some(slot) = self.node_mut(clone) {
            slot.active = prototype.active;
            slot.opacity = prototype.opacity;
            slot.input_group = prototype.input_group;
            slot.interactable = prototype.interactable;
        }
        for child in prototype.children {
            self.clone_subtree(child, Some(clone));
        }
        Some(clone)
    }

    fn collect_input_groups(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(slot) = self.node(node) else {
            return;
        };
        if slot.input_group {
            out.push(node);
        }
        for &child in &slot.children {
            self.collect_input_groups(child, out);
        }
    }
}

impl Scene for SceneTree {
    fn exists(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(slot) = self.node_mut(node) {
            slot.active = active;
        }
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.node(node).map(|slot| slot.active).unwrap_or(false)
    }

    fn is_active_in_hierarchy(&self, node: NodeId) -> bool {
        let Some(slot) = self.node(node) else {
            return false;
        };
        if !slot.active {
            return false;
        }
        match slot.parent {
            Some(parent) => self.is_active_in_hierarchy(parent),
            None => true,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|slot| slot.parent)
    }

    fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        if self.node(node).is_none() || self.node(parent).is_none() {
            return;
        }
        self.attach(node, parent);
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|slot| slot.children.clone())
            .unwrap_or_default()
    }

    fn sibling_index(&self, node: NodeId) -> usize {
        let Some(parent) = self.parent(node) else {
            return 0;
        };
        self.node(parent)
            .and_then(|slot| slot.children.iter().position(|&child| child == node))
            .unwrap_or(0)
    }

    fn set_sibling_index(&mut self, node: NodeId, index: usize) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(slot) = self.node_mut(parent) {
            if let Some(current) = slot.children.iter().position(|&child| child == node) {
                slot.children.remove(current);
                let index = index.min(slot.children.len());
                slot.children.insert(index, node);
            }
        }
    }

    fn place_first(&mut self, node: NodeId) {
        self.set_sibling_index(node, 0);
    }

    fn place_last(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let last = self
            .node(parent)
            .map(|slot| slot.children.len().saturating_sub(1))
            .unwrap_or(0);
        self.set_sibling_index(node, last);
    }

    fn opacity(&self, node: NodeId) -> f32 {
        self.node(node).map(|slot| slot.opacity).unwrap_or(0.0)
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(slot) = self.node_mut(node) {
            slot.opacity = opacity;
        }
    }

    fn input_groups(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_input_groups(root, &mut out);
        out
    }

    fn is_interactable(&self, node: NodeId) -> bool {
        self.node(node)
            .map(|slot| slot.input_group && slot.interactable)
            .unwrap_or(false)
    }

    fn set_interactable(&mut self, node: NodeId, interactable: bool) {
        if let Some(slot) = self.node_mut(node) {
            slot.interactable = interactable;
        }
    }

    fn create_overlay(&mut self, parent: NodeId, kind: OverlayKind) -> NodeId {
        let name = match kind {
            OverlayKind::Background => "window_background",
            OverlayKind::InputBlocker => "input_blocker",
        };
        let node = self.create_node(name, Some(parent));
        self.set_input_group(node, true);
        node
    }

    fn instantiate(&mut self, template: TemplateId, parent: NodeId) -> Option<NodeId> {
        let prototype = *self.templates.get(template.raw() as usize)?;
        if self.node(parent).is_none() {
            return None;
        }
        let instance = self.clone_subtree(prototype, Some(parent))?;
        self.instance_counter += 1;
        let runtime_name = self
            .node(instance)
            .map(|slot| format!("{}#{}", slot.name, self.instance_counter))
            .unwrap_or_default();
        if let Some(slot) = self.node_mut(instance) {
            slot.name = runtime_name;
        }
        Some(instance)
    }

    fn destroy(&mut self, node: NodeId) {
        if self.node(node).is_none() {
            return;
        }
        self.detach(node);
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(slot) = self.slots.get_mut(current.raw() as usize) {
                if let Some(removed) = slot.take() {
                    pending.extend(removed.children);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SceneTree;
    use crate::scene::{OverlayKind, Scene};

    fn dialog_template(scene: &mut SceneTree) -> crate::scene::TemplateId {
        let root = scene.create_node("dialog", None);
        scene.set_input_group(root, true);
        let body = scene.create_node("body", Some(root));
        scene.set_input_group(body, true);
        scene.create_node("label", Some(body));
        scene.register_template(root)
    }

    #[test]
    fn instantiate_deep_clones_with_unique_names() {
        let mut scene = SceneTree::new();
        let ui_root = scene.create_node("ui", None);
        let template = dialog_template(&mut scene);

        let first = scene.instantiate(template, ui_root).expect("instantiate");
        let second = scene.instantiate(template, ui_root).expect("instantiate");

        assert_ne!(first, second);
        assert_ne!(scene.name(first), scene.name(second));
        assert_eq!(scene.children(first).len(), 1);
        assert_eq!(scene.parent(first), Some(ui_root));
        assert_eq!(scene.input_groups(first).len(), 2);
    }

    #[test]
    fn active_in_hierarchy_requires_every_ancestor() {
        let mut scene = SceneTree::new();
        let root = scene.create_node("root", None);
        let child = scene.create_node("child", Some(root));
        assert!(scene.is_active_in_hierarchy(child));

        scene.set_active(root, false);
        assert!(scene.is_active(child));
        assert!(!scene.is_active_in_hierarchy(child));
    }

    #[test]
    fn sibling_order_operations() {
        let mut scene = SceneTree::new();
        let root = scene.create_node("root", None);
        let a = scene.create_node("a", Some(root));
        let b = scene.create_node("b", Some(root));
        let c = scene.create_node("c", Some(root));

        scene.place_last(a);
        assert_eq!(scene.children(root), vec![b, c, a]);
        scene.place_first(c);
        assert_eq!(scene.children(root), vec![c, b, a]);
        assert_eq!(scene.sibling_index(b), 1);
    }

    #[test]
    fn destroy_removes_whole_subtree() {
        let mut scene = SceneTree::new();
        let root = scene.create_node("root", None);
        let child = scene.create_node("child", Some(root));
        let grandchild = scene.create_node("grandchild", Some(child));

        scene.destroy(child);
        assert!(!scene.exists(child));
        assert!(!scene.exists(grandchild));
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn overlay_nodes_are_input_groups() {
        let mut scene = SceneTree::new();
        let root = scene.create_node("root", None);
        let overlay = scene.create_overlay(root, OverlayKind::InputBlocker);
        assert!(scene.is_interactable(overlay));
        assert_eq!(scene.input_groups(root), vec![overlay]);
    }
}
