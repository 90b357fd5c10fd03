//! Transform hierarchy
//!
//! [`TransformHierarchy`] is the contract the controllers write through: read a
//! node's local/world transform and basis vectors, set a local rotation, rotate
//! in world space and translate in world space. [`SceneGraph`] is the
//! slotmap-backed implementation used by the application and the integration
//! tests.

use rogue_math::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};

use crate::transform::Transform;

new_key_type! {
    /// Key to a node in a [`SceneGraph`]
    ///
    /// Generational, so a key to a removed node never aliases a new one.
    pub struct NodeKey;
}

/// World-space basis vectors of a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Basis of the given world rotation
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            forward: rotation.rotate(Vec3::FORWARD),
            right: rotation.rotate(Vec3::RIGHT),
            up: rotation.rotate(Vec3::UP),
        }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::from_rotation(Quat::IDENTITY)
    }
}

/// Read/write access to a hierarchy of transforms
///
/// Calls with a key that does not resolve are ignored by writers and return
/// the identity from readers; the host is responsible for handing out live keys.
pub trait TransformHierarchy {
    /// Transform of `node` relative to its parent
    fn local(&self, node: NodeKey) -> Transform;

    /// Replace the local rotation of `node`
    fn set_local_rotation(&mut self, node: NodeKey, rotation: Quat);

    /// Transform of `node` in world space
    fn world(&self, node: NodeKey) -> Transform;

    /// Rotate `node` by `degrees` about a world-space `axis` (right-hand rule),
    /// composed with its current rotation
    fn rotate_world(&mut self, node: NodeKey, axis: Vec3, degrees: f32);

    /// Move `node` by a world-space offset
    fn translate_world(&mut self, node: NodeKey, offset: Vec3);

    fn world_position(&self, node: NodeKey) -> Vec3 {
        self.world(node).position
    }

    fn world_rotation(&self, node: NodeKey) -> Quat {
        self.world(node).rotation
    }

    /// World-space forward/right/up of `node`
    fn basis(&self, node: NodeKey) -> Basis {
        Basis::from_rotation(self.world_rotation(node))
    }
}

/// A node in the scene graph
#[derive(Clone, Debug)]
pub struct Node {
    /// Display name (not required to be unique)
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Node {
    fn new(name: impl Into<String>, local: Transform) -> Self {
        Self {
            name: name.into(),
            local,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// Parent/child hierarchy of transforms
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Add a root node
    pub fn add_node(&mut self, name: impl Into<String>, local: Transform) -> NodeKey {
        self.nodes.insert(Node::new(name, local))
    }

    /// Add a node under `parent`
    pub fn add_child(
        &mut self,
        parent: NodeKey,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeKey, SceneGraphError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneGraphError::NodeNotFound(parent));
        }
        let mut node = Node::new(name, local);
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        Ok(key)
    }

    /// Move `node` under `parent`, or to the root when `parent` is `None`
    ///
    /// The local transform is kept as-is, so the world transform may change.
    pub fn set_parent(
        &mut self,
        node: NodeKey,
        parent: Option<NodeKey>,
    ) -> Result<(), SceneGraphError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneGraphError::NodeNotFound(node));
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(SceneGraphError::NodeNotFound(p));
            }
            // Walk up from the new parent; meeting `node` means a cycle
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == node {
                    return Err(SceneGraphError::WouldCreateCycle { node, parent: p });
                }
                cursor = self.nodes[c].parent;
            }
        }

        if let Some(old) = self.nodes[node].parent {
            self.nodes[old].children.retain(|&c| c != node);
        }
        self.nodes[node].parent = parent;
        if let Some(p) = parent {
            self.nodes[p].children.push(node);
        }
        Ok(())
    }

    /// Remove `node` and its whole subtree, returning how many nodes were removed
    pub fn remove(&mut self, node: NodeKey) -> Result<usize, SceneGraphError> {
        let parent = self
            .nodes
            .get(node)
            .ok_or(SceneGraphError::NodeNotFound(node))?
            .parent;
        if let Some(p) = parent {
            self.nodes[p].children.retain(|&c| c != node);
        }

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(key) = stack.pop() {
            if let Some(n) = self.nodes.remove(key) {
                stack.extend(n.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn get(&self, node: NodeKey) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn get_mut(&mut self, node: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(node)
    }

    /// Replace the local transform of `node`
    pub fn set_local(&mut self, node: NodeKey, local: Transform) -> Result<(), SceneGraphError> {
        let n = self
            .nodes
            .get_mut(node)
            .ok_or(SceneGraphError::NodeNotFound(node))?;
        n.local = local;
        Ok(())
    }

    /// Find the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(k, _)| k)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World transform of the parent of `node` (identity for roots)
    fn parent_world(&self, node: NodeKey) -> Transform {
        match self.nodes.get(node).and_then(|n| n.parent) {
            Some(p) => self.world(p),
            None => Transform::identity(),
        }
    }
}

impl TransformHierarchy for SceneGraph {
    fn local(&self, node: NodeKey) -> Transform {
        self.nodes
            .get(node)
            .map(|n| n.local)
            .unwrap_or_default()
    }

    fn set_local_rotation(&mut self, node: NodeKey, rotation: Quat) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.rotation = rotation.normalize();
        }
    }

    fn world(&self, node: NodeKey) -> Transform {
        let mut world = self.local(node);
        let mut cursor = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(p) = cursor {
            let parent = &self.nodes[p];
            world = parent.local.compose(&world);
            cursor = parent.parent;
        }
        world
    }

    fn rotate_world(&mut self, node: NodeKey, axis: Vec3, degrees: f32) {
        if !self.nodes.contains_key(node) {
            return;
        }
        let parent_rotation = self.parent_world(node).rotation;
        let world_delta = Quat::from_axis_angle(axis, degrees.to_radians());
        // Conjugate the world-space delta into the parent's frame
        let local_delta = parent_rotation
            .conjugate()
            .compose(&world_delta)
            .compose(&parent_rotation);
        self.nodes[node].local.rotate(local_delta);
    }

    fn translate_world(&mut self, node: NodeKey, offset: Vec3) {
        if !self.nodes.contains_key(node) {
            return;
        }
        let local_offset = self.parent_world(node).rotation.conjugate().rotate(offset);
        self.nodes[node].local.translate(local_offset);
    }
}

/// Error from a scene graph management call
#[derive(Debug, Clone, PartialEq)]
pub enum SceneGraphError {
    /// The key does not refer to a live node
    NodeNotFound(NodeKey),
    /// Reparenting would make a node its own ancestor
    WouldCreateCycle { node: NodeKey, parent: NodeKey },
}

impl std::fmt::Display for SceneGraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneGraphError::NodeNotFound(key) => write!(f, "Scene node not found: {:?}", key),
            SceneGraphError::WouldCreateCycle { node, parent } => {
                write!(f, "Parenting {:?} under {:?} would create a cycle", node, parent)
            }
        }
    }
}

impl std::error::Error for SceneGraphError {}
