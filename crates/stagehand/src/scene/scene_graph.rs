//! Retained-mode scene graph
//!
//! Nodes live in a slot map and link to each other by [`NodeKey`]. Each
//! node stores its local transform as position, XYZ Euler rotation and
//! scale; world transforms are composed from the ancestors on demand and
//! also cached per node by [`SceneGraph::update_world_matrices`] for
//! drawing.

use slotmap::{new_key_type, SlotMap};

use super::object::ObjectKind;
use crate::foundation::math::{face_towards, Euler, Mat4, Point3, Quat, Transform, Vec3};

new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeKey;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
    
    /// An inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }
    
    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }
    
    /// Whether no point has been added yet
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }
    
    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
    
    /// Full edge lengths
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            self.max - self.min
        }
    }
    
    /// Grow to include `point`
    pub fn expand_by_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }
    
    /// Grow to include `other`
    pub fn union(&mut self, other: &AABB) {
        if !other.is_empty() {
            self.expand_by_point(other.min);
            self.expand_by_point(other.max);
        }
    }
    
    /// Bounds of this box's eight corners after `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let mut result = AABB::empty();
        if self.is_empty() {
            return result;
        }
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            result.expand_by_point(matrix.transform_point(&corner).coords);
        }
        result
    }
    
    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
}

/// A scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name
    pub name: String,
    /// Object variant
    pub kind: ObjectKind,
    /// Local position
    pub position: Vec3,
    /// Local rotation, radians
    pub rotation: Euler,
    /// Local scale
    pub scale: Vec3,
    /// Hidden nodes and their subtrees are not drawn
    pub visible: bool,
    /// Shadow casting hint for the renderer
    pub cast_shadow: bool,
    /// Shadow receiving hint for the renderer
    pub receive_shadow: bool,
    /// Draw order override; higher draws later
    pub render_order: i32,
    /// Whether the renderer may cull the node against the view frustum
    pub frustum_culled: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    matrix_world: Mat4,
}

impl Node {
    /// A detached node at the origin
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            name: String::new(),
            kind,
            position: Vec3::zeros(),
            rotation: Euler::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            render_order: 0,
            frustum_culled: true,
            parent: None,
            children: Vec::new(),
            matrix_world: Mat4::identity(),
        }
    }
    
    /// Builder: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
    
    /// Builder: set the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
    
    /// Local orientation as a quaternion
    pub fn quaternion(&self) -> Quat {
        self.rotation.to_quat()
    }
    
    /// Set the local orientation from a quaternion
    pub fn set_quaternion(&mut self, rotation: &Quat) {
        self.rotation = Euler::from_quat(rotation);
    }
    
    /// Local transform
    pub fn local_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.quaternion(),
            scale: self.scale,
        }
    }
    
    /// Replace the local transform
    pub fn set_local_transform(&mut self, transform: &Transform) {
        self.position = transform.position;
        self.set_quaternion(&transform.rotation);
        self.scale = transform.scale;
    }
    
    /// Local matrix (TRS)
    pub fn local_matrix(&self) -> Mat4 {
        self.local_transform().to_matrix()
    }
    
    /// Move along a local axis by `distance`
    pub fn translate_on_axis(&mut self, axis: &Vec3, distance: f32) {
        self.position += self.quaternion() * (axis * distance);
    }
    
    /// Rotate about a local axis
    pub fn rotate_on_axis(&mut self, axis: &Vec3, angle: f32) {
        let turn = Quat::from_axis_angle(&nalgebra::Unit::new_normalize(*axis), angle);
        self.set_quaternion(&(self.quaternion() * turn));
    }
    
    /// Rotate about an axis in the parent's frame
    pub fn rotate_on_world_axis(&mut self, axis: &Vec3, angle: f32) {
        let turn = Quat::from_axis_angle(&nalgebra::Unit::new_normalize(*axis), angle);
        self.set_quaternion(&(turn * self.quaternion()));
    }
    
    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
    
    /// Direct children in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
    
    /// World matrix as of the last [`SceneGraph::update_world_matrices`]
    pub fn matrix_world(&self) -> &Mat4 {
        &self.matrix_world
    }
}

/// Node arena with parent/child links
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Insert a detached node
    pub fn insert(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.update_world_matrices(key);
        key
    }
    
    /// Delete a node; its children become detached roots
    pub fn remove_node(&mut self, key: NodeKey) -> Option<Node> {
        self.detach(key);
        let node = self.nodes.remove(key)?;
        for child in &node.children {
            if let Some(child) = self.nodes.get_mut(*child) {
                child.parent = None;
            }
        }
        Some(node)
    }
    
    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    
    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    
    /// Whether `key` names a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }
    
    /// Borrow a node
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }
    
    /// Mutably borrow a node
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }
    
    /// Parent of `key`
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(Node::parent)
    }
    
    /// Children of `key`
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[] as &[NodeKey], Node::children)
    }
    
    /// Whether `ancestor` is `key` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent(k);
        }
        false
    }
    
    /// Make `child` the last child of `parent`, leaving its old parent.
    ///
    /// Refuses (returns `false`) when either key is dead or the move would
    /// create a cycle. The child's local transform is kept as-is.
    pub fn add(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        true
    }
    
    /// Remove `child` from `parent` if it is a direct child
    pub fn remove(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }
    
    /// Remove `key` from whatever parent it has
    pub fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.nodes.get_mut(key).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != key);
        }
    }
    
    /// Remove every direct child of `key`
    pub fn clear_children(&mut self, key: NodeKey) {
        let children = match self.nodes.get_mut(key) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(child) = self.nodes.get_mut(child) {
                child.parent = None;
            }
        }
    }
    
    /// `key` and all of its descendants, depth first
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(node) = self.nodes.get(k) else { continue };
            out.push(k);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
    
    /// World matrix composed from the current local transforms
    pub fn world_matrix(&self, key: NodeKey) -> Mat4 {
        let mut matrix = Mat4::identity();
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.nodes.get(k) else { break };
            matrix = node.local_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }
    
    /// World position, orientation and scale
    pub fn world_transform(&self, key: NodeKey) -> Transform {
        Transform::from_matrix(self.world_matrix(key))
    }
    
    /// Refresh the cached world matrix of `key` and its subtree
    pub fn update_world_matrices(&mut self, key: NodeKey) {
        let parent_world = match self.parent(key) {
            Some(parent) => self.world_matrix(parent),
            None => Mat4::identity(),
        };
        
        let mut stack = vec![(key, parent_world)];
        while let Some((k, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(k) else { continue };
            node.matrix_world = parent_world * node.local_matrix();
            let world = node.matrix_world;
            stack.extend(node.children.iter().map(|c| (*c, world)));
        }
    }
    
    /// Turn `key` so its facing axis points at a world-space target.
    ///
    /// Cameras and lights face down local -Z, everything else faces +Z.
    pub fn look_at(&mut self, key: NodeKey, target: Vec3) {
        let Some(node) = self.nodes.get(key) else { return };
        let eye = self.world_transform(key).position;
        let faces_negative_z = matches!(node.kind, ObjectKind::Camera(_) | ObjectKind::Light(_));
        let direction = if faces_negative_z { eye - target } else { target - eye };
        
        let Some(world_rotation) = face_towards(&direction, &Vec3::y()) else { return };
        let local_rotation = match node.parent {
            Some(parent) => self.world_transform(parent).rotation.inverse() * world_rotation,
            None => world_rotation,
        };
        
        if let Some(node) = self.nodes.get_mut(key) {
            node.set_quaternion(&local_rotation);
        }
        self.update_world_matrices(key);
    }
    
    /// World-space bounds of every mesh in the subtree rooted at `key`
    pub fn bounding_box(&self, key: NodeKey) -> AABB {
        let mut bounds = AABB::empty();
        for k in self.descendants(key) {
            if let Some(ObjectKind::Mesh(mesh)) = self.nodes.get(k).map(|n| &n.kind) {
                bounds.union(&mesh.geometry.bounds.transformed(&self.world_matrix(k)));
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use crate::scene::object::{Color, Geometry, Material, MaterialSet, Mesh, ShapeKind};
    use approx::assert_relative_eq;
    
    fn cube() -> Node {
        Node::new(ObjectKind::Mesh(Mesh {
            geometry: Geometry::primitive(ShapeKind::Box),
            materials: MaterialSet::Single(Material::standard(Color::WHITE)),
        }))
    }
    
    #[test]
    fn test_aabb_contains_point() {
        let aabb = AABB::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        
        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }
    
    #[test]
    fn test_empty_aabb_has_zero_size() {
        let empty = AABB::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.size(), Vec3::zeros());
    }
    
    #[test]
    fn test_add_reparents_and_refuses_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(Node::new(ObjectKind::Group));
        let b = graph.insert(Node::new(ObjectKind::Group));
        let c = graph.insert(Node::new(ObjectKind::Group));
        
        assert!(graph.add(a, c));
        assert!(graph.add(b, c));
        assert!(graph.children(a).is_empty());
        assert_eq!(graph.children(b), &[c]);
        
        assert!(graph.add(c, a));
        assert!(!graph.add(a, b), "b is an ancestor of a");
        assert!(!graph.add(c, c));
    }
    
    #[test]
    fn test_world_transform_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Node::new(ObjectKind::Group).with_position(Vec3::new(1.0, 0.0, 0.0)));
        graph.get_mut(parent).unwrap().rotation.y = PI / 2.0;
        let child = graph.insert(Node::new(ObjectKind::Group).with_position(Vec3::new(0.0, 0.0, 1.0)));
        graph.add(parent, child);
        
        let world = graph.world_transform(child);
        assert_relative_eq!(world.position, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }
    
    #[test]
    fn test_update_world_matrices_reaches_subtree() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Node::new(ObjectKind::Group));
        let child = graph.insert(Node::new(ObjectKind::Group).with_position(Vec3::new(0.0, 1.0, 0.0)));
        graph.add(parent, child);
        
        graph.get_mut(parent).unwrap().position = Vec3::new(3.0, 0.0, 0.0);
        graph.update_world_matrices(parent);
        
        let cached = graph.get(child).unwrap().matrix_world();
        assert_relative_eq!(cached.column(3).xyz(), Vec3::new(3.0, 1.0, 0.0), epsilon = 1e-6);
    }
    
    #[test]
    fn test_translate_follows_rotation() {
        let mut node = Node::new(ObjectKind::Group);
        node.rotation.y = PI / 2.0;
        node.translate_on_axis(&Vec3::z(), -2.0);
        assert_relative_eq!(node.position, Vec3::new(-2.0, 0.0, 0.0), epsilon = 1e-5);
    }
    
    #[test]
    fn test_look_at_mesh_faces_positive_z() {
        let mut graph = SceneGraph::new();
        let mesh = graph.insert(cube());
        graph.look_at(mesh, Vec3::new(0.0, 0.0, -4.0));
        let facing = graph.world_transform(mesh).rotation * Vec3::z();
        assert_relative_eq!(facing, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }
    
    #[test]
    fn test_bounding_box_uses_world_matrix() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(Node::new(ObjectKind::Group).with_position(Vec3::new(10.0, 0.0, 0.0)));
        let mesh = graph.insert(cube());
        graph.get_mut(mesh).unwrap().scale = Vec3::new(2.0, 4.0, 2.0);
        graph.add(group, mesh);
        
        let bounds = graph.bounding_box(group);
        assert_relative_eq!(bounds.center(), Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.size(), Vec3::new(2.0, 4.0, 2.0), epsilon = 1e-5);
    }
    
    #[test]
    fn test_remove_node_orphans_children() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Node::new(ObjectKind::Group));
        let child = graph.insert(Node::new(ObjectKind::Group));
        graph.add(parent, child);
        
        assert!(graph.remove_node(parent).is_some());
        assert!(graph.contains(child));
        assert_eq!(graph.parent(child), None);
    }
}
