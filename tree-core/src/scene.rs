//! Scene graph: CPU-side hierarchy of transformed nodes.
//!
//! Nodes live in a map keyed by [`NodeId`] under a permanent root group.
//! Each frame the renderer calls [`SceneGraph::flatten`], which walks a
//! subtree, propagates world transforms, and returns world-space segment
//! instances ready to draw.

use std::collections::HashMap;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::{
    error::{Error, Result},
    segment::Segment,
    types::NodeId,
};

/// Local transform relative to the parent node.
///
/// The local matrix is `T(position) * R(rotation) * Ry(yaw)`: `rotation`
/// holds the placement and `yaw` accumulates spin about the node's own
/// growth axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub yaw: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            yaw: 0.0,
        }
    }
}

impl LocalTransform {
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            self.rotation * Quat::from_rotation_y(self.yaw),
            self.position,
        )
    }
}

/// What a scene node contains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,
    /// A tapered cylinder.
    Segment(Segment),
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: LocalTransform,
    pub content: NodeContent,
}

impl SceneNode {
    fn new(id: NodeId, content: NodeContent) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            transform: LocalTransform::default(),
            content,
        }
    }

    pub fn segment(&self) -> Option<&Segment> {
        match &self.content {
            NodeContent::Segment(s) => Some(s),
            NodeContent::Group => None,
        }
    }
}

/// A segment resolved into world space by [`SceneGraph::flatten`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentInstance {
    pub id: NodeId,
    pub base: Vec3,
    pub tip: Vec3,
    pub base_radius: f32,
    pub tip_radius: f32,
    pub cast_shadow: bool,
}

pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates a graph holding only the root group.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(root, NodeContent::Group));

        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates a detached node with an identity transform.
    pub fn create_node(&mut self, content: NodeContent) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode::new(id, content));
        id
    }

    /// Makes `child` the last child of `parent`.
    ///
    /// A child that already has a parent is moved. Attaching a node to
    /// itself or under one of its own descendants is rejected.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child {
            return Err(Error::SelfAttach(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::Cycle { parent, child });
        }

        let old_parent = self.nodes.get(&child).and_then(|n| n.parent);
        if let Some(old_parent) = old_parent
            && let Some(old) = self.nodes.get_mut(&old_parent)
        {
            old.children.retain(|c| *c != child);
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Removes every descendant of `id`, keeping `id` itself.
    ///
    /// Returns the number of nodes removed. A node without children, or an
    /// unknown id, is a no-op.
    pub fn detach_all_children(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::warn!("detach_all_children on unknown node {id}");
            return 0;
        };
        let mut to_remove = std::mem::take(&mut node.children);

        let mut i = 0;
        while i < to_remove.len() {
            if let Some(n) = self.nodes.get(&to_remove[i]) {
                to_remove.extend_from_slice(&n.children);
            }
            i += 1;
        }

        for nid in &to_remove {
            self.nodes.remove(nid);
        }
        log::debug!("detached {} nodes below {id}", to_remove.len());
        to_remove.len()
    }

    pub fn set_local_position(&mut self, id: NodeId, position: Vec3) -> Result<()> {
        self.node_mut(id)?.transform.position = position;
        Ok(())
    }

    /// Rotates a node about `axis` expressed in its own local frame.
    pub fn rotate_local_axis(&mut self, id: NodeId, axis: Vec3, radians: f32) -> Result<()> {
        let transform = &mut self.node_mut(id)?.transform;
        transform.rotation =
            (transform.rotation * Quat::from_axis_angle(axis, radians)).normalize();
        Ok(())
    }

    /// Replaces the placement rotation with XYZ Euler angles and clears the
    /// accumulated yaw.
    pub fn set_rotation(&mut self, id: NodeId, x: f32, y: f32, z: f32) -> Result<()> {
        let transform = &mut self.node_mut(id)?.transform;
        transform.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        transform.yaw = 0.0;
        Ok(())
    }

    /// Adds `radians` to the node's accumulated yaw.
    pub fn rotate_yaw(&mut self, id: NodeId, radians: f32) -> Result<()> {
        self.node_mut(id)?.transform.yaw += radians;
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of `root` and all its descendants in pre-order.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Node counts per level below `root` (index 0 = direct children).
    pub fn level_counts(&self, root: NodeId) -> Vec<usize> {
        let mut counts = Vec::new();
        let mut frontier: Vec<NodeId> = self.children(root).collect();
        while !frontier.is_empty() {
            counts.push(frontier.len());
            frontier = frontier
                .iter()
                .flat_map(|&id| self.children(id))
                .collect();
        }
        counts
    }

    /// Computes the world matrix of every node under `root`, with `root`
    /// placed by its own local transform.
    pub fn world_transforms(&self, root: NodeId) -> Vec<(NodeId, Mat4)> {
        let mut out = Vec::new();
        let mut stack = vec![(root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_world * node.transform.to_mat4();
            out.push((id, world));
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
        out
    }

    /// Walks the subtree, propagates transforms, and collects every
    /// segment in world space.
    pub fn flatten(&self, root: NodeId) -> Vec<SegmentInstance> {
        self.world_transforms(root)
            .into_iter()
            .filter_map(|(id, world)| {
                let segment = self.nodes.get(&id)?.segment()?;
                Some(SegmentInstance {
                    id,
                    base: world.transform_point3(segment.base()),
                    tip: world.transform_point3(segment.tip()),
                    base_radius: segment.base_radius,
                    tip_radius: segment.tip_radius,
                    cast_shadow: segment.cast_shadow,
                })
            })
            .collect()
    }

    fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(&id).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))
    }

    /// True if `ancestor` lies on the parent chain of `id` (or is `id`).
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.nodes.get(&c).and_then(|n| n.parent);
        }
        false
    }
}
