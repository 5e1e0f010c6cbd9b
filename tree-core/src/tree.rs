use glam::{Quat, Vec3};

use crate::segment::Segment;

/// One node of a generated tree, owning its whole subtree.
///
/// The generator produces these as plain values; nothing here refers to
/// a scene. [`crate::phases::attach_subtree`] replays a subtree into a
/// [`crate::scene::SceneGraph`].
#[derive(Clone, Debug, PartialEq)]
pub struct BranchNode {
    pub segment: Segment,
    /// Attachment point relative to the parent node.
    pub position: Vec3,
    /// Rotation about the local Y axis, applied first.
    pub azimuth: f32,
    /// Rotation about the local Z axis, applied in the azimuth frame.
    pub tilt: f32,
    /// Level below the trunk; the trunk itself is level 0.
    pub level: u32,
    pub children: Vec<BranchNode>,
}

impl BranchNode {
    pub fn new_trunk(segment: Segment) -> Self {
        Self {
            segment,
            position: Vec3::ZERO,
            azimuth: 0.0,
            tilt: 0.0,
            level: 0,
            children: Vec::new(),
        }
    }

    pub fn new_branch(
        segment: Segment,
        position: Vec3,
        azimuth: f32,
        tilt: f32,
        level: u32,
    ) -> Self {
        Self {
            segment,
            position,
            azimuth,
            tilt,
            level,
            children: Vec::new(),
        }
    }

    /// Local placement rotation: Y first, then Z in the rotated frame.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.azimuth) * Quat::from_rotation_z(self.tilt)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Node counts per level below `self`.
    ///
    /// Index 0 holds the direct children, index 1 the grandchildren, and
    /// so on. A leaf returns an empty vector.
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        let mut frontier: Vec<&BranchNode> = self.children.iter().collect();
        while !frontier.is_empty() {
            counts.push(frontier.len());
            frontier = frontier
                .into_iter()
                .flat_map(|n| n.children.iter())
                .collect();
        }
        counts
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &BranchNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::build_segment;

    fn leaf(level: u32) -> BranchNode {
        BranchNode::new_branch(build_segment(1.0), Vec3::ZERO, 0.0, 0.0, level)
    }

    #[test]
    fn counts_cover_whole_subtree() {
        let mut trunk = BranchNode::new_trunk(build_segment(2.0));
        let mut a = leaf(1);
        a.children.push(leaf(2));
        a.children.push(leaf(2));
        trunk.children.push(a);
        trunk.children.push(leaf(1));

        assert_eq!(trunk.node_count(), 5);
        assert_eq!(trunk.level_counts(), vec![2, 2]);
        assert!(trunk.children[1].level_counts().is_empty());
    }

    #[test]
    fn iter_is_pre_order() {
        let mut trunk = BranchNode::new_trunk(build_segment(2.0));
        let mut a = leaf(1);
        a.children.push(leaf(2));
        trunk.children.push(a);
        trunk.children.push(leaf(1));

        let levels: Vec<u32> = trunk.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 1]);
    }

    #[test]
    fn rotation_applies_tilt_in_azimuth_frame() {
        let node = BranchNode::new_branch(
            build_segment(1.0),
            Vec3::ZERO,
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
            1,
        );
        // Z-tilt sends +Y to -X, then the Y-turn carries -X to +Z.
        let up = node.rotation() * Vec3::Y;
        assert!((up - Vec3::Z).length() < 1e-5, "up = {up:?}");
    }
}
