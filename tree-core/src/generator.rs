//! Recursive fractal tree generation.
//!
//! The generator is a pure function of [`TreeParameters`] and a starting
//! length: it returns owned [`BranchNode`] values and never touches a
//! scene. Placement follows three fixed rules:
//!
//! 1. [`child_length`] — exponential decay in both branch index and depth.
//! 2. [`attachment_offset`] — siblings spread along the parent's span.
//! 3. [`BRANCH_ANGLE`] — each sibling turned `2 * i * angle` about local Y,
//!    then tilted `angle` about local Z.

use glam::Vec3;

use crate::{
    config::{BRANCH_ANGLE, DECAY_RATE, TreeParameters},
    segment::build_segment,
    tree::BranchNode,
};

/// Length of the `index`-th child (1-based) of a node at `current_depth`.
///
/// `current_length * e^(-DECAY_RATE * (index + current_depth))`. The
/// factor is strictly positive, so a positive parent always yields a
/// positive child. At extreme depths the product could underflow towards
/// zero; no floor is applied.
pub fn child_length(current_length: f32, index: u32, current_depth: u32) -> f32 {
    current_length * (-DECAY_RATE * (index + current_depth) as f32).exp()
}

/// Y offset of the `index`-th child along its parent.
///
/// `child_base_y` is the child's own post-translation Y (half its length)
/// and `current_length` is the parent's length. The `branch_count + 1`
/// denominator keeps every offset strictly inside the parent's span.
pub fn attachment_offset(
    child_base_y: f32,
    index: u32,
    current_length: f32,
    branch_count: u32,
) -> f32 {
    (child_base_y + index as f32 * current_length) / (branch_count + 1) as f32
}

/// Azimuth of the `index`-th sibling about the parent's local Y axis.
pub fn branch_azimuth(index: u32) -> f32 {
    2.0 * index as f32 * BRANCH_ANGLE
}

/// Builds the children of a node at `current_depth` with length
/// `current_length`, recursing until the depth limit.
///
/// Children of a node at `current_depth` live at level
/// `current_depth + 1`; nothing is created past `params.depth` levels
/// below the trunk.
pub fn grow_branches(
    params: &TreeParameters,
    current_depth: u32,
    current_length: f32,
) -> Vec<BranchNode> {
    if current_depth >= params.depth {
        return Vec::new();
    }

    (1..=params.branch_count)
        .map(|i| {
            let length = child_length(current_length, i, current_depth);
            let segment = build_segment(length);
            let offset_y =
                attachment_offset(segment.offset.y, i, current_length, params.branch_count);

            let mut node = BranchNode::new_branch(
                segment,
                Vec3::new(0.0, offset_y, 0.0),
                branch_azimuth(i),
                BRANCH_ANGLE,
                current_depth + 1,
            );
            node.children = grow_branches(params, current_depth + 1, length);
            node
        })
        .collect()
}

/// Builds a complete tree: a trunk of `trunk_length` plus its branches.
pub fn build_tree(params: &TreeParameters, trunk_length: f32) -> BranchNode {
    let mut trunk = BranchNode::new_trunk(build_segment(trunk_length));
    trunk.children = grow_branches(params, 0, trunk_length);
    trunk
}

/// Node counts per level below the trunk implied by `params`.
///
/// Level `d` (1-based) holds `branch_count^d` nodes. With no branches the
/// result is empty, matching [`BranchNode::level_counts`].
pub fn expected_level_counts(params: &TreeParameters) -> Vec<usize> {
    if params.branch_count == 0 {
        return Vec::new();
    }
    (1..=params.depth)
        .map(|d| (params.branch_count as usize).pow(d))
        .collect()
}
