//! High-level phases that keep a live scene in step with the parameters.
//!
//! The typical lifecycle looks like:
//! 1. [`plant_trunk`] — once, creates the permanent trunk node.
//! 2. [`regeneration_phase`] — on every commit of `depth` or
//!    `branch_count`, tears down everything below the trunk and rebuilds it
//!    from [`generator::grow_branches`].
//! 3. [`animation_phase`] — once per frame, spins every node about its own
//!    growth axis while `animated` is set.
//! 4. [`reset_pose`] — on request, clears the accumulated spin.
//!
//! Both per-frame entry points are synchronous tree walks driven by an
//! external frame clock; neither schedules itself.

use glam::Vec3;

use crate::{
    config::{SPIN_PER_FRAME, TreeParameters},
    error::{Error, Result},
    generator,
    scene::{NodeContent, SceneGraph},
    segment::build_segment,
    tree::BranchNode,
    types::NodeId,
};

/// Creates the permanent trunk under the scene root.
///
/// ### Parameters
/// - `scene` - Scene that receives the trunk.
/// - `trunk_length` - Length of the trunk segment; later regenerations
///   read it back from the trunk node.
///
/// ### Returns
/// The trunk's [`NodeId`]. It survives every regeneration.
pub fn plant_trunk(scene: &mut SceneGraph, trunk_length: f32) -> Result<NodeId> {
    let trunk = scene.create_node(NodeContent::Segment(build_segment(trunk_length)));
    scene.attach(scene.root(), trunk)?;
    Ok(trunk)
}

/// Rebuilds every descendant of `trunk` from the current parameters.
///
/// 1. Validates `params`; out-of-range values fail before anything is
///    detached, so the previous hierarchy stays on screen.
/// 2. Detaches and discards all descendants of the trunk.
/// 3. Generates fresh branches from `current_depth = 0` using the trunk's
///    own segment length and replays them via [`attach_subtree`].
///
/// Calling it repeatedly with unchanged parameters yields the same
/// geometry under new node ids.
///
/// ### Parameters
/// - `params` - Structural parameters (`depth`, `branch_count`).
/// - `scene` - Scene holding the trunk.
/// - `trunk` - Node returned by [`plant_trunk`].
///
/// ### Returns
/// The number of branch nodes created.
pub fn regeneration_phase(
    params: &TreeParameters,
    scene: &mut SceneGraph,
    trunk: NodeId,
) -> Result<usize> {
    params.validate()?;

    let trunk_length = scene
        .get(trunk)
        .and_then(|n| n.segment())
        .map(|s| s.length)
        .ok_or(Error::UnknownNode(trunk))?;

    scene.detach_all_children(trunk);

    let mut created = 0;
    for branch in generator::grow_branches(params, 0, trunk_length) {
        created += attach_subtree(scene, trunk, &branch)?;
    }

    log::info!(
        "regenerated tree: depth={} branch_count={} -> {} branches",
        params.depth,
        params.branch_count,
        created
    );
    Ok(created)
}

/// Replays an owned [`BranchNode`] subtree into scene nodes under `parent`.
///
/// Each node is positioned at its attachment point, rotated about local Y
/// by its azimuth and then about local Z by its tilt, and attached.
///
/// ### Returns
/// The number of scene nodes created.
pub fn attach_subtree(
    scene: &mut SceneGraph,
    parent: NodeId,
    branch: &BranchNode,
) -> Result<usize> {
    let id = scene.create_node(NodeContent::Segment(branch.segment));
    scene.set_local_position(id, branch.position)?;
    scene.rotate_local_axis(id, Vec3::Y, branch.azimuth)?;
    scene.rotate_local_axis(id, Vec3::Z, branch.tilt)?;
    scene.attach(parent, id)?;

    let mut created = 1;
    for child in &branch.children {
        created += attach_subtree(scene, id, child)?;
    }
    Ok(created)
}

/// Advances the spin animation by one frame.
///
/// When `params.animated` is false nothing moves and the hierarchy keeps
/// its last pose, so toggling back on resumes from there.
///
/// ### Returns
/// The number of nodes spun (0 while paused).
pub fn animation_phase(params: &TreeParameters, scene: &mut SceneGraph, trunk: NodeId) -> usize {
    if !params.animated {
        return 0;
    }
    spin(scene, trunk, SPIN_PER_FRAME)
}

/// Adds `radians` of yaw to `root` and every descendant.
///
/// Yaw accumulates without wraparound.
pub fn spin(scene: &mut SceneGraph, root: NodeId, radians: f32) -> usize {
    scene
        .subtree(root)
        .into_iter()
        .filter(|&id| scene.rotate_yaw(id, radians).is_ok())
        .count()
}

/// Returns the tree to its rest pose.
///
/// The trunk's rotation and accumulated yaw are cleared, and the branches
/// are rebuilt so every new node starts unspun.
///
/// ### Returns
/// The number of branch nodes created, as for [`regeneration_phase`].
pub fn reset_pose(
    params: &TreeParameters,
    scene: &mut SceneGraph,
    trunk: NodeId,
) -> Result<usize> {
    params.validate()?;
    scene.set_rotation(trunk, 0.0, 0.0, 0.0)?;
    regeneration_phase(params, scene, trunk)
}
