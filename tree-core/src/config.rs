use std::f32::consts::FRAC_PI_3;
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Allowed recursion depth, counted in levels below the trunk.
pub const DEPTH_RANGE: RangeInclusive<u32> = 0..=5;
/// Allowed number of children per internal node.
pub const BRANCH_COUNT_RANGE: RangeInclusive<u32> = 0..=10;

/// Azimuthal spacing unit and outward tilt of every branch (60°).
pub const BRANCH_ANGLE: f32 = FRAC_PI_3;
/// Exponent scale of the length decay `e^(-DECAY_RATE * (i + depth))`.
pub const DECAY_RATE: f32 = 0.1;
/// Yaw added to every node per animated frame, in radians.
pub const SPIN_PER_FRAME: f32 = 0.004;

pub const TRUNK_LENGTH: f32 = 10.0;
pub const BASE_RADIUS: f32 = 0.5;
/// Squared base radius. With a base below 1 this gives the strong taper.
pub const TIP_RADIUS: f32 = BASE_RADIUS * BASE_RADIUS;

/// Structural and animation parameters bound to the parameter panel.
///
/// There is a single instance per process, owned by the viewer and passed
/// by reference into [`crate::phases::regeneration_phase`] and
/// [`crate::phases::animation_phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeParameters {
    pub depth: u32,
    pub branch_count: u32,
    pub animated: bool,
}

impl Default for TreeParameters {
    fn default() -> Self {
        Self {
            depth: 3,
            branch_count: 4,
            animated: true,
        }
    }
}

impl TreeParameters {
    /// Builds a parameter set, rejecting values outside their domains.
    pub fn new(depth: u32, branch_count: u32, animated: bool) -> Result<Self> {
        let params = Self {
            depth,
            branch_count,
            animated,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks that `depth` and `branch_count` lie in [`DEPTH_RANGE`] and
    /// [`BRANCH_COUNT_RANGE`].
    pub fn validate(&self) -> Result<()> {
        check_range("depth", self.depth, &DEPTH_RANGE)?;
        check_range("branch_count", self.branch_count, &BRANCH_COUNT_RANGE)
    }
}

fn check_range(name: &'static str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::ParamOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
