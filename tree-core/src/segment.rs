use glam::Vec3;

use crate::config::{BASE_RADIUS, TIP_RADIUS};

/// A single tapered cylinder primitive.
///
/// The primitive is modelled centered on its local origin and then shifted
/// by `offset = (0, length / 2, 0)`, so its base sits at the node origin
/// (the parent attachment point) and its tip extends along local +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub length: f32,
    pub base_radius: f32,
    pub tip_radius: f32,
    pub offset: Vec3,
    pub cast_shadow: bool,
}

/// Builds a shadow-casting segment of the given length.
///
/// `length` is positive by construction (see
/// [`crate::generator::child_length`]); the radii are fixed and do not
/// vary with depth.
pub fn build_segment(length: f32) -> Segment {
    Segment {
        length,
        base_radius: BASE_RADIUS,
        tip_radius: TIP_RADIUS,
        offset: Vec3::new(0.0, length * 0.5, 0.0),
        cast_shadow: true,
    }
}

impl Segment {
    /// Base of the segment in node-local space.
    pub fn base(&self) -> Vec3 {
        self.offset - Vec3::Y * (self.length * 0.5)
    }

    /// Tip of the segment in node-local space.
    pub fn tip(&self) -> Vec3 {
        self.offset + Vec3::Y * (self.length * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_is_shifted_by_half_length() {
        let s = build_segment(3.0);
        assert_eq!(s.offset, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(s.base(), Vec3::ZERO);
        assert_eq!(s.tip(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn segment_tapers_and_casts_shadow() {
        let s = build_segment(0.25);
        assert!(s.tip_radius < s.base_radius);
        assert!(s.cast_shadow);
    }
}
