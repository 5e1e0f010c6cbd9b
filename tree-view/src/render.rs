//! Painter-based rendering of flattened tree segments.
//!
//! Segments are drawn as screen-space tapered quads sorted back to front.
//! Shadow casters additionally drop a flat shadow onto the ground plane,
//! projected along a fixed directional light.

use glam::Vec3;
use tree_core::scene::SegmentInstance;

use crate::camera::{Projected, Projector};

/// Direction the light travels (from the sun towards the ground).
pub const LIGHT_DIR: Vec3 = Vec3::new(-0.4, -1.0, -0.3);

const GROUND_HALF_EXTENT: f32 = 30.0;
const GROUND_STEP: f32 = 3.0;

const BARK: egui::Color32 = egui::Color32::from_rgb(120, 82, 48);
const SHADOW: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 70);
const GRID: egui::Color32 = egui::Color32::from_gray(90);

/// Projects `p` onto the ground plane (y = 0) along `light`.
///
/// A light that does not point downwards falls back to a vertical drop.
pub fn shadow_point(p: Vec3, light: Vec3) -> Vec3 {
    if light.y >= 0.0 {
        return Vec3::new(p.x, 0.0, p.z);
    }
    p + light * (-p.y / light.y)
}

/// Corners of a quad from `a` to `b` with half-widths `ra` and `rb` pixels.
///
/// Returns `None` when both ends project onto the same pixel.
pub fn tapered_quad(a: egui::Pos2, b: egui::Pos2, ra: f32, rb: f32) -> Option<[egui::Pos2; 4]> {
    let dir = b - a;
    let len = dir.length();
    if len < 1e-3 {
        return None;
    }
    let n = egui::vec2(-dir.y, dir.x) / len;
    Some([a + n * ra, b + n * rb, b - n * rb, a - n * ra])
}

/// Simple Lambert-style shade of a segment lit by [`LIGHT_DIR`].
fn shade(base: Vec3, tip: Vec3) -> egui::Color32 {
    let axis = (tip - base).normalize_or_zero();
    let light = LIGHT_DIR.normalize();
    // A cylinder is brightest when its axis is perpendicular to the light.
    let lit = 1.0 - axis.dot(light).abs() * 0.5;
    let scale = |c: u8| (c as f32 * lit).round() as u8;
    egui::Color32::from_rgb(scale(BARK.r()), scale(BARK.g()), scale(BARK.b()))
}

pub fn draw_ground(painter: &egui::Painter, projector: &Projector) {
    let stroke = egui::Stroke::new(1.0, GRID);
    let steps = (2.0 * GROUND_HALF_EXTENT / GROUND_STEP) as i32;
    for k in 0..=steps {
        let t = -GROUND_HALF_EXTENT + k as f32 * GROUND_STEP;
        let lines = [
            (
                Vec3::new(t, 0.0, -GROUND_HALF_EXTENT),
                Vec3::new(t, 0.0, GROUND_HALF_EXTENT),
            ),
            (
                Vec3::new(-GROUND_HALF_EXTENT, 0.0, t),
                Vec3::new(GROUND_HALF_EXTENT, 0.0, t),
            ),
        ];
        for (a, b) in lines {
            if let (Some(a), Some(b)) = (projector.project(a), projector.project(b)) {
                painter.line_segment([a.pos, b.pos], stroke);
            }
        }
    }
}

pub fn draw_shadows(painter: &egui::Painter, projector: &Projector, segments: &[SegmentInstance]) {
    for s in segments.iter().filter(|s| s.cast_shadow) {
        let base = shadow_point(s.base, LIGHT_DIR);
        let tip = shadow_point(s.tip, LIGHT_DIR);
        let (Some(a), Some(b)) = (projector.project(base), projector.project(tip)) else {
            continue;
        };
        let ra = projector.pixels(s.base_radius, a.depth);
        let rb = projector.pixels(s.tip_radius, b.depth);
        if let Some(quad) = tapered_quad(a.pos, b.pos, ra, rb) {
            painter.add(egui::Shape::convex_polygon(
                quad.to_vec(),
                SHADOW,
                egui::Stroke::NONE,
            ));
        }
    }
}

/// Draws every segment as a shaded tapered quad, farthest first.
pub fn draw_segments(painter: &egui::Painter, projector: &Projector, segments: &[SegmentInstance]) {
    let mut visible: Vec<(&SegmentInstance, Projected, Projected)> = segments
        .iter()
        .filter_map(|s| Some((s, projector.project(s.base)?, projector.project(s.tip)?)))
        .collect();
    visible.sort_by(|x, y| {
        let dx = x.1.depth + x.2.depth;
        let dy = y.1.depth + y.2.depth;
        dy.total_cmp(&dx)
    });

    for (s, a, b) in visible {
        let ra = projector.pixels(s.base_radius, a.depth).max(0.5);
        let rb = projector.pixels(s.tip_radius, b.depth).max(0.5);
        let color = shade(s.base, s.tip);
        match tapered_quad(a.pos, b.pos, ra, rb) {
            Some(quad) => {
                painter.add(egui::Shape::convex_polygon(
                    quad.to_vec(),
                    color,
                    egui::Stroke::NONE,
                ));
            }
            // Seen end-on: draw the cap.
            None => {
                painter.circle_filled(a.pos, ra, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_point_lands_on_ground() {
        let p = Vec3::new(1.0, 4.0, -2.0);
        let s = shadow_point(p, LIGHT_DIR);
        assert!(s.y.abs() < 1e-6);
        // Light travels towards -x, so the shadow falls that way.
        assert!(s.x < p.x);
    }

    #[test]
    fn shadow_point_of_ground_point_is_itself() {
        let p = Vec3::new(3.0, 0.0, 5.0);
        assert_eq!(shadow_point(p, LIGHT_DIR), p);
    }

    #[test]
    fn shadow_point_falls_back_to_vertical_drop() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(shadow_point(p, Vec3::Y), Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn tapered_quad_has_requested_widths() {
        let quad = tapered_quad(egui::pos2(0.0, 0.0), egui::pos2(0.0, 10.0), 4.0, 1.0).unwrap();
        assert!(((quad[0] - quad[3]).length() - 8.0).abs() < 1e-4);
        assert!(((quad[1] - quad[2]).length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn tapered_quad_rejects_degenerate_segment() {
        let p = egui::pos2(5.0, 5.0);
        assert!(tapered_quad(p, p, 1.0, 1.0).is_none());
    }
}
