//! Orbit camera and world-to-screen projection for the tree view.

use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_4;

const NEAR: f32 = 0.1;
const FAR: f32 = 500.0;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 200.0;
const PITCH_LIMIT: f32 = 1.45;

/// A camera orbiting `target` at `distance`, steered by yaw and pitch.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
    pub fov_y: f32,
    pub sensitivity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.3,
            distance: 45.0,
            target: Vec3::new(0.0, 8.0, 0.0),
            fov_y: FRAC_PI_4,
            sensitivity: 0.01,
        }
    }
}

impl OrbitCamera {
    pub const DISTANCE_RANGE: std::ops::RangeInclusive<f32> = MIN_DISTANCE..=MAX_DISTANCE;

    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + dir * self.distance
    }

    /// Orbits by a screen-space drag delta (pixels).
    pub fn orbit(&mut self, delta: egui::Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch + delta.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Dollies towards the target for positive scroll, away for negative.
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
        self.distance = (self.distance / factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Builds a projector for the given drawing area.
    pub fn projector(&self, rect: egui::Rect) -> Projector {
        let aspect = rect.width() / rect.height().max(1.0);
        let proj = Mat4::perspective_rh(self.fov_y, aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        Projector {
            view_proj: proj * view,
            rect,
            focal_px: rect.height() * 0.5 / (self.fov_y * 0.5).tan(),
        }
    }
}

/// A point mapped onto the screen, with its distance along the view axis.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    pub pos: egui::Pos2,
    pub depth: f32,
}

/// Maps world-space points into a fixed screen rectangle.
pub struct Projector {
    view_proj: Mat4,
    rect: egui::Rect,
    focal_px: f32,
}

impl Projector {
    /// Projects `p`, or returns `None` when it lies behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let clip = self.view_proj * p.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let center = self.rect.center();
        Some(Projected {
            pos: egui::pos2(
                center.x + ndc.x * self.rect.width() * 0.5,
                center.y - ndc.y * self.rect.height() * 0.5,
            ),
            depth: clip.w,
        })
    }

    /// On-screen size in pixels of a world length seen at `depth`.
    pub fn pixels(&self, world: f32, depth: f32) -> f32 {
        world * self.focal_px / depth.max(NEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn target_projects_to_rect_center() {
        let camera = OrbitCamera::default();
        let rect = test_rect();
        let p = camera.projector(rect).project(camera.target).unwrap();

        assert!((p.pos - rect.center()).length() < 1e-2, "pos = {:?}", p.pos);
        assert!((p.depth - camera.distance).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = OrbitCamera::default();
        let behind = camera.eye() + (camera.eye() - camera.target);
        assert!(camera.projector(test_rect()).project(behind).is_none());
    }

    #[test]
    fn higher_points_appear_higher_on_screen() {
        let camera = OrbitCamera::default();
        let projector = camera.projector(test_rect());
        let low = projector.project(camera.target).unwrap();
        let high = projector.project(camera.target + Vec3::Y).unwrap();
        assert!(high.pos.y < low.pos.y);
    }

    #[test]
    fn orbit_clamps_pitch() {
        let mut camera = OrbitCamera::default();
        camera.orbit(egui::vec2(0.0, 10_000.0));
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.orbit(egui::vec2(0.0, -20_000.0));
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn zoom_moves_closer_and_stays_in_range() {
        let mut camera = OrbitCamera::default();
        let before = camera.distance;
        camera.zoom(100.0);
        assert!(camera.distance < before);

        for _ in 0..100 {
            camera.zoom(-1000.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn pixel_size_shrinks_with_depth() {
        let projector = OrbitCamera::default().projector(test_rect());
        assert!(projector.pixels(1.0, 10.0) > projector.pixels(1.0, 20.0));
    }
}
