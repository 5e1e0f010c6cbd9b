//! Interactive 3D fractal tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the scene, the single
//! [`TreeParameters`] instance and the orbit camera, and implements
//! [`eframe::App`] to render the tree and expose the parameter panel.

use eframe::App;
use tree_core::{
    config::{BRANCH_COUNT_RANGE, DEPTH_RANGE, SPIN_PER_FRAME, TRUNK_LENGTH, TreeParameters},
    phases,
    scene::SceneGraph,
    types::NodeId,
};

use crate::{camera::OrbitCamera, render};

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The tree core: [`SceneGraph`], the trunk node and [`TreeParameters`].
/// - View state (orbit camera, frame counters).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. [`Viewer::on_frame`] advances the animation if enabled.
/// 2. Panels handle input; committed `depth` / `branch_count` edits call
///    [`Viewer::regenerate`].
/// 3. The scene is flattened and drawn.
///
/// ### Fields
/// - `scene` - Scene graph holding the trunk and its branches.
/// - `trunk` - Permanent trunk node; only its descendants are rebuilt.
/// - `params` - The only parameter instance, bound to the config panel.
///
/// - `camera` - Orbit camera used for projection.
///
/// - `frames` - Frames ticked since start.
/// - `spun_frames` - Frames in which the tree actually rotated.
/// - `last_error` - Message of the last failed regeneration, if any.
pub struct Viewer {
    scene: SceneGraph,
    trunk: NodeId,
    params: TreeParameters,

    camera: OrbitCamera,

    frames: u64,
    spun_frames: u64,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer with a freshly generated default tree.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`], or the error raised while planting
    /// or generating the initial tree.
    pub fn new() -> tree_core::Result<Self> {
        let mut scene = SceneGraph::new();
        let params = TreeParameters::default();
        let trunk = phases::plant_trunk(&mut scene, TRUNK_LENGTH)?;
        phases::regeneration_phase(&params, &mut scene, trunk)?;

        Ok(Self {
            scene,
            trunk,
            params,
            camera: OrbitCamera::default(),
            frames: 0,
            spun_frames: 0,
            last_error: None,
        })
    }

    /// Rebuilds the branches from the current parameters.
    ///
    /// Failures are logged and shown in the status bar; the previous
    /// hierarchy stays in place.
    fn regenerate(&mut self) {
        match phases::regeneration_phase(&self.params, &mut self.scene, self.trunk) {
            Ok(_) => self.last_error = None,
            Err(err) => {
                log::error!("regeneration failed: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Frame tick: spins the tree once if animation is enabled.
    fn on_frame(&mut self) {
        self.frames += 1;
        if phases::animation_phase(&self.params, &mut self.scene, self.trunk) > 0 {
            self.spun_frames += 1;
        }
    }

    /// Advances the spin by a single frame regardless of `animated`.
    fn step_once(&mut self) {
        phases::spin(&mut self.scene, self.trunk, SPIN_PER_FRAME);
        self.spun_frames += 1;
    }

    /// Clears the accumulated spin and rebuilds the branches at rest.
    fn reset_pose(&mut self) {
        match phases::reset_pose(&self.params, &mut self.scene, self.trunk) {
            Ok(_) => self.last_error = None,
            Err(err) => {
                log::error!("pose reset failed: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Restores default parameters and rebuilds the tree.
    fn reset_params(&mut self) {
        self.params = TreeParameters::default();
        self.regenerate();
    }

    /// Adds a `u32` [`egui::DragValue`] whose typed text is only written
    /// back once editing ends (Enter or focus loss).
    fn commit_drag_u32(
        ui: &mut egui::Ui,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) -> egui::Response {
        ui.add(
            egui::DragValue::new(value)
                .range(range)
                .speed(speed)
                .update_while_editing(false),
        )
    }

    /// `true` when a drag is released or a typed value is accepted.
    fn is_committed(response: &egui::Response) -> bool {
        response.drag_stopped() || (response.changed() && !response.dragged())
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    ///
    /// ### Returns
    /// `true` once the edit is committed. Intermediate drag values and
    /// partially typed numbers return `false`.
    fn labeled_commit_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            Self::is_committed(&Self::commit_drag_u32(ui, value, range, speed))
        })
        .inner
    }

    /// Builds the top panel UI (animation controls, regeneration, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.params.animated {
                        "⏸ Pause"
                    } else {
                        "▶ Animate"
                    })
                    .clicked()
                {
                    self.params.animated = !self.params.animated;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Regenerate").clicked() {
                    self.regenerate();
                }

                if ui.button("Reset pose").clicked() {
                    self.reset_pose();
                }

                if ui.button("Reset view").clicked() {
                    self.camera = OrbitCamera::default();
                }

                ui.separator();
                ui.add(
                    egui::Slider::new(&mut self.camera.distance, OrbitCamera::DISTANCE_RANGE)
                        .text("Distance"),
                );
            });
        });
    }

    /// Builds the bottom status bar (node counts, frame counters, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frames = {}", self.frames));
                ui.label(format!("spun = {}", self.spun_frames));
                ui.separator();
                ui.label(format!("nodes = {}", self.scene.subtree(self.trunk).len()));
                ui.label(format!("levels = {:?}", self.scene.level_counts(self.trunk)));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand parameter panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Tree");

                ui.separator();
                ui.label("Structure");
                let mut commit = false;
                commit |= Self::labeled_commit_u32(
                    ui,
                    "depth:",
                    &mut self.params.depth,
                    DEPTH_RANGE,
                    0.05,
                );
                commit |= Self::labeled_commit_u32(
                    ui,
                    "branch_count:",
                    &mut self.params.branch_count,
                    BRANCH_COUNT_RANGE,
                    0.05,
                );
                if commit {
                    self.regenerate();
                }

                ui.separator();
                ui.label("Animation");
                ui.checkbox(&mut self.params.animated, "animated");

                ui.separator();
                if ui.button("Reset params to default").clicked() {
                    self.reset_params();
                }
            });
    }

    /// Builds the central panel where the tree is drawn and orbited.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with drag.
            if response.dragged() {
                self.camera.orbit(response.drag_delta());
            }

            // Dolly with the scroll wheel.
            if response.hovered() {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    self.camera.zoom(scroll);
                }
            }

            let projector = self.camera.projector(rect);
            let segments = self.scene.flatten(self.trunk);

            render::draw_ground(&painter, &projector);
            render::draw_shadows(&painter, &projector, &segments);
            render::draw_segments(&painter, &projector, &segments);

            if self.params.animated {
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback, invoked once per frame.
    ///
    /// This method:
    /// - Ticks the animation.
    /// - Renders the top control bar, status bar and parameter panel.
    /// - Draws the tree and handles camera interaction.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.on_frame();
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_core::generator::expected_level_counts;

    fn trunk_yaw(viewer: &Viewer) -> f32 {
        viewer.scene.get(viewer.trunk).unwrap().transform.yaw
    }

    #[test]
    fn new_builds_default_tree() {
        let viewer = Viewer::new().unwrap();
        assert_eq!(viewer.params, TreeParameters::default());
        assert_eq!(
            viewer.scene.level_counts(viewer.trunk),
            expected_level_counts(&viewer.params)
        );
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn on_frame_spins_only_while_animated() {
        let mut viewer = Viewer::new().unwrap();
        viewer.params.animated = true;
        for _ in 0..3 {
            viewer.on_frame();
        }
        viewer.params.animated = false;
        for _ in 0..4 {
            viewer.on_frame();
        }

        assert_eq!(viewer.frames, 7);
        assert_eq!(viewer.spun_frames, 3);
        assert!((trunk_yaw(&viewer) - 3.0 * SPIN_PER_FRAME).abs() < 1e-6);
    }

    #[test]
    fn step_once_spins_while_paused() {
        let mut viewer = Viewer::new().unwrap();
        viewer.params.animated = false;
        viewer.step_once();
        assert!((trunk_yaw(&viewer) - SPIN_PER_FRAME).abs() < 1e-6);
        assert_eq!(viewer.spun_frames, 1);
    }

    #[test]
    fn regenerate_applies_committed_parameters() {
        let mut viewer = Viewer::new().unwrap();
        viewer.params.depth = 1;
        viewer.params.branch_count = 3;

        viewer.regenerate();

        assert_eq!(viewer.scene.level_counts(viewer.trunk), vec![3]);
    }

    #[test]
    fn failed_regeneration_keeps_tree_and_reports() {
        let mut viewer = Viewer::new().unwrap();
        let before = viewer.scene.subtree(viewer.trunk);

        viewer.params.branch_count = 42;
        viewer.regenerate();

        assert!(viewer.last_error.is_some());
        assert_eq!(viewer.scene.subtree(viewer.trunk), before);
    }

    #[test]
    fn reset_pose_unwinds_spin() {
        let mut viewer = Viewer::new().unwrap();
        viewer.params.animated = true;
        for _ in 0..10 {
            viewer.on_frame();
        }

        viewer.reset_pose();

        assert!(viewer.last_error.is_none());
        for id in viewer.scene.subtree(viewer.trunk) {
            assert_eq!(viewer.scene.get(id).unwrap().transform.yaw, 0.0);
        }
    }

    /// Runs one headless frame showing a committing `DragValue` bound to
    /// `value`, recording every committed value.
    ///
    /// ### Returns
    /// The widget's rect, for aiming pointer events in later frames.
    fn run_frame(
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        modifiers: egui::Modifiers,
        value: &mut u32,
        commits: &mut Vec<u32>,
    ) -> egui::Rect {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(400.0, 300.0),
            )),
            modifiers,
            events,
            ..Default::default()
        };
        let mut rect = egui::Rect::NOTHING;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let response =
                    Viewer::commit_drag_u32(ui, &mut *value, BRANCH_COUNT_RANGE, 0.05);
                if Viewer::is_committed(&response) {
                    commits.push(*value);
                }
                rect = response.rect;
            });
        });
        rect
    }

    #[test]
    fn typed_value_commits_once_on_enter() {
        use egui::{Event, Key, Modifiers, PointerButton};

        let ctx = egui::Context::default();
        let mut value = 3;
        let mut commits = Vec::new();
        let mut frame = |events: Vec<Event>, modifiers: Modifiers| {
            run_frame(&ctx, events, modifiers, &mut value, &mut commits)
        };
        let key = |key: Key, modifiers: Modifiers| Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        };
        let button = |pos: egui::Pos2, pressed: bool| Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        };

        frame(vec![], Modifiers::NONE);
        let center = frame(vec![], Modifiers::NONE).center();

        // Click into the field to start text editing.
        frame(vec![Event::PointerMoved(center)], Modifiers::NONE);
        frame(vec![button(center, true)], Modifiers::NONE);
        frame(vec![button(center, false)], Modifiers::NONE);
        frame(vec![], Modifiers::NONE);

        frame(vec![key(Key::A, Modifiers::COMMAND)], Modifiers::COMMAND);
        frame(vec![Event::Text("1".to_owned())], Modifiers::NONE);
        frame(vec![Event::Text("0".to_owned())], Modifiers::NONE);
        frame(vec![key(Key::Enter, Modifiers::NONE)], Modifiers::NONE);
        frame(vec![], Modifiers::NONE);

        assert_eq!(value, 10);
        assert_eq!(commits, vec![10], "intermediate text must not commit");
    }

    #[test]
    fn reset_params_restores_defaults_and_rebuilds() {
        let mut viewer = Viewer::new().unwrap();
        viewer.params = TreeParameters::new(0, 0, false).unwrap();
        viewer.regenerate();
        assert!(viewer.scene.level_counts(viewer.trunk).is_empty());

        viewer.reset_params();

        assert_eq!(viewer.params, TreeParameters::default());
        assert_eq!(
            viewer.scene.level_counts(viewer.trunk),
            expected_level_counts(&viewer.params)
        );
    }
}
