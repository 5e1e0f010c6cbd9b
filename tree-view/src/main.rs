//! Application entry point for the 3D fractal tree viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod camera;
mod render;
mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger` with a default filter of `info`;
/// override it with `RUST_LOG`. The initial tree is generated before the
/// window opens, and the window is titled `"Fractal Tree"`.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the initial tree cannot be built, or eframe fails to create
///   the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let viewer = Viewer::new().map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;
    log::info!("starting fractal tree viewer");

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Fractal Tree",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
}
