//! Core 3-D fractal tree generation and animation library.
//!
//! Main components:
//! - [`segment`] — tapered cylinder segments.
//! - [`generator`] — recursive branch generation and placement rules.
//! - [`tree`] — owned branch hierarchy produced by the generator.
//! - [`scene`] — scene graph of transformed nodes.
//! - [`phases`] — regeneration and per-frame animation.
//! - [`config`] — parameters and fixed geometric constants.
//! - [`error`] — error type shared by the scene and parameters.
//! - [`types`] — shared IDs.

pub mod config;
pub mod error;
pub mod generator;
pub mod phases;
pub mod scene;
pub mod segment;
pub mod tree;
pub mod types;

pub use error::{Error, Result};
