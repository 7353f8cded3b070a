//! # Dusk Scene
//!
//! Scene authoring for physically based renderers: a small scene script
//! drives a command stream (options, world block, materials, object
//! templates and instances) into a pluggable backend.
//!
//! ## Features
//!
//! - **Scene Session**: Lifecycle and scope checking over any backend
//! - **Registries**: Textures, materials and reusable object templates
//! - **Procedural Placement**: Rows of instances with decaying scale and step
//! - **Backends**: In-memory recording and `.pbrt` text output
//! - **Configuration**: Whole scenes loaded from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dusk_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::default();
//!     let writer = PbrtWriter::new(std::io::stdout().lock());
//!     let (_, summary) = render_scene(writer, &config)?;
//!     println!("{} instances", summary.instances);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for scene authors
pub mod prelude {
    pub use crate::{
        core::config::{Config, DuplicatePolicy, SceneConfig, SceneSettings},
        foundation::math::{AxisAngle, Transformation, Vec3},
        render::{ParamSet, PbrtWriter, RecordingBackend, RenderOptions, SceneBackend, SceneCommand},
        scene::{render_scene, PlacementRule, SceneError, SceneSession, SceneSummary, TemplateDefinition},
    };
}
