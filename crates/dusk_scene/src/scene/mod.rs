//! Scene construction
//!
//! Builds a scene description on top of a [`SceneBackend`](crate::render::SceneBackend).
//!
//! ## Architecture
//!
//! ```text
//! Scene Script (SceneConfig)
//!      ↓
//! Scene Session (lifecycle, graphics state, registries)
//!      ↓
//! Scene Backend (recording, .pbrt writer)
//! ```
//!
//! The session:
//! - Enforces the options/world lifecycle and balanced scopes
//! - Keeps material, texture and object template registries
//! - Places instances one at a time or along a procedural row

mod error;
mod graphics_state;
mod material_registry;
mod object_registry;
mod placement;
mod session;
mod script;

#[cfg(test)]
mod tests;

pub use error::{SceneError, SceneResult};
pub use graphics_state::{GraphicsState, GraphicsStateStack, ScopeKind, TransformOp};
pub use material_registry::{MaterialEntry, MaterialRegistry, TextureEntry};
pub use object_registry::{MaterialRef, ObjectTemplate, TemplateDefinition, TemplatePart, TemplateRegistry};
pub use placement::{PlacementRule, Placements};
pub use session::{ApiState, SceneSession};
pub use script::{add_sky_light, configure_renderer, populate_world, render_scene, SceneSummary};
