//! Public backend API
//!
//! This module contains the contract between the scene construction core and
//! whatever consumes its command stream, plus the options handed over at
//! initialization.

pub mod render_backend;
pub mod renderer_config;

pub use render_backend::{SceneBackend, BackendError, BackendResult};
pub use renderer_config::RenderOptions;
