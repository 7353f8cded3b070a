//! Scene command stream
//!
//! Everything the scene construction core hands to a renderer goes through
//! this module:
//!
//! - [`params`]: typed parameter records attached to commands
//! - [`api`]: the [`SceneBackend`] contract and render options
//! - [`commands`]: commands as values, printable in `.pbrt` syntax
//! - [`backends`]: in-memory and `.pbrt` file backends

pub mod api;
pub mod backends;
pub mod commands;
pub mod params;

pub use api::{BackendError, BackendResult, RenderOptions, SceneBackend};
pub use backends::{PbrtWriter, RecordingBackend};
pub use commands::SceneCommand;
pub use params::{ParamItem, ParamSet, ParamValue};
