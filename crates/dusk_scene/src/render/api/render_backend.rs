//! Backend abstraction for the scene command stream
//!
//! This module defines the trait a renderer (or anything standing in for
//! one) implements to receive scene commands. The scene session drives the
//! backend; it never talks to a renderer directly.

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::render::ParamSet;

use super::RenderOptions;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures reported by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// An object instance referenced a template that was never defined
    #[error("Unable to find object named \"{0}\"")]
    UnknownObject(String),

    /// An include file could not be reached
    #[error("Unable to open include file \"{0}\"")]
    Unreachable(String),

    /// Writing the command stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of scene commands
///
/// Calls arrive in the order the scene is built and that order is
/// significant. Implementations do not validate scope nesting; the session
/// has already done that before a call reaches the backend.
pub trait SceneBackend {
    /// Start of the command stream
    fn init(&mut self, options: &RenderOptions) -> BackendResult<()>;

    /// End of the command stream
    fn cleanup(&mut self) -> BackendResult<()>;

    /// Camera description
    fn camera(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()>;

    /// Film description
    fn film(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()>;

    /// Sampler description
    fn sampler(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()>;

    /// Integrator description
    fn integrator(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()>;

    /// Initial view transform
    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> BackendResult<()>;

    /// Shutter interval used for animated transforms
    fn transform_times(&mut self, start: f32, end: f32) -> BackendResult<()>;

    /// Start of the world block
    fn world_begin(&mut self) -> BackendResult<()>;

    /// End of the world block
    fn world_end(&mut self) -> BackendResult<()>;

    /// Push graphics state
    fn attribute_begin(&mut self) -> BackendResult<()>;

    /// Pop graphics state
    fn attribute_end(&mut self) -> BackendResult<()>;

    /// Start a named object definition
    fn object_begin(&mut self, name: &str) -> BackendResult<()>;

    /// Finish the current object definition
    fn object_end(&mut self) -> BackendResult<()>;

    /// Post-multiply a translation
    fn translate(&mut self, delta: Vec3) -> BackendResult<()>;

    /// Post-multiply a scale
    fn scale(&mut self, factors: Vec3) -> BackendResult<()>;

    /// Post-multiply a rotation of `degrees` around `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3) -> BackendResult<()>;

    /// Bind a named material
    fn named_material(&mut self, name: &str) -> BackendResult<()>;

    /// Define a named material
    fn make_named_material(&mut self, name: &str, params: &ParamSet) -> BackendResult<()>;

    /// Define a named texture
    fn texture(&mut self, name: &str, value_type: &str, class: &str, params: &ParamSet) -> BackendResult<()>;

    /// Instance a defined object under the current transform
    fn object_instance(&mut self, name: &str) -> BackendResult<()>;

    /// Hand an external description file to the backend's parser
    fn parse_file(&mut self, path: &str) -> BackendResult<()>;

    /// Declare a light under the current transform
    fn light_source(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()>;
}
