//! Scene construction errors

use thiserror::Error;

use crate::render::BackendError;

/// Result type for scene construction
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while building a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Begin/End or lifecycle calls out of order
    ///
    /// This is a programming error in the scene script. The build stops and
    /// nothing already sent to the backend is rolled back.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// A material referenced a texture that was not registered before it
    #[error("Material \"{material}\" references unknown texture \"{texture}\"")]
    UnknownTexture {
        /// Material being defined
        material: String,
        /// Missing texture
        texture: String,
    },

    /// A name was defined twice while duplicates are rejected
    #[error("{kind} \"{name}\" is already defined")]
    AlreadyDefined {
        /// Kind of definition, such as "Material"
        kind: &'static str,
        /// Duplicated name
        name: String,
    },

    /// The backend refused a command
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl SceneError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
