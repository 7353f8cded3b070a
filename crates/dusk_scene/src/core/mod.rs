//! # Core Module
//!
//! Shared configuration used by every part of the crate.
//!
//! ## Organization
//!
//! - **Config**: Scene configuration, settings and their defaults
//! - **Foundation**: Low-level utilities (math, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    SceneConfig,
    SceneSettings,
    DuplicatePolicy,
    RenderSettings,
    ViewConfig,
    SkyLightConfig,
    ImageMaterialConfig,
    InstanceConfig,
    RowConfig,
    Config,
    ConfigError,
};
