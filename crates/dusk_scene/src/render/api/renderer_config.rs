//! Renderer process options handed to the backend at initialization
//!
//! These mirror the handful of switches the renderer accepts before any
//! scene command is issued. The script driver folds `quick_render` and
//! `image_file` into the film and sampler records, and the `.pbrt` writer
//! honors `quiet`.

use serde::{Deserialize, Serialize};

/// Options passed to [`SceneBackend::init`](super::SceneBackend::init)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Worker threads the renderer may use, `0` lets the renderer decide
    pub n_threads: usize,
    /// Quarter the film resolution and take one sample per pixel
    pub quick_render: bool,
    /// Leave comment lines out of written scene files
    pub quiet: bool,
    /// Overrides the film's output filename when set
    pub image_file: Option<String>,
}

impl RenderOptions {
    /// Create options that use every available hardware thread
    pub fn new() -> Self {
        Self {
            n_threads: std::thread::available_parallelism().map_or(0, usize::from),
            ..Self::default()
        }
    }

    /// Set the worker thread count
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Render a fast preview
    pub fn with_quick_render(mut self, quick_render: bool) -> Self {
        self.quick_render = quick_render;
        self
    }

    /// Override the output image filename
    pub fn with_image_file(mut self, image_file: impl Into<String>) -> Self {
        self.image_file = Some(image_file.into());
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            n_threads: 0,
            quick_render: false,
            quiet: false,
            image_file: None,
        }
    }
}
