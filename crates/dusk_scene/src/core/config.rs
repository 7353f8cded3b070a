//! # Scene Configuration
//!
//! All settings a scene script needs, in one serializable structure. The
//! default value is the complete dusk forest scene; a TOML or RON file can
//! replace any part of it.
//!
//! ## Configuration Categories
//!
//! - **Render Settings**: camera, film, sampler and integrator records
//! - **View**: the initial look-at transform
//! - **Sky Light**: environment light and its placement
//! - **Materials**: image-mapped matte materials
//! - **Templates**: reusable object definitions
//! - **Population**: explicit instances and procedural rows
//! - **Scene Settings**: registry behavior

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Transformation, Vec3};
use crate::render::{ParamSet, RenderOptions};
use crate::scene::{PlacementRule, TemplateDefinition};

// Loading and saving live in the config module
pub use crate::config::{Config, ConfigError, Format};

/// What to do when a name is defined twice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the earlier definition and forward the new one
    #[default]
    Overwrite,
    /// Refuse the definition with an error
    Reject,
}

/// # Scene Settings
///
/// Behavior of the registries behind a scene session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Policy for textures, materials and templates defined twice
    pub duplicates: DuplicatePolicy,
}

impl SceneSettings {
    /// Set the duplicate policy
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// # Render Settings
///
/// The flat configuration records sent before the world block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Camera kind
    pub camera: String,
    /// Field of view in degrees
    pub fov: f32,
    /// Film kind
    pub film: String,
    /// Horizontal resolution
    pub x_resolution: i32,
    /// Vertical resolution
    pub y_resolution: i32,
    /// Output image written by the renderer
    pub filename: String,
    /// Sampler kind
    pub sampler: String,
    /// Samples per pixel
    pub pixel_samples: i32,
    /// Integrator kind
    pub integrator: String,
    /// Maximum path depth
    pub max_depth: i32,
    /// Shutter open and close times
    pub shutter: (f32, f32),
}

impl RenderSettings {
    /// Camera parameters
    pub fn camera_params(&self) -> ParamSet {
        ParamSet::new().with_float("fov", self.fov)
    }

    /// Film parameters
    pub fn film_params(&self) -> ParamSet {
        ParamSet::new()
            .with_int("xresolution", self.x_resolution)
            .with_int("yresolution", self.y_resolution)
            .with_string("filename", self.filename.clone())
    }

    /// Sampler parameters
    pub fn sampler_params(&self) -> ParamSet {
        ParamSet::new().with_int("pixelsamples", self.pixel_samples)
    }

    /// Integrator parameters
    pub fn integrator_params(&self) -> ParamSet {
        ParamSet::new().with_int("maxdepth", self.max_depth)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            camera: "perspective".to_string(),
            fov: 90.0,
            film: "image".to_string(),
            x_resolution: 1000,
            y_resolution: 500,
            filename: "dusk.exr".to_string(),
            sampler: "halton".to_string(),
            pixel_samples: 16,
            integrator: "path".to_string(),
            max_depth: 5,
            shutter: (0.0, 1.0),
        }
    }
}

/// # View Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Eye position
    pub eye: Vec3,
    /// Point looked at
    pub target: Vec3,
    /// Up direction
    pub up: Vec3,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(100.0, 0.0, 0.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// # Sky Light Configuration
///
/// Environment light wrapped in its own attribute scope. The rotation is
/// issued before the translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyLightConfig {
    /// Light kind
    pub kind: String,
    /// Environment map
    pub map: String,
    /// Rotation in degrees
    pub degrees: f32,
    /// Rotation axis
    pub axis: Vec3,
    /// Offset applied after the rotation
    pub translate: Vec3,
}

impl SkyLightConfig {
    /// Light parameters
    pub fn params(&self) -> ParamSet {
        ParamSet::new().with_string("mapname", self.map.clone())
    }
}

impl Default for SkyLightConfig {
    fn default() -> Self {
        Self {
            kind: "infinite".to_string(),
            map: "textures/skylight-dusk.exr".to_string(),
            degrees: 320.0,
            axis: Vec3::new(0.0, 0.0, 1.0),
            translate: Vec3::new(0.0, 0.0, -50.0),
        }
    }
}

/// Image-mapped matte material sharing its name with its texture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMaterialConfig {
    /// Material and texture name
    pub name: String,
    /// Source image
    pub image: String,
}

impl ImageMaterialConfig {
    /// Create a material entry
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// Single placed instance of a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Template name
    pub template: String,
    /// Placement
    #[serde(default)]
    pub transform: Transformation,
}

/// Procedural row of instances of one template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    /// Template name
    pub template: String,
    /// Placement rule
    #[serde(default)]
    pub rule: PlacementRule,
}

/// # Complete Scene Configuration
///
/// Top-level configuration the scene script is driven by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Registry behavior
    pub settings: SceneSettings,
    /// Options handed to the renderer at initialization
    pub options: RenderOptions,
    /// Camera, film, sampler and integrator
    pub render: RenderSettings,
    /// Initial view
    pub view: ViewConfig,
    /// Environment light, if any
    pub sky: Option<SkyLightConfig>,
    /// Materials in definition order
    pub materials: Vec<ImageMaterialConfig>,
    /// Templates in definition order
    pub templates: Vec<TemplateDefinition>,
    /// Explicitly placed instances
    pub instances: Vec<InstanceConfig>,
    /// Procedural rows
    pub rows: Vec<RowConfig>,
}

impl SceneConfig {
    /// Configuration with render settings and view only, nothing in the world
    pub fn empty() -> Self {
        Self {
            settings: SceneSettings::default(),
            options: RenderOptions::default(),
            render: RenderSettings::default(),
            view: ViewConfig::default(),
            sky: None,
            materials: Vec::new(),
            templates: Vec::new(),
            instances: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// The dusk forest: a sky light, three maple trees and a receding row of pines
    pub fn dusk() -> Self {
        const LEAVES_AUTUMN: &str = "Leaves-autumn";
        const BARK: &str = "Bark";
        const LEAVES_PINE: &str = "Leaves-pine";
        const MAPLE_TREE: &str = "mapleTree";
        const PINE_TREE: &str = "pineTree";

        let maple_part = Transformation::from_translation(Vec3::new(0.0, 0.0, -2.0))
            .with_uniform_scale(5.0)
            .with_rotation(90.0, Vec3::new(1.0, 0.0, 0.0));
        let pine_part = maple_part.with_uniform_scale(4.0);

        let maple = TemplateDefinition {
            name: MAPLE_TREE.to_string(),
            materials: vec![LEAVES_AUTUMN.to_string(), BARK.to_string()],
            transforms: vec![maple_part; 2],
            includes: vec![
                "./treegeometry/mapleTree-leaves.pbrt".to_string(),
                "./treegeometry/mapleTree-trunk.pbrt".to_string(),
            ],
        };
        let pine = TemplateDefinition {
            name: PINE_TREE.to_string(),
            materials: vec![LEAVES_PINE.to_string(), BARK.to_string()],
            transforms: vec![pine_part; 2],
            includes: vec![
                "./treegeometry/pineTree-leaves.pbrt".to_string(),
                "./treegeometry/pineTree-trunk.pbrt".to_string(),
            ],
        };

        let instances = [75.0, 120.0, 175.0]
            .into_iter()
            .map(|y| InstanceConfig {
                template: MAPLE_TREE.to_string(),
                transform: Transformation::from_translation(Vec3::new(-10.0, y, 0.0)),
            })
            .collect();

        let pines = PlacementRule::new(
            Transformation::from_translation(Vec3::new(-20.0, -120.0, 0.0)).with_uniform_scale(0.8),
            10,
        )
        .with_scale_decay(0.8)
        .with_step(Vec3::new(-8.0, 40.0, 0.0), Vec3::new(1.0, 0.7, 1.0));

        Self {
            options: RenderOptions::new(),
            sky: Some(SkyLightConfig::default()),
            materials: vec![
                ImageMaterialConfig::new(LEAVES_AUTUMN, "./treeTexture/Leaves-2.png"),
                ImageMaterialConfig::new(BARK, "./treeTexture/Bark-4.png"),
                ImageMaterialConfig::new(LEAVES_PINE, "./treeTexture/Leaves-4.png"),
            ],
            templates: vec![maple, pine],
            instances,
            rows: vec![RowConfig {
                template: PINE_TREE.to_string(),
                rule: pines,
            }],
            ..Self::empty()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.render.x_resolution <= 0 || self.render.y_resolution <= 0 {
            return Err("Film resolution must be positive".to_string());
        }
        if self.render.pixel_samples <= 0 {
            return Err("Pixel samples must be at least 1".to_string());
        }
        if (self.view.eye - self.view.target).norm() <= f32::EPSILON {
            return Err("Eye and look-at target must differ".to_string());
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::dusk()
    }
}

impl Config for SceneConfig {}
