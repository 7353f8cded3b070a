//! Scene session
//!
//! The session is the handle a scene script builds through. It owns the
//! backend, the graphics state stack and the registries, checks every call
//! against the lifecycle and scope rules, and only then forwards it.
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized --init--> OptionsBlock --world_begin--> WorldBlock
//!       ^                  |      ^                        |
//!       +-----cleanup------+      +-------world_end--------+
//! ```

use crate::core::config::SceneSettings;
use crate::foundation::math::{Transformation, Vec3};
use crate::render::{ParamSet, RenderOptions, SceneBackend};

use super::error::{SceneError, SceneResult};
use super::graphics_state::{GraphicsStateStack, ScopeKind};
use super::material_registry::{MaterialEntry, MaterialRegistry, TextureEntry};
use super::object_registry::{MaterialRef, TemplateDefinition, TemplatePart, TemplateRegistry};
use super::placement::PlacementRule;

/// Where in the command stream the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiState {
    /// Before `init` or after `cleanup`
    Uninitialized,
    /// Between `init` and `world_begin`
    OptionsBlock,
    /// Between `world_begin` and `world_end`
    WorldBlock,
}

/// Scene under construction
pub struct SceneSession<B: SceneBackend> {
    backend: B,
    settings: SceneSettings,
    api_state: ApiState,
    graphics: GraphicsStateStack,
    materials: MaterialRegistry,
    templates: TemplateRegistry,
}

impl<B: SceneBackend> SceneSession<B> {
    /// Create a session with default settings
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, SceneSettings::default())
    }

    /// Create a session with explicit settings
    pub fn with_settings(backend: B, settings: SceneSettings) -> Self {
        Self {
            backend,
            api_state: ApiState::Uninitialized,
            graphics: GraphicsStateStack::new(),
            materials: MaterialRegistry::new(settings.duplicates),
            templates: TemplateRegistry::new(settings.duplicates),
            settings,
        }
    }

    fn verify(&self, expected: ApiState, call: &str) -> SceneResult<()> {
        if self.api_state == expected {
            Ok(())
        } else {
            Err(SceneError::protocol(format!(
                "{call} is only allowed in {expected:?}, session is in {:?}",
                self.api_state
            )))
        }
    }

    fn verify_initialized(&self, call: &str) -> SceneResult<()> {
        if self.api_state == ApiState::Uninitialized {
            return Err(SceneError::protocol(format!("{call} called before init")));
        }
        Ok(())
    }

    // ----- lifecycle -----

    /// Start the command stream
    pub fn init(&mut self, options: &RenderOptions) -> SceneResult<()> {
        self.verify(ApiState::Uninitialized, "Init")?;
        log::info!("Initializing scene session ({} threads)", options.n_threads);
        self.backend.init(options)?;
        self.api_state = ApiState::OptionsBlock;
        Ok(())
    }

    /// End the command stream and forget every definition
    pub fn cleanup(&mut self) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "Cleanup")?;
        self.backend.cleanup()?;
        self.api_state = ApiState::Uninitialized;
        self.graphics = GraphicsStateStack::new();
        self.materials = MaterialRegistry::new(self.settings.duplicates);
        self.templates = TemplateRegistry::new(self.settings.duplicates);
        log::info!("Scene session cleaned up");
        Ok(())
    }

    // ----- options block -----

    /// Camera description
    pub fn camera(&mut self, kind: &str, params: &ParamSet) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "Camera")?;
        Ok(self.backend.camera(kind, params)?)
    }

    /// Film description
    pub fn film(&mut self, kind: &str, params: &ParamSet) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "Film")?;
        Ok(self.backend.film(kind, params)?)
    }

    /// Sampler description
    pub fn sampler(&mut self, kind: &str, params: &ParamSet) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "Sampler")?;
        Ok(self.backend.sampler(kind, params)?)
    }

    /// Integrator description
    pub fn integrator(&mut self, kind: &str, params: &ParamSet) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "Integrator")?;
        Ok(self.backend.integrator(kind, params)?)
    }

    /// Initial view transform
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "LookAt")?;
        Ok(self.backend.look_at(eye, target, up)?)
    }

    /// Shutter interval for animated transforms
    pub fn transform_times(&mut self, start: f32, end: f32) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "TransformTimes")?;
        Ok(self.backend.transform_times(start, end)?)
    }

    // ----- world block and scopes -----

    /// Open the world block with a fresh graphics state
    pub fn world_begin(&mut self) -> SceneResult<()> {
        self.verify(ApiState::OptionsBlock, "WorldBegin")?;
        self.backend.world_begin()?;
        self.graphics = GraphicsStateStack::new();
        self.api_state = ApiState::WorldBlock;
        Ok(())
    }

    /// Close the world block; every scope opened inside it must be closed
    pub fn world_end(&mut self) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "WorldEnd")?;
        if self.graphics.depth() > 0 {
            return Err(SceneError::protocol(format!(
                "WorldEnd with {} scope(s) still open",
                self.graphics.depth()
            )));
        }
        self.backend.world_end()?;
        self.api_state = ApiState::OptionsBlock;
        Ok(())
    }

    /// Open an attribute scope
    pub fn attribute_begin(&mut self) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "AttributeBegin")?;
        self.graphics.begin(ScopeKind::Attribute)?;
        Ok(self.backend.attribute_begin()?)
    }

    /// Close the innermost attribute scope
    pub fn attribute_end(&mut self) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "AttributeEnd")?;
        self.graphics.end(ScopeKind::Attribute)?;
        Ok(self.backend.attribute_end()?)
    }

    /// Open an object definition scope
    pub fn object_begin(&mut self, name: &str) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "ObjectBegin")?;
        self.graphics.begin(ScopeKind::Object)?;
        Ok(self.backend.object_begin(name)?)
    }

    /// Close the object definition scope
    pub fn object_end(&mut self) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "ObjectEnd")?;
        self.graphics.end(ScopeKind::Object)?;
        Ok(self.backend.object_end()?)
    }

    // ----- transforms and bindings -----

    /// Post-multiply a translation
    pub fn translate(&mut self, delta: Vec3) -> SceneResult<()> {
        self.verify_initialized("Translate")?;
        self.graphics.translate(delta);
        Ok(self.backend.translate(delta)?)
    }

    /// Post-multiply a scale
    pub fn scale(&mut self, factors: Vec3) -> SceneResult<()> {
        self.verify_initialized("Scale")?;
        self.graphics.scale(factors);
        Ok(self.backend.scale(factors)?)
    }

    /// Post-multiply a rotation
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) -> SceneResult<()> {
        self.verify_initialized("Rotate")?;
        self.graphics.rotate(degrees, axis);
        Ok(self.backend.rotate(degrees, axis)?)
    }

    /// Issue translate, scale and rotate for `transform`, in that order
    pub fn apply_transform(&mut self, transform: &Transformation) -> SceneResult<()> {
        self.translate(transform.translate)?;
        self.scale(transform.scale)?;
        self.rotate(transform.degrees, transform.axis)
    }

    /// Bind a named material
    pub fn named_material(&mut self, name: &str) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "NamedMaterial")?;
        if self.materials.material(name).is_none() {
            log::warn!("NamedMaterial: material \"{}\" has not been defined", name);
        }
        self.graphics.bind_material(name);
        Ok(self.backend.named_material(name)?)
    }

    /// Declare a light under the current transform
    pub fn light_source(&mut self, kind: &str, params: &ParamSet) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "LightSource")?;
        Ok(self.backend.light_source(kind, params)?)
    }

    /// Hand an external description file to the backend; an empty path does nothing
    pub fn parse_file(&mut self, path: &str) -> SceneResult<()> {
        self.verify_initialized("ParseFile")?;
        if path.is_empty() {
            return Ok(());
        }
        Ok(self.backend.parse_file(path)?)
    }

    // ----- materials and textures -----

    /// Define an image-mapped spectrum texture
    pub fn define_texture(&mut self, name: &str, image_path: &str, uscale: f32, vscale: f32) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "Texture")?;
        let texture = TextureEntry::image(name, image_path, uscale, vscale);
        let params = texture.params();
        self.materials.register_texture(texture.clone())?;
        log::debug!("Texture \"{}\" from {}", name, image_path);
        Ok(self.backend.texture(&texture.name, &texture.value_type, &texture.class, &params)?)
    }

    /// Define a material whose `Kd` is bound to an already defined texture
    pub fn define_material(&mut self, name: &str, kind: &str, texture: &str) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "MakeNamedMaterial")?;
        let material = MaterialEntry {
            name: name.to_owned(),
            kind: kind.to_owned(),
            kd_texture: texture.to_owned(),
        };
        let params = material.params();
        self.materials.register_material(material)?;
        log::debug!("Material \"{}\" ({}) bound to texture \"{}\"", name, kind, texture);
        Ok(self.backend.make_named_material(name, &params)?)
    }

    /// Define a matte material and its image texture under the same name
    pub fn add_image_material(&mut self, name: &str, image_path: &str) -> SceneResult<()> {
        self.define_texture(name, image_path, 1.0, 1.0)?;
        self.define_material(name, "matte", name)
    }

    // ----- templates and instances -----

    /// Define a reusable object template
    ///
    /// When the three lists of the definition differ in length the template
    /// stays undefined, nothing is sent to the backend and `Ok(false)` is
    /// returned. Instancing the name later fails in the backend.
    pub fn define_template(&mut self, definition: &TemplateDefinition) -> SceneResult<bool> {
        self.verify(ApiState::WorldBlock, "ObjectBegin")?;
        let Some(template) = definition.assemble() else {
            log::warn!(
                "Template \"{}\" skipped: {} materials, {} transforms, {} includes",
                definition.name,
                definition.materials.len(),
                definition.transforms.len(),
                definition.includes.len()
            );
            return Ok(false);
        };
        self.templates.check_available(&template.name)?;

        self.object_begin(&template.name)?;
        for part in &template.parts {
            self.emit_part(part)?;
        }
        self.object_end()?;

        log::debug!("Template \"{}\" defined with {} parts", template.name, template.parts.len());
        self.templates.insert(template);
        Ok(true)
    }

    fn emit_part(&mut self, part: &TemplatePart) -> SceneResult<()> {
        self.attribute_begin()?;
        self.apply_transform(&part.transform)?;
        match &part.material {
            MaterialRef::Named(name) => self.named_material(name)?,
            MaterialRef::File(path) => self.parse_file(path)?,
        }
        self.parse_file(&part.include)?;
        self.attribute_end()
    }

    /// Place one instance of a template
    ///
    /// Emits its own attribute scope around the placement and the instance.
    /// Unknown names are not rejected here; the backend reports them.
    pub fn instance(&mut self, name: &str, placement: &Transformation) -> SceneResult<()> {
        self.verify(ApiState::WorldBlock, "ObjectInstance")?;
        if self.graphics.in_object_definition() {
            return Err(SceneError::protocol("ObjectInstance can't be called inside an object definition"));
        }
        if !self.templates.contains(name) {
            log::warn!("ObjectInstance: template \"{}\" is not defined in this session", name);
        }

        self.attribute_begin()?;
        self.apply_transform(placement)?;
        self.backend.object_instance(name)?;
        self.attribute_end()
    }

    /// Place every instance produced by `rule`, returning how many were placed
    pub fn place_row(&mut self, name: &str, rule: &PlacementRule) -> SceneResult<usize> {
        let mut placed = 0;
        for placement in rule {
            self.instance(name, &placement)?;
            placed += 1;
        }
        log::debug!("Placed a row of {} \"{}\" instances", placed, name);
        Ok(placed)
    }

    // ----- accessors -----

    /// Current lifecycle state
    pub fn api_state(&self) -> ApiState {
        self.api_state
    }

    /// Graphics state stack
    pub fn graphics(&self) -> &GraphicsStateStack {
        &self.graphics
    }

    /// Material and texture registry
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Template registry
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back
    pub fn into_backend(self) -> B {
        self.backend
    }
}
