//! Material and texture registry
//!
//! Textures and materials are defined once by name and referenced by name
//! afterwards. The registry is only an index of what has been defined: it
//! decides whether a definition is acceptable, the session forwards every
//! accepted definition to the backend, duplicates included.

use std::collections::HashMap;

use crate::core::config::DuplicatePolicy;
use crate::render::ParamSet;

use super::error::{SceneError, SceneResult};

/// Named image texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry {
    /// Texture name
    pub name: String,
    /// Value type, `spectrum` for color lookups
    pub value_type: String,
    /// Texture class
    pub class: String,
    /// Source image
    pub filename: String,
    /// Scale along u
    pub uscale: f32,
    /// Scale along v
    pub vscale: f32,
}

impl TextureEntry {
    /// Spectrum image-map texture
    pub fn image(name: impl Into<String>, filename: impl Into<String>, uscale: f32, vscale: f32) -> Self {
        Self {
            name: name.into(),
            value_type: "spectrum".to_string(),
            class: "imagemap".to_string(),
            filename: filename.into(),
            uscale,
            vscale,
        }
    }

    /// Parameters sent with the texture definition
    pub fn params(&self) -> ParamSet {
        ParamSet::new()
            .with_string("filename", self.filename.clone())
            .with_float("uscale", self.uscale)
            .with_float("vscale", self.vscale)
    }
}

/// Named material with its diffuse color bound to a texture
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    /// Material name
    pub name: String,
    /// Material kind, such as `matte`
    pub kind: String,
    /// Texture bound to `Kd`
    pub kd_texture: String,
}

impl MaterialEntry {
    /// Parameters sent with the material definition
    pub fn params(&self) -> ParamSet {
        ParamSet::new()
            .with_string("type", self.kind.clone())
            .with_texture("Kd", self.kd_texture.clone())
    }
}

/// Name-keyed textures and materials
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    policy: DuplicatePolicy,
    textures: HashMap<String, TextureEntry>,
    materials: HashMap<String, MaterialEntry>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Record a texture
    ///
    /// Returns `true` when an existing texture of the same name was replaced.
    pub fn register_texture(&mut self, texture: TextureEntry) -> SceneResult<bool> {
        check_duplicate(self.policy, "Texture", &texture.name, self.textures.contains_key(&texture.name))?;
        let replaced = self.textures.insert(texture.name.clone(), texture).is_some();
        Ok(replaced)
    }

    /// Record a material
    ///
    /// The bound texture must already be registered. Returns `true` when an
    /// existing material of the same name was replaced.
    pub fn register_material(&mut self, material: MaterialEntry) -> SceneResult<bool> {
        if !self.textures.contains_key(&material.kd_texture) {
            return Err(SceneError::UnknownTexture {
                material: material.name,
                texture: material.kd_texture,
            });
        }
        check_duplicate(self.policy, "Material", &material.name, self.materials.contains_key(&material.name))?;
        let replaced = self.materials.insert(material.name.clone(), material).is_some();
        Ok(replaced)
    }

    /// Look up a texture
    pub fn texture(&self, name: &str) -> Option<&TextureEntry> {
        self.textures.get(name)
    }

    /// Look up a material
    pub fn material(&self, name: &str) -> Option<&MaterialEntry> {
        self.materials.get(name)
    }

    /// Number of registered materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of registered textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

pub(crate) fn check_duplicate(
    policy: DuplicatePolicy,
    kind: &'static str,
    name: &str,
    exists: bool,
) -> SceneResult<()> {
    if !exists {
        return Ok(());
    }
    match policy {
        DuplicatePolicy::Overwrite => {
            log::warn!("{} \"{}\" redefined, replacing the earlier definition", kind, name);
            Ok(())
        }
        DuplicatePolicy::Reject => Err(SceneError::AlreadyDefined {
            kind,
            name: name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bark_material() -> MaterialEntry {
        MaterialEntry {
            name: "Bark".to_string(),
            kind: "matte".to_string(),
            kd_texture: "Bark".to_string(),
        }
    }

    #[test]
    fn test_material_requires_registered_texture() {
        let mut registry = MaterialRegistry::new(DuplicatePolicy::Overwrite);

        let result = registry.register_material(bark_material());
        assert!(matches!(result, Err(SceneError::UnknownTexture { ref texture, .. }) if texture == "Bark"));
        assert_eq!(registry.material_count(), 0);

        registry
            .register_texture(TextureEntry::image("Bark", "./treeTexture/Bark-4.png", 1.0, 1.0))
            .unwrap();
        assert!(!registry.register_material(bark_material()).unwrap());
        assert_eq!(registry.material("Bark").map(|m| m.kind.as_str()), Some("matte"));
    }

    #[test]
    fn test_overwrite_policy_replaces_silently() {
        let mut registry = MaterialRegistry::new(DuplicatePolicy::Overwrite);
        registry.register_texture(TextureEntry::image("Bark", "a.png", 1.0, 1.0)).unwrap();

        let replaced = registry.register_texture(TextureEntry::image("Bark", "b.png", 2.0, 2.0)).unwrap();
        assert!(replaced);
        assert_eq!(registry.texture_count(), 1);
        assert_eq!(registry.texture("Bark").map(|t| t.filename.as_str()), Some("b.png"));
    }

    #[test]
    fn test_reject_policy_keeps_first_definition() {
        let mut registry = MaterialRegistry::new(DuplicatePolicy::Reject);
        registry.register_texture(TextureEntry::image("Bark", "a.png", 1.0, 1.0)).unwrap();
        registry.register_material(bark_material()).unwrap();

        assert!(matches!(
            registry.register_texture(TextureEntry::image("Bark", "b.png", 1.0, 1.0)),
            Err(SceneError::AlreadyDefined { kind: "Texture", .. })
        ));
        assert!(matches!(
            registry.register_material(bark_material()),
            Err(SceneError::AlreadyDefined { kind: "Material", .. })
        ));
        assert_eq!(registry.texture("Bark").map(|t| t.filename.as_str()), Some("a.png"));
    }

    #[test]
    fn test_entry_parameters() {
        let texture = TextureEntry::image("Leaves-pine", "./treeTexture/Leaves-4.png", 1.0, 1.0);
        let params = texture.params();
        assert_eq!(params.find_string("filename"), Some("./treeTexture/Leaves-4.png"));
        assert_eq!(params.find_float("vscale"), Some(1.0));

        let params = bark_material().params();
        assert_eq!(params.find_string("type"), Some("matte"));
        assert_eq!(params.find_texture("Kd"), Some("Bark"));
    }
}
