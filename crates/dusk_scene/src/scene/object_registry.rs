//! Object template registry
//!
//! A template is a named group of parts, each part a placement plus either a
//! material binding or an external description file, and optionally a
//! geometry include. Templates are defined once and then instanced by name
//! any number of times.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::config::DuplicatePolicy;
use crate::foundation::math::Transformation;

use super::error::SceneResult;
use super::material_registry::check_duplicate;

/// What a template part binds before its geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialRef {
    /// A material defined through the material registry
    Named(String),
    /// A `.pbrt` file parsed in place of a material binding
    File(String),
}

impl MaterialRef {
    /// Classify a material string: `.pbrt` files are parsed, anything else is a material name
    pub fn parse(value: &str) -> Self {
        if value.ends_with(".pbrt") {
            Self::File(value.to_owned())
        } else {
            Self::Named(value.to_owned())
        }
    }
}

/// One entry of a template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePart {
    /// Placement of this part inside the template
    pub transform: Transformation,
    /// Material binding or description file
    pub material: MaterialRef,
    /// Geometry include, empty for none
    pub include: String,
}

/// A named, reusable group of parts
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    /// Template name
    pub name: String,
    /// Parts in emission order
    pub parts: Vec<TemplatePart>,
}

/// Template definition as written in a scene file
///
/// Three parallel lists, one element per part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDefinition {
    /// Template name
    pub name: String,
    /// Material name or `.pbrt` file per part
    pub materials: Vec<String>,
    /// Placement per part
    pub transforms: Vec<Transformation>,
    /// Geometry include per part
    pub includes: Vec<String>,
}

impl TemplateDefinition {
    /// Zip the three lists into a template
    ///
    /// Returns `None` unless all three lists have the same length.
    pub fn assemble(&self) -> Option<ObjectTemplate> {
        let len = self.materials.len();
        if self.transforms.len() != len || self.includes.len() != len {
            return None;
        }

        let parts = self
            .materials
            .iter()
            .zip(&self.transforms)
            .zip(&self.includes)
            .map(|((material, transform), include)| TemplatePart {
                transform: *transform,
                material: MaterialRef::parse(material),
                include: include.clone(),
            })
            .collect();

        Some(ObjectTemplate {
            name: self.name.clone(),
            parts,
        })
    }
}

/// Name-keyed templates
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    policy: DuplicatePolicy,
    templates: HashMap<String, ObjectTemplate>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            templates: HashMap::new(),
        }
    }

    /// Check that `name` may be defined under the duplicate policy
    pub fn check_available(&self, name: &str) -> SceneResult<()> {
        check_duplicate(self.policy, "Template", name, self.templates.contains_key(name))
    }

    /// Record a template
    pub fn register(&mut self, template: ObjectTemplate) -> SceneResult<()> {
        self.check_available(&template.name)?;
        self.insert(template);
        Ok(())
    }

    /// Record a template already checked with [`TemplateRegistry::check_available`]
    pub(crate) fn insert(&mut self, template: ObjectTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Look up a template
    pub fn get(&self, name: &str) -> Option<&ObjectTemplate> {
        self.templates.get(name)
    }

    /// Whether a template is defined
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Number of defined templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template is defined
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneError;

    fn definition(materials: usize, transforms: usize, includes: usize) -> TemplateDefinition {
        TemplateDefinition {
            name: "mapleTree".to_string(),
            materials: vec!["Leaves-autumn".to_string(); materials],
            transforms: vec![Transformation::default(); transforms],
            includes: vec!["./treegeometry/mapleTree-leaves.pbrt".to_string(); includes],
        }
    }

    #[test]
    fn test_assemble_rejects_any_length_mismatch() {
        assert!(definition(2, 2, 1).assemble().is_none());
        assert!(definition(2, 1, 2).assemble().is_none());
        assert!(definition(1, 2, 2).assemble().is_none());
        assert!(definition(2, 3, 1).assemble().is_none());
        assert_eq!(definition(2, 2, 2).assemble().map(|t| t.parts.len()), Some(2));
        assert_eq!(definition(0, 0, 0).assemble().map(|t| t.parts.len()), Some(0));
    }

    #[test]
    fn test_material_strings_are_classified() {
        assert_eq!(MaterialRef::parse("Bark"), MaterialRef::Named("Bark".to_string()));
        assert_eq!(
            MaterialRef::parse("./materials/bark.pbrt"),
            MaterialRef::File("./materials/bark.pbrt".to_string())
        );
    }

    #[test]
    fn test_register_and_duplicates() {
        let template = definition(2, 2, 2).assemble().unwrap();

        let mut registry = TemplateRegistry::new(DuplicatePolicy::Overwrite);
        registry.register(template.clone()).unwrap();
        registry.register(template.clone()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("mapleTree"));

        let mut strict = TemplateRegistry::new(DuplicatePolicy::Reject);
        strict.register(template.clone()).unwrap();
        assert!(matches!(strict.register(template), Err(SceneError::AlreadyDefined { kind: "Template", .. })));
    }
}
