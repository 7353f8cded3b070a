//! Backend that stores the command stream in memory
//!
//! Used by tests and by tools that post-process a scene before writing it.
//! It behaves like a renderer in the two places a renderer can fail:
//! instancing an object it never saw defined, and including a file it cannot
//! reach.

use std::collections::HashSet;

use crate::foundation::math::Vec3;
use crate::render::api::{BackendError, BackendResult, RenderOptions, SceneBackend};
use crate::render::{ParamSet, SceneCommand};

/// In-memory scene backend
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<SceneCommand>,
    defined_objects: HashSet<String>,
    unreachable: HashSet<String>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `parse_file` fail for `path`
    pub fn with_unreachable(mut self, path: impl Into<String>) -> Self {
        self.unreachable.insert(path.into());
        self
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty
    pub fn take_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether an object with this name has been defined
    pub fn has_object(&self, name: &str) -> bool {
        self.defined_objects.contains(name)
    }

    /// Number of recorded commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&SceneCommand) -> bool) -> usize {
        self.commands.iter().filter(|command| predicate(command)).count()
    }

    fn record(&mut self, command: SceneCommand) -> BackendResult<()> {
        self.commands.push(command);
        Ok(())
    }
}

impl SceneBackend for RecordingBackend {
    fn init(&mut self, options: &RenderOptions) -> BackendResult<()> {
        self.record(SceneCommand::Init(options.clone()))
    }

    fn cleanup(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::Cleanup)
    }

    fn camera(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::Camera { kind: kind.to_owned(), params: params.clone() })
    }

    fn film(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::Film { kind: kind.to_owned(), params: params.clone() })
    }

    fn sampler(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::Sampler { kind: kind.to_owned(), params: params.clone() })
    }

    fn integrator(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::Integrator { kind: kind.to_owned(), params: params.clone() })
    }

    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> BackendResult<()> {
        self.record(SceneCommand::LookAt { eye, target, up })
    }

    fn transform_times(&mut self, start: f32, end: f32) -> BackendResult<()> {
        self.record(SceneCommand::TransformTimes(start, end))
    }

    fn world_begin(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::WorldBegin)
    }

    fn world_end(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::WorldEnd)
    }

    fn attribute_begin(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::AttributeBegin)
    }

    fn attribute_end(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::AttributeEnd)
    }

    fn object_begin(&mut self, name: &str) -> BackendResult<()> {
        self.defined_objects.insert(name.to_owned());
        self.record(SceneCommand::ObjectBegin(name.to_owned()))
    }

    fn object_end(&mut self) -> BackendResult<()> {
        self.record(SceneCommand::ObjectEnd)
    }

    fn translate(&mut self, delta: Vec3) -> BackendResult<()> {
        self.record(SceneCommand::Translate(delta))
    }

    fn scale(&mut self, factors: Vec3) -> BackendResult<()> {
        self.record(SceneCommand::Scale(factors))
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) -> BackendResult<()> {
        self.record(SceneCommand::Rotate(degrees, axis))
    }

    fn named_material(&mut self, name: &str) -> BackendResult<()> {
        self.record(SceneCommand::NamedMaterial(name.to_owned()))
    }

    fn make_named_material(&mut self, name: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::MakeNamedMaterial { name: name.to_owned(), params: params.clone() })
    }

    fn texture(&mut self, name: &str, value_type: &str, class: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::Texture {
            name: name.to_owned(),
            value_type: value_type.to_owned(),
            class: class.to_owned(),
            params: params.clone(),
        })
    }

    fn object_instance(&mut self, name: &str) -> BackendResult<()> {
        if !self.defined_objects.contains(name) {
            return Err(BackendError::UnknownObject(name.to_owned()));
        }
        self.record(SceneCommand::ObjectInstance(name.to_owned()))
    }

    fn parse_file(&mut self, path: &str) -> BackendResult<()> {
        if self.unreachable.contains(path) {
            return Err(BackendError::Unreachable(path.to_owned()));
        }
        self.record(SceneCommand::ParseFile(path.to_owned()))
    }

    fn light_source(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.record(SceneCommand::LightSource { kind: kind.to_owned(), params: params.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_requires_definition() {
        let mut backend = RecordingBackend::new();

        assert!(matches!(
            backend.object_instance("pineTree"),
            Err(BackendError::UnknownObject(name)) if name == "pineTree"
        ));
        assert!(backend.commands().is_empty());

        backend.object_begin("pineTree").unwrap();
        backend.object_end().unwrap();
        backend.object_instance("pineTree").unwrap();
        assert_eq!(backend.count(|c| matches!(c, SceneCommand::ObjectInstance(_))), 1);
    }

    #[test]
    fn test_unreachable_include_fails() {
        let mut backend = RecordingBackend::new().with_unreachable("missing.pbrt");

        assert!(matches!(backend.parse_file("missing.pbrt"), Err(BackendError::Unreachable(_))));
        backend.parse_file("geometry.pbrt").unwrap();
        assert_eq!(backend.take_commands(), vec![SceneCommand::ParseFile("geometry.pbrt".to_string())]);
        assert!(backend.commands().is_empty());
    }
}
