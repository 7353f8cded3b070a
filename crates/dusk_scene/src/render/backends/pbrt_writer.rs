//! Backend that writes the command stream as a `.pbrt` scene description
//!
//! Output is indented by nesting level so the file reads like a hand-written
//! scene. Nothing is buffered beyond the writer handed in; wrap files in a
//! `BufWriter`. With [`RenderOptions::quiet`] set the `#` comment lines that
//! mark the start and end of the stream are left out.

use std::collections::HashSet;
use std::io::Write;

use crate::foundation::math::Vec3;
use crate::render::api::{BackendError, BackendResult, RenderOptions, SceneBackend};
use crate::render::{ParamSet, SceneCommand};

const INDENT_WIDTH: usize = 4;

/// `.pbrt` text writer backend
pub struct PbrtWriter<W: Write> {
    out: W,
    indent: usize,
    quiet: bool,
    defined_objects: HashSet<String>,
}

impl<W: Write> PbrtWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 0,
            quiet: false,
            defined_objects: HashSet::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, command: SceneCommand) -> BackendResult<()> {
        if self.quiet && matches!(command, SceneCommand::Init(_) | SceneCommand::Cleanup) {
            return Ok(());
        }
        if command.closes_scope() {
            self.indent = self.indent.saturating_sub(INDENT_WIDTH);
        }
        if matches!(command, SceneCommand::WorldBegin) {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{:indent$}{command}", "", indent = self.indent)?;
        if command.opens_scope() {
            self.indent += INDENT_WIDTH;
        }
        Ok(())
    }
}

impl<W: Write> SceneBackend for PbrtWriter<W> {
    fn init(&mut self, options: &RenderOptions) -> BackendResult<()> {
        self.quiet = options.quiet;
        self.emit(SceneCommand::Init(options.clone()))
    }

    fn cleanup(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::Cleanup)?;
        self.out.flush()?;
        Ok(())
    }

    fn camera(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::Camera { kind: kind.to_owned(), params: params.clone() })
    }

    fn film(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::Film { kind: kind.to_owned(), params: params.clone() })
    }

    fn sampler(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::Sampler { kind: kind.to_owned(), params: params.clone() })
    }

    fn integrator(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::Integrator { kind: kind.to_owned(), params: params.clone() })
    }

    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> BackendResult<()> {
        self.emit(SceneCommand::LookAt { eye, target, up })
    }

    fn transform_times(&mut self, start: f32, end: f32) -> BackendResult<()> {
        self.emit(SceneCommand::TransformTimes(start, end))
    }

    fn world_begin(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::WorldBegin)
    }

    fn world_end(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::WorldEnd)
    }

    fn attribute_begin(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::AttributeBegin)
    }

    fn attribute_end(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::AttributeEnd)
    }

    fn object_begin(&mut self, name: &str) -> BackendResult<()> {
        self.defined_objects.insert(name.to_owned());
        self.emit(SceneCommand::ObjectBegin(name.to_owned()))
    }

    fn object_end(&mut self) -> BackendResult<()> {
        self.emit(SceneCommand::ObjectEnd)
    }

    fn translate(&mut self, delta: Vec3) -> BackendResult<()> {
        self.emit(SceneCommand::Translate(delta))
    }

    fn scale(&mut self, factors: Vec3) -> BackendResult<()> {
        self.emit(SceneCommand::Scale(factors))
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) -> BackendResult<()> {
        self.emit(SceneCommand::Rotate(degrees, axis))
    }

    fn named_material(&mut self, name: &str) -> BackendResult<()> {
        self.emit(SceneCommand::NamedMaterial(name.to_owned()))
    }

    fn make_named_material(&mut self, name: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::MakeNamedMaterial { name: name.to_owned(), params: params.clone() })
    }

    fn texture(&mut self, name: &str, value_type: &str, class: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::Texture {
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
        self.emit(SceneCommand::ObjectInstance(name.to_owned()))
    }

    fn parse_file(&mut self, path: &str) -> BackendResult<()> {
        self.emit(SceneCommand::ParseFile(path.to_owned()))
    }

    fn light_source(&mut self, kind: &str, params: &ParamSet) -> BackendResult<()> {
        self.emit(SceneCommand::LightSource { kind: kind.to_owned(), params: params.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indents_nested_scopes() {
        let mut writer = PbrtWriter::new(Vec::new());
        writer.world_begin().unwrap();
        writer.object_begin("tree").unwrap();
        writer.attribute_begin().unwrap();
        writer.named_material("Bark").unwrap();
        writer.attribute_end().unwrap();
        writer.object_end().unwrap();
        writer.object_instance("tree").unwrap();
        writer.world_end().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "\nWorldBegin\n    ObjectBegin \"tree\"\n        AttributeBegin\n            NamedMaterial \"Bark\"\n        AttributeEnd\n    ObjectEnd\n    ObjectInstance \"tree\"\nWorldEnd\n"
        );
    }

    #[test]
    fn test_quiet_leaves_out_comment_lines() {
        let mut writer = PbrtWriter::new(Vec::new());
        writer.init(&RenderOptions { quiet: true, ..RenderOptions::default() }).unwrap();
        writer.world_begin().unwrap();
        writer.world_end().unwrap();
        writer.cleanup().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "\nWorldBegin\nWorldEnd\n");

        let mut writer = PbrtWriter::new(Vec::new());
        writer.init(&RenderOptions::default().with_threads(4)).unwrap();
        writer.cleanup().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "# threads: 4\n# end of scene\n");
    }

    #[test]
    fn test_writes_escaped_names() {
        let mut writer = PbrtWriter::new(Vec::new());
        writer.object_begin("maple \"red\"").unwrap();
        writer.parse_file(r"trees\maple.pbrt").unwrap();
        writer.object_end().unwrap();
        writer.object_instance("maple \"red\"").unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "ObjectBegin \"maple \\\"red\\\"\"\n    Include \"trees\\\\maple.pbrt\"\nObjectEnd\nObjectInstance \"maple \\\"red\\\"\"\n"
        );
    }

    #[test]
    fn test_unknown_instance_is_rejected() {
        let mut writer = PbrtWriter::new(Vec::new());
        assert!(matches!(writer.object_instance("mapleTree"), Err(BackendError::UnknownObject(_))));
        assert!(writer.into_inner().is_empty());
    }
}
