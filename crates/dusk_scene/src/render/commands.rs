//! Scene commands as values
//!
//! Every call on [`SceneBackend`](crate::render::api::SceneBackend) has a
//! matching [`SceneCommand`]. Backends that store or print the stream work on
//! these values, and the `Display` impl renders one command in `.pbrt` scene
//! file syntax.

use std::fmt::{self, Write as _};

use crate::foundation::math::Vec3;
use crate::render::api::RenderOptions;
use crate::render::params::{ParamSet, ParamValue};

/// One scene command
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Start of the stream
    Init(RenderOptions),
    /// End of the stream
    Cleanup,
    /// Camera description
    Camera {
        /// Camera kind
        kind: String,
        /// Camera parameters
        params: ParamSet,
    },
    /// Film description
    Film {
        /// Film kind
        kind: String,
        /// Film parameters
        params: ParamSet,
    },
    /// Sampler description
    Sampler {
        /// Sampler kind
        kind: String,
        /// Sampler parameters
        params: ParamSet,
    },
    /// Integrator description
    Integrator {
        /// Integrator kind
        kind: String,
        /// Integrator parameters
        params: ParamSet,
    },
    /// Initial view transform
    LookAt {
        /// Eye position
        eye: Vec3,
        /// Point looked at
        target: Vec3,
        /// Up direction
        up: Vec3,
    },
    /// Shutter interval
    TransformTimes(f32, f32),
    /// World block start
    WorldBegin,
    /// World block end
    WorldEnd,
    /// Graphics state push
    AttributeBegin,
    /// Graphics state pop
    AttributeEnd,
    /// Object definition start
    ObjectBegin(String),
    /// Object definition end
    ObjectEnd,
    /// Translation
    Translate(Vec3),
    /// Scale
    Scale(Vec3),
    /// Rotation in degrees around an axis
    Rotate(f32, Vec3),
    /// Material binding
    NamedMaterial(String),
    /// Material definition
    MakeNamedMaterial {
        /// Material name
        name: String,
        /// Material parameters, including its `type`
        params: ParamSet,
    },
    /// Texture definition
    Texture {
        /// Texture name
        name: String,
        /// Value type, `spectrum` or `float`
        value_type: String,
        /// Texture class such as `imagemap`
        class: String,
        /// Texture parameters
        params: ParamSet,
    },
    /// Object instance
    ObjectInstance(String),
    /// External description file
    ParseFile(String),
    /// Light declaration
    LightSource {
        /// Light kind
        kind: String,
        /// Light parameters
        params: ParamSet,
    },
}

impl SceneCommand {
    /// Whether the command opens a scope
    pub fn opens_scope(&self) -> bool {
        matches!(self, Self::WorldBegin | Self::AttributeBegin | Self::ObjectBegin(_))
    }

    /// Whether the command closes a scope
    pub fn closes_scope(&self) -> bool {
        matches!(self, Self::WorldEnd | Self::AttributeEnd | Self::ObjectEnd)
    }
}

/// String written between double quotes, with `\` and `"` escaped
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            if matches!(c, '"' | '\\') {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        f.write_char('"')
    }
}

struct Params<'a>(&'a ParamSet);

impl fmt::Display for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0.iter() {
            let declaration = format!("{} {}", item.value.type_name(), item.name);
            write!(f, " {} ", Quoted(&declaration))?;
            match &item.value {
                ParamValue::Texture(texture) => write!(f, "{}", Quoted(texture))?,
                ParamValue::Float(values) => write_list(f, values.iter().map(ToString::to_string))?,
                ParamValue::Int(values) => write_list(f, values.iter().map(ToString::to_string))?,
                ParamValue::String(values) => write_list(f, values.iter().map(|v| Quoted(v).to_string()))?,
                ParamValue::Bool(values) => write_list(f, values.iter().map(|v| format!("\"{v}\"")))?,
            }
        }
        Ok(())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: impl Iterator<Item = String>) -> fmt::Result {
    f.write_str("[")?;
    for value in values {
        write!(f, " {value}")?;
    }
    f.write_str(" ]")
}

fn vec3(v: &Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

impl fmt::Display for SceneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(options) => write!(f, "# threads: {}", options.n_threads),
            Self::Cleanup => f.write_str("# end of scene"),
            Self::Camera { kind, params } => write!(f, "Camera {}{}", Quoted(kind), Params(params)),
            Self::Film { kind, params } => write!(f, "Film {}{}", Quoted(kind), Params(params)),
            Self::Sampler { kind, params } => write!(f, "Sampler {}{}", Quoted(kind), Params(params)),
            Self::Integrator { kind, params } => write!(f, "Integrator {}{}", Quoted(kind), Params(params)),
            Self::LookAt { eye, target, up } => {
                write!(f, "LookAt {}  {}  {}", vec3(eye), vec3(target), vec3(up))
            }
            Self::TransformTimes(start, end) => write!(f, "TransformTimes {start} {end}"),
            Self::WorldBegin => f.write_str("WorldBegin"),
            Self::WorldEnd => f.write_str("WorldEnd"),
            Self::AttributeBegin => f.write_str("AttributeBegin"),
            Self::AttributeEnd => f.write_str("AttributeEnd"),
            Self::ObjectBegin(name) => write!(f, "ObjectBegin {}", Quoted(name)),
            Self::ObjectEnd => f.write_str("ObjectEnd"),
            Self::Translate(v) => write!(f, "Translate {}", vec3(v)),
            Self::Scale(v) => write!(f, "Scale {}", vec3(v)),
            Self::Rotate(degrees, axis) => write!(f, "Rotate {degrees} {}", vec3(axis)),
            Self::NamedMaterial(name) => write!(f, "NamedMaterial {}", Quoted(name)),
            Self::MakeNamedMaterial { name, params } => {
                write!(f, "MakeNamedMaterial {}{}", Quoted(name), Params(params))
            }
            Self::Texture { name, value_type, class, params } => {
                write!(
                    f,
                    "Texture {} {} {}{}",
                    Quoted(name),
                    Quoted(value_type),
                    Quoted(class),
                    Params(params)
                )
            }
            Self::ObjectInstance(name) => write!(f, "ObjectInstance {}", Quoted(name)),
            Self::ParseFile(path) => write!(f, "Include {}", Quoted(path)),
            Self::LightSource { kind, params } => write!(f, "LightSource {}{}", Quoted(kind), Params(params)),
        }
    }
}
