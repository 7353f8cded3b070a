//! Parameter records passed opaquely to the scene backend
//!
//! A [`ParamSet`] is built right before a single backend call and then
//! dropped. Names are unique within a record; adding a name twice replaces
//! the earlier value without moving it, so the emitted order stays stable.

/// Typed list of values carried by one parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Floating point values
    Float(Vec<f32>),
    /// Integer values
    Int(Vec<i32>),
    /// String values
    String(Vec<String>),
    /// Reference to a named texture
    Texture(String),
    /// Boolean values
    Bool(Vec<bool>),
}

impl ParamValue {
    /// Type keyword used in scene descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "integer",
            Self::String(_) => "string",
            Self::Texture(_) => "texture",
            Self::Bool(_) => "bool",
        }
    }
}

/// One named parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamItem {
    /// Parameter name
    pub name: String,
    /// Parameter values
    pub value: ParamValue,
}

/// Ordered parameter record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    items: Vec<ParamItem>,
}

impl ParamSet {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing an existing one with the same name in place
    pub fn add(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.items.iter_mut().find(|item| item.name == name) {
            Some(existing) => existing.value = value,
            None => self.items.push(ParamItem { name, value }),
        }
    }

    /// Add a single float
    pub fn add_float(&mut self, name: impl Into<String>, value: f32) {
        self.add(name, ParamValue::Float(vec![value]));
    }

    /// Add a list of floats
    pub fn add_floats(&mut self, name: impl Into<String>, values: Vec<f32>) {
        self.add(name, ParamValue::Float(values));
    }

    /// Add a single integer
    pub fn add_int(&mut self, name: impl Into<String>, value: i32) {
        self.add(name, ParamValue::Int(vec![value]));
    }

    /// Add a list of integers
    pub fn add_ints(&mut self, name: impl Into<String>, values: Vec<i32>) {
        self.add(name, ParamValue::Int(values));
    }

    /// Add a single string
    pub fn add_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.add(name, ParamValue::String(vec![value.into()]));
    }

    /// Add a texture reference
    pub fn add_texture(&mut self, name: impl Into<String>, texture: impl Into<String>) {
        self.add(name, ParamValue::Texture(texture.into()));
    }

    /// Add a single boolean
    pub fn add_bool(&mut self, name: impl Into<String>, value: bool) {
        self.add(name, ParamValue::Bool(vec![value]));
    }

    /// Builder form of [`ParamSet::add_float`]
    pub fn with_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.add_float(name, value);
        self
    }

    /// Builder form of [`ParamSet::add_int`]
    pub fn with_int(mut self, name: impl Into<String>, value: i32) -> Self {
        self.add_int(name, value);
        self
    }

    /// Builder form of [`ParamSet::add_string`]
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_string(name, value);
        self
    }

    /// Builder form of [`ParamSet::add_texture`]
    pub fn with_texture(mut self, name: impl Into<String>, texture: impl Into<String>) -> Self {
        self.add_texture(name, texture);
        self
    }

    /// Builder form of [`ParamSet::add_bool`]
    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.add_bool(name, value);
        self
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.items.iter().find(|item| item.name == name).map(|item| &item.value)
    }

    /// First float of a parameter
    pub fn find_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Float(values) => values.first().copied(),
            _ => None,
        }
    }

    /// First integer of a parameter
    pub fn find_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Int(values) => values.first().copied(),
            _ => None,
        }
    }

    /// First string of a parameter
    pub fn find_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::String(values) => values.first().map(String::as_str),
            _ => None,
        }
    }

    /// Texture bound to a parameter
    pub fn find_texture(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::Texture(texture) => Some(texture.as_str()),
            _ => None,
        }
    }

    /// Iterate parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ParamItem> {
        self.items.iter()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the record has no parameters
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
