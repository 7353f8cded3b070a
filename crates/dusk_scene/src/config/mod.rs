//! Configuration files
//!
//! Any serializable settings type can be read from and written to TOML or
//! RON. The format follows the file extension.

use std::fmt;
use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl Format {
    /// Format for a path, by extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Ron => "RON",
        })
    }
}

/// Settings loadable from a file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse settings from text
    fn parse_as(contents: &str, format: Format) -> Result<Self, ConfigError> {
        let parsed = match format {
            Format::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Format::Ron => ron::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse { format, message })
    }

    /// Render settings as text
    fn render_as(&self, format: Format) -> Result<String, ConfigError> {
        match format {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string())),
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load settings from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Parsing {} settings from {}", format, path.display());
        Self::parse_as(&contents, format)
    }

    /// Save settings to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.render_as(Format::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed file
    #[error("{format} parse error: {message}")]
    Parse {
        /// Format being parsed
        format: Format,
        /// Parser message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Probe {
        name: String,
        count: u32,
    }

    impl Config for Probe {}

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("forest.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("forest.ron")).unwrap(), Format::Ron);
        assert!(matches!(
            Format::from_path(Path::new("forest.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("dusk_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let probe = Probe { name: "pine".to_string(), count: 10 };

        for file in ["probe.toml", "probe.ron"] {
            let path = dir.join(file);
            probe.save_to_file(&path).unwrap();
            assert_eq!(Probe::load_from_file(&path).unwrap(), probe);
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = Probe::parse_as("count = [", Format::Toml).unwrap_err();
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
