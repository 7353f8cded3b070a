//! Dusk forest scene generator
//!
//! Writes the scene as a `.pbrt` description.
//!
//! ```text
//! dusk [scene.toml | scene.ron] [-o output.pbrt] [--image file] [--quick] [-q | -v]
//! ```
//!
//! Without a scene file the built-in dusk forest is used. Without `-o` the
//! description goes to stdout. `--image` replaces the film's output image
//! and `--quick` writes a low resolution, one sample preview. `-q` logs
//! warnings only and leaves comment lines out of the scene file; `-v` adds
//! debug output. `RUST_LOG` overrides both log levels.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use dusk_scene::config::ConfigError;
use dusk_scene::core::config::{Config, SceneConfig};
use dusk_scene::foundation::logging;
use dusk_scene::render::PbrtWriter;
use dusk_scene::scene::{render_scene, SceneError};
use thiserror::Error;

/// Errors that end the program
#[derive(Error, Debug)]
enum AppError {
    #[error("Usage: dusk [scene.toml | scene.ron] [-o output.pbrt] [--image file] [--quick] [-q | -v] ({0})")]
    Usage(String),

    #[error("Failed to load scene: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scene: {0}")]
    Invalid(String),

    #[error("Failed to open output: {0}")]
    Output(#[from] io::Error),

    #[error("Scene build failed: {0}")]
    Scene(#[from] SceneError),
}

#[derive(Debug, Default)]
struct Args {
    scene: Option<PathBuf>,
    output: Option<PathBuf>,
    image: Option<String>,
    quick: bool,
    quiet: bool,
    verbose: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" | "--output" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Usage("-o needs a path".to_string()))?;
                    parsed.output = Some(path.into());
                }
                "--image" => {
                    let file = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--image needs a file name".to_string()))?;
                    parsed.image = Some(file);
                }
                "--quick" => parsed.quick = true,
                "-q" | "--quiet" => parsed.quiet = true,
                "-v" | "--verbose" => parsed.verbose = true,
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("unknown option {flag}")));
                }
                _ if parsed.scene.is_some() => {
                    return Err(AppError::Usage("more than one scene file".to_string()));
                }
                _ => parsed.scene = Some(PathBuf::from(&arg)),
            }
        }
        Ok(parsed)
    }
}

fn build<W: Write>(out: W, config: &SceneConfig) -> Result<(), AppError> {
    let (_, summary) = render_scene(PbrtWriter::new(out), config)?;
    log::info!("Placed {} instances", summary.instances);
    Ok(())
}

fn run(args: &Args) -> Result<(), AppError> {
    let mut config = match &args.scene {
        Some(path) => {
            log::info!("Loading scene from {}", path.display());
            SceneConfig::load_from_file(path)?
        }
        None => SceneConfig::default(),
    };
    config.options.quiet |= args.quiet;
    config.options.quick_render |= args.quick;
    if let Some(image) = &args.image {
        config.options = config.options.clone().with_image_file(image.clone());
    }
    config.validate().map_err(AppError::Invalid)?;

    match &args.output {
        Some(path) => {
            log::info!("Writing scene to {}", path.display());
            build(BufWriter::new(File::create(path)?), &config)
        }
        None => build(BufWriter::new(io::stdout().lock()), &config),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1))?;
    logging::init(logging::level_for(args.quiet, args.verbose));

    log::info!("Starting dusk scene generator");

    run(&args).map_err(|e| {
        log::error!("{}", e);
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, AppError> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parses_scene_and_output() {
        let parsed = args(&["forest.toml", "-o", "forest.pbrt"]).unwrap();
        assert_eq!(parsed.scene, Some(PathBuf::from("forest.toml")));
        assert_eq!(parsed.output, Some(PathBuf::from("forest.pbrt")));
    }

    #[test]
    fn test_parses_render_switches() {
        let parsed = args(&["--quick", "--image", "preview.png"]).unwrap();
        assert!(parsed.quick);
        assert_eq!(parsed.image.as_deref(), Some("preview.png"));
        assert!(matches!(args(&["--image"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_parses_log_switches() {
        let parsed = args(&["-q", "--verbose"]).unwrap();
        assert!(parsed.quiet);
        assert!(parsed.verbose);
    }

    #[test]
    fn test_defaults_to_builtin_scene_on_stdout() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.scene.is_none());
        assert!(parsed.output.is_none());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(matches!(args(&["-o"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["--trace"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.toml", "b.toml"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_builds_into_buffer() {
        let mut out = Vec::new();
        build(&mut out, &SceneConfig::dusk()).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("WorldEnd"));
    }
}
