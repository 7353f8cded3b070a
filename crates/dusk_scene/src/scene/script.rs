//! Scene script driver
//!
//! Turns a [`SceneConfig`] into a complete command stream: renderer setup,
//! the world block with its light, materials and templates, and finally the
//! population of the world with instances.

use crate::core::config::{SceneConfig, SkyLightConfig};
use crate::render::SceneBackend;

use super::error::SceneResult;
use super::session::SceneSession;

/// Counts collected while building a scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    /// Materials defined
    pub materials: usize,
    /// Templates defined
    pub templates: usize,
    /// Templates skipped because their lists did not line up
    pub skipped_templates: usize,
    /// Instances placed
    pub instances: usize,
}

/// Build the whole scene described by `config` into `backend`
///
/// Runs the full lifecycle from `init` to `cleanup` and hands the backend
/// back afterwards.
pub fn render_scene<B: SceneBackend>(backend: B, config: &SceneConfig) -> SceneResult<(B, SceneSummary)> {
    let mut session = SceneSession::with_settings(backend, config.settings.clone());

    session.init(&config.options)?;
    configure_renderer(&mut session, config)?;

    session.world_begin()?;
    let summary = populate_world(&mut session, config)?;
    session.world_end()?;

    session.cleanup()?;
    log::info!(
        "Scene built: {} materials, {} templates ({} skipped), {} instances",
        summary.materials,
        summary.templates,
        summary.skipped_templates,
        summary.instances
    );
    Ok((session.into_backend(), summary))
}

/// Emit the view, camera, film, sampler, integrator and shutter records
///
/// `image_file` from the render options replaces the film filename, and
/// `quick_render` quarters the film resolution and drops to one sample per
/// pixel.
pub fn configure_renderer<B: SceneBackend>(session: &mut SceneSession<B>, config: &SceneConfig) -> SceneResult<()> {
    let view = &config.view;
    let render = &config.render;
    let options = &config.options;

    let mut film = render.film_params();
    let mut sampler = render.sampler_params();
    if let Some(image_file) = &options.image_file {
        film.add_string("filename", image_file.clone());
    }
    if options.quick_render {
        film.add_int("xresolution", (render.x_resolution / 4).max(1));
        film.add_int("yresolution", (render.y_resolution / 4).max(1));
        sampler.add_int("pixelsamples", 1);
    }

    session.look_at(view.eye, view.target, view.up)?;
    session.camera(&render.camera, &render.camera_params())?;
    session.film(&render.film, &film)?;
    session.sampler(&render.sampler, &sampler)?;
    session.integrator(&render.integrator, &render.integrator_params())?;
    session.transform_times(render.shutter.0, render.shutter.1)
}

/// Emit everything inside the world block
pub fn populate_world<B: SceneBackend>(session: &mut SceneSession<B>, config: &SceneConfig) -> SceneResult<SceneSummary> {
    let mut summary = SceneSummary::default();

    if let Some(sky) = &config.sky {
        add_sky_light(session, sky)?;
    }

    for material in &config.materials {
        session.add_image_material(&material.name, &material.image)?;
        summary.materials += 1;
    }

    for template in &config.templates {
        if session.define_template(template)? {
            summary.templates += 1;
        } else {
            summary.skipped_templates += 1;
        }
    }

    for instance in &config.instances {
        session.instance(&instance.template, &instance.transform)?;
        summary.instances += 1;
    }

    for row in &config.rows {
        summary.instances += session.place_row(&row.template, &row.rule)?;
    }

    Ok(summary)
}

/// Environment light in its own scope, rotated first and then moved
pub fn add_sky_light<B: SceneBackend>(session: &mut SceneSession<B>, sky: &SkyLightConfig) -> SceneResult<()> {
    session.attribute_begin()?;
    session.rotate(sky.degrees, sky.axis)?;
    session.translate(sky.translate)?;
    session.light_source(&sky.kind, &sky.params())?;
    session.attribute_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ParamSet, RecordingBackend, SceneCommand};

    #[test]
    fn test_dusk_summary() {
        let (_, summary) = render_scene(RecordingBackend::new(), &SceneConfig::dusk()).unwrap();

        assert_eq!(
            summary,
            SceneSummary {
                materials: 3,
                templates: 2,
                skipped_templates: 0,
                instances: 13,
            }
        );
    }

    #[test]
    fn test_sky_light_rotates_before_translating() {
        let (backend, _) = render_scene(
            RecordingBackend::new(),
            &SceneConfig {
                sky: Some(SkyLightConfig::default()),
                ..SceneConfig::empty()
            },
        )
        .unwrap();

        let commands = backend.commands();
        let start = commands
            .iter()
            .position(|c| *c == SceneCommand::WorldBegin)
            .unwrap();
        assert_eq!(commands[start + 1], SceneCommand::AttributeBegin);
        assert!(matches!(commands[start + 2], SceneCommand::Rotate(d, _) if d == 320.0));
        assert!(matches!(commands[start + 3], SceneCommand::Translate(_)));
        assert!(matches!(&commands[start + 4], SceneCommand::LightSource { kind, .. } if kind == "infinite"));
        assert_eq!(commands[start + 5], SceneCommand::AttributeEnd);
    }

    fn film_and_sampler(config: &SceneConfig) -> (ParamSet, ParamSet) {
        let (backend, _) = render_scene(RecordingBackend::new(), config).unwrap();
        let film = backend.commands().iter().find_map(|c| match c {
            SceneCommand::Film { params, .. } => Some(params.clone()),
            _ => None,
        });
        let sampler = backend.commands().iter().find_map(|c| match c {
            SceneCommand::Sampler { params, .. } => Some(params.clone()),
            _ => None,
        });
        (film.unwrap(), sampler.unwrap())
    }

    #[test]
    fn test_image_file_replaces_film_filename() {
        let mut config = SceneConfig::empty();
        let (film, _) = film_and_sampler(&config);
        assert_eq!(film.find_string("filename"), Some("dusk.exr"));

        config.options = config.options.with_image_file("preview.png");
        let (film, _) = film_and_sampler(&config);
        assert_eq!(film.find_string("filename"), Some("preview.png"));
        assert_eq!(film.len(), 3);
    }

    #[test]
    fn test_quick_render_shrinks_film_and_samples() {
        let mut config = SceneConfig::empty();
        config.options = config.options.with_quick_render(true);
        let (film, sampler) = film_and_sampler(&config);

        assert_eq!(film.find_int("xresolution"), Some(250));
        assert_eq!(film.find_int("yresolution"), Some(125));
        assert_eq!(sampler.find_int("pixelsamples"), Some(1));

        config.render.x_resolution = 2;
        let (film, _) = film_and_sampler(&config);
        assert_eq!(film.find_int("xresolution"), Some(1));
    }

    #[test]
    fn test_options_block_order() {
        let (backend, _) = render_scene(RecordingBackend::new(), &SceneConfig::empty()).unwrap();

        let names: Vec<&str> = backend
            .commands()
            .iter()
            .map(|c| match c {
                SceneCommand::Init(_) => "Init",
                SceneCommand::LookAt { .. } => "LookAt",
                SceneCommand::Camera { .. } => "Camera",
                SceneCommand::Film { .. } => "Film",
                SceneCommand::Sampler { .. } => "Sampler",
                SceneCommand::Integrator { .. } => "Integrator",
                SceneCommand::TransformTimes(..) => "TransformTimes",
                SceneCommand::WorldBegin => "WorldBegin",
                SceneCommand::WorldEnd => "WorldEnd",
                SceneCommand::Cleanup => "Cleanup",
                _ => "other",
            })
            .collect();
        assert_eq!(
            names,
            [
                "Init",
                "LookAt",
                "Camera",
                "Film",
                "Sampler",
                "Integrator",
                "TransformTimes",
                "WorldBegin",
                "WorldEnd",
                "Cleanup"
            ]
        );
    }
}
