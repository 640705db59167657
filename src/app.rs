use crate::error::Result;
use crate::io::config::Config;
use crate::io::image::save_rgba_image;
use crate::pipeline::passes::{packed_vertex_buffers, render_main_pass};
use crate::pipeline::renderer::Renderer;
use crate::pipeline::setup::create_pipeline;
use crate::scene::loader::init_scene_resources;
use log::info;
use nalgebra::Vector4;
use std::time::Instant;

/// Renders one frame of the configured scene and writes it to
/// `config.render.output`.
pub fn run_headless(config: &Config) -> Result<()> {
    let variant = config.render.variant;
    info!(
        "Starting headless render ({}x{}, {} variant)...",
        config.render.width,
        config.render.height,
        variant.name()
    );

    // Setup errors are fatal and happen before any drawing.
    let pipeline = create_pipeline(variant, packed_vertex_buffers(variant))?;
    let context = init_scene_resources(config)?;
    let start_time = Instant::now();

    let mut renderer = Renderer::new(
        config.render.width,
        config.render.height,
        config.render.samples,
    );
    renderer.rasterizer.set_cull_mode(config.render.cull_mode);

    render_main_pass(
        &pipeline,
        &context,
        &mut renderer,
        Vector4::from(config.render.clear_color),
    )?;
    info!("Render completed in {:.2?}", start_time.elapsed());

    info!("Saving output to '{}'...", config.render.output);
    save_rgba_image(
        &renderer.read_pixels(),
        config.render.width,
        config.render.height,
        &config.render.output,
    )?;
    info!("Done.");
    Ok(())
}
