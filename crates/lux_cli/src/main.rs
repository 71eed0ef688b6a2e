use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lux_core::SceneConfig;
use lux_renderer::build_scene;

mod cli;

use cli::Args;

fn init_logger(args: &Args) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = args.log_level {
        builder.filter_level(level.into());
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args);

    let mut config = SceneConfig::load(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    if let Some(width) = args.width {
        config.camera.width = width;
    }
    if let Some(height) = args.height {
        config.camera.height = height;
    }
    if config.camera.width == 0 || config.camera.height == 0 {
        bail!(
            "Resolution {}x{} has no pixels",
            config.camera.width,
            config.camera.height
        );
    }
    if args.shadows {
        config.render.shadows = true;
    }
    let output = args.output.clone().unwrap_or_else(|| config.render.output.clone());

    let start = Instant::now();
    let (scene, camera) = build_scene(&config).context("Failed to build scene")?;
    log::info!("Scene built in {:.2?}", start.elapsed());

    camera
        .render(&output, &scene)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
