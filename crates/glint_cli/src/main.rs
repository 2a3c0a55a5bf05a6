use anyhow::{Context, Result};
use clap::Parser;
use glint_renderer::{render, Camera, Frame, RenderSettings, Scene};
use log::LevelFilter;

mod cli;

use cli::Args;

/// Horizontal field of view of the fixed camera, in degrees
const CAMERA_HFOV: f32 = 60.0;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::from(args.log_level))
        .init();

    log::info!("Starting Glint");

    let mut settings = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    args.apply(&mut settings);
    settings.validate().context("Invalid render settings")?;

    let scene = Scene::reference(settings.sun_intensity).context("Failed to build scene")?;

    let camera = Camera::reference(CAMERA_HFOV, args.width, args.height);

    let seed = args.frame_seed();
    log::debug!("Frame seed {:?}", seed.0);

    let frame = Frame::new(&scene, &camera, &settings, seed, args.width, args.height)
        .context("Failed to set up frame")?;
    let output = render(&frame, args.bucket_size);

    output
        .image
        .save_png(&args.output, args.gamma)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
