//! Simple path tracer example.
//!
//! Scatters small spheres of every material over a ground sphere and saves
//! the frame in PPM format.

use glint_renderer::{
    color_to_rgba, render, Camera, Color, Frame, FrameSeed, ImageBuffer, Material,
    RenderSettings, Scene, SceneError, Vec3, DEFAULT_BUCKET_SIZE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Glint Path Tracer - Simple Example");
    println!("==================================");

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?} ({} primitives)", start.elapsed(), scene.len());

    let (width, height) = (640, 360);
    let camera = Camera::look_at(
        Vec3::new(0.0, 1.5, 4.0),  // look_from
        Vec3::new(0.0, 0.3, -2.0), // look_at
        Vec3::Y,                   // vup
        50.0,
        width as f32 / height as f32,
    );

    let settings = RenderSettings {
        samples_per_pixel: 32,
        max_depth: 12,
        ..RenderSettings::default()
    };

    println!("Rendering {}x{} @ {} spp...", width, height, settings.samples_per_pixel);
    let frame = Frame::new(&scene, &camera, &settings, FrameSeed::new(7, 11), width, height)?;
    let output = render(&frame, DEFAULT_BUCKET_SIZE);
    println!(
        "{} paths, {:.2} bounces/path",
        output.stats.paths,
        output.stats.mean_bounces()
    );

    let filename = "output.ppm";
    save_ppm(&output.image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Result<Scene, SceneError> {
    let mut scene = Scene::new();
    let mut rng = StdRng::seed_from_u64(2024);

    // Ground
    scene.add_sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::diffuse(Color::new(0.5, 0.5, 0.5)),
    )?;

    // Three main spheres
    scene.add_sphere(Vec3::new(0.0, 0.5, -2.0), 0.5, Material::refractive(Color::ONE))?;
    scene.add_sphere(
        Vec3::new(-1.2, 0.5, -2.0),
        0.5,
        Material::diffuse(Color::new(0.4, 0.2, 0.1)),
    )?;
    scene.add_sphere(
        Vec3::new(1.2, 0.5, -2.0),
        0.5,
        Material::reflective(Color::new(0.7, 0.6, 0.5)),
    )?;

    // A glowing triangle behind them
    scene.add_triangle(
        Vec3::new(-1.5, 0.0, -4.0),
        Vec3::new(1.5, 0.0, -4.0),
        Vec3::new(0.0, 2.0, -4.0),
        true,
        Material::light(Color::new(4.0, 3.0, 2.0)),
    )?;

    // Small random spheres
    for a in -4..4 {
        for b in -4..1 {
            let center = Vec3::new(
                0.5 * a as f32 + 0.3 * rng.gen::<f32>(),
                0.08,
                0.5 * b as f32 - 0.5 + 0.3 * rng.gen::<f32>(),
            );

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.7 {
                Material::diffuse(Color::new(rng.gen(), rng.gen(), rng.gen()))
            } else if choose_mat < 0.9 {
                Material::reflective(Color::splat(0.5 + 0.5 * rng.gen::<f32>()))
            } else {
                Material::refractive(Color::ONE)
            };
            scene.add_sphere(center, 0.08, material)?;
        }
    }

    Ok(scene)
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y), true);
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    Ok(())
}
