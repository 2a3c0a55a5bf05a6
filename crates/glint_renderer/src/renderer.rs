//! Pixel estimation and frame rendering.
//!
//! Implements Monte Carlo path tracing with:
//! - Tent-filtered sub-pixel jitter for anti-aliasing
//! - Per-pixel hash RNG seeded from the pixel coordinate and a frame seed
//! - Parallel bucket rendering with rayon

use std::path::Path;
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::error::{RenderError, RenderResult};
use crate::integrator::{trace_path, PathParams, PathSample, Termination};
use crate::sampler::{gen_f32, tent_filter, FrameSeed, HashRng};
use crate::{Camera, Color, DiffuseSampling, ScatterContext, Scene};
use glint_math::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Render settings, swapped in between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per path
    pub max_depth: u32,
    /// Index of refraction of refractive materials
    pub index_of_refraction: f32,
    /// Lower bound of intersection distances (shadow-acne offset)
    pub min_epsilon: f32,
    pub sky_intensity: f32,
    /// Emission of the scene's sun sphere
    pub sun_intensity: f32,
    /// Jitter camera rays inside the pixel
    pub antialias: bool,
    pub diffuse_sampling: DiffuseSampling,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 25,
            index_of_refraction: 1.3,
            min_epsilon: 0.001,
            sky_intensity: 1.0,
            sun_intensity: 0.0,
            antialias: true,
            diffuse_sampling: DiffuseSampling::ScaledSphere,
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the numeric ranges the estimator relies on.
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth must be at least 1"));
        }
        if !(self.index_of_refraction.is_finite() && self.index_of_refraction > 0.0) {
            return Err(invalid("index_of_refraction must be positive and finite"));
        }
        if !(self.min_epsilon.is_finite() && self.min_epsilon >= 0.0) {
            return Err(invalid("min_epsilon must be non-negative and finite"));
        }
        if !self.sky_intensity.is_finite() || !self.sun_intensity.is_finite() {
            return Err(invalid("sky and sun intensities must be finite"));
        }
        Ok(())
    }

    /// Per-path parameters derived from these settings.
    pub fn path_params(&self) -> PathParams {
        PathParams {
            max_depth: self.max_depth,
            min_epsilon: self.min_epsilon,
            sky_intensity: self.sky_intensity,
            scatter: ScatterContext {
                index_of_refraction: self.index_of_refraction,
                diffuse_sampling: self.diffuse_sampling,
            },
        }
    }
}

fn invalid(message: &str) -> RenderError {
    RenderError::InvalidSettings(message.to_string())
}

/// Path counts gathered while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub paths: u64,
    pub escaped: u64,
    pub absorbed: u64,
    pub exhausted: u64,
    /// Total surface interactions over all paths
    pub bounces: u64,
}

impl RenderStats {
    /// Count one traced path.
    pub fn record(&mut self, sample: &PathSample) {
        self.paths += 1;
        self.bounces += sample.bounces as u64;
        match sample.termination {
            Termination::EscapedToSky => self.escaped += 1,
            Termination::Absorbed => self.absorbed += 1,
            Termination::RecursionExhausted => self.exhausted += 1,
        }
    }

    /// Combine counts from another bucket.
    pub fn merge(&mut self, other: &RenderStats) {
        self.paths += other.paths;
        self.escaped += other.escaped;
        self.absorbed += other.absorbed;
        self.exhausted += other.exhausted;
        self.bounces += other.bounces;
    }

    pub fn mean_bounces(&self) -> f64 {
        if self.paths == 0 {
            0.0
        } else {
            self.bounces as f64 / self.paths as f64
        }
    }
}

/// Everything needed to shade a pixel of one frame.
///
/// All inputs are borrowed immutably for the whole pass; a new frame is a new
/// `Frame`.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub settings: &'a RenderSettings,
    pub seed: FrameSeed,
    pub width: u32,
    pub height: u32,
    params: PathParams,
}

impl<'a> Frame<'a> {
    /// Bundle the inputs of one frame, validating settings and resolution.
    pub fn new(
        scene: &'a Scene,
        camera: &'a Camera,
        settings: &'a RenderSettings,
        seed: FrameSeed,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        settings.validate()?;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }

        Ok(Self {
            scene,
            camera,
            settings,
            seed,
            width,
            height,
            params: settings.path_params(),
        })
    }

    /// Estimate the color of pixel (x, y), row 0 at the top.
    pub fn render_pixel(&self, x: u32, y: u32) -> RenderResult<Color> {
        if x >= self.width || y >= self.height {
            return Err(RenderError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let mut stats = RenderStats::default();
        Ok(self.estimate_pixel(x, y, &mut stats))
    }

    /// Average `samples_per_pixel` jittered paths, counting them in `stats`.
    pub(crate) fn estimate_pixel(&self, x: u32, y: u32, stats: &mut RenderStats) -> Color {
        let mut rng = HashRng::for_pixel(x, y, self.seed);
        let mut pixel_color = Color::ZERO;

        for _ in 0..self.settings.samples_per_pixel {
            let offset = if self.settings.antialias {
                Vec2::new(tent_filter(gen_f32(&mut rng)), tent_filter(gen_f32(&mut rng)))
            } else {
                Vec2::ZERO
            };

            let ray = self.camera.get_ray(x, y, self.width, self.height, offset);
            let sample = trace_path(&ray, self.scene, &self.params, &mut rng);
            stats.record(&sample);
            pixel_color += sample.radiance;
        }

        // Average the samples
        pixel_color / self.settings.samples_per_pixel as f32
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA with opaque alpha.
pub fn color_to_rgba(color: Color, gamma: bool) -> [u8; 4] {
    let encode = |c: f32| {
        let c = if gamma { linear_to_gamma(c) } else { c };
        (255.0 * c.clamp(0.0, 1.0)) as u8
    };
    [encode(color.x), encode(color.y), encode(color.z), 255]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let row = bucket.width as usize;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = (i % row) as u32;
            let local_y = (i / row) as u32;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self, gamma: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color, gamma));
        }
        bytes
    }

    /// Write the image as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, gamma: bool) -> RenderResult<()> {
        image::save_buffer(
            path.as_ref(),
            &self.to_rgba(gamma),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// A finished frame.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// Render the entire frame, buckets in parallel.
///
/// Every pixel owns its RNG, so the result does not depend on scheduling.
pub fn render(frame: &Frame, bucket_size: u32) -> RenderOutput {
    let start = Instant::now();
    let buckets = generate_buckets(frame.width, frame.height, bucket_size.max(1));
    log::info!(
        "Rendering {}x{} @ {} spp, depth {} in {} buckets",
        frame.width,
        frame.height,
        frame.settings.samples_per_pixel,
        frame.settings.max_depth,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, frame))
        .collect();

    let mut image = ImageBuffer::new(frame.width, frame.height);
    let mut stats = RenderStats::default();
    for result in &results {
        image.blit(result);
        stats.merge(&result.stats);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    log::debug!(
        "Paths: {} escaped, {} absorbed, {} exhausted, {:.2} bounces/path",
        stats.escaped,
        stats.absorbed,
        stats.exhausted,
        stats.mean_bounces()
    );
    if stats.exhausted > 0 {
        log::debug!(
            "{} paths hit the depth limit of {} and were dropped",
            stats.exhausted,
            frame.settings.max_depth
        );
    }

    RenderOutput { image, stats }
}
