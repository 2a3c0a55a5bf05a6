//! Glint - CPU path tracing core.
//!
//! A Monte Carlo path tracer over a static scene of spheres and triangles:
//! per-pixel hash sampling, four surface models, a bounded path integrator and
//! a bucket-parallel frame renderer.

mod bucket;
mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod renderer;
mod sampler;
mod scene;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{viewport_tangents, Camera};
pub use error::{RenderError, RenderResult, SceneError};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{ray_color, sky_color, trace_path, PathParams, PathSample, Termination};
pub use material::{
    must_reflect, reflect, reflectance, refract, Color, DiffuseSampling, Material, MaterialKind,
    ScatterContext, ScatterResult, PROB_DIFF,
};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, Frame, ImageBuffer, RenderOutput, RenderSettings,
    RenderStats,
};
pub use sampler::{
    gen_f32, random_cos_weighted_hemisphere, random_sphere_direction, tent_filter, FrameSeed,
    HashRng,
};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::{Triangle, TriangleHit};

/// Re-export common math types from glint_math
pub use glint_math::{Interval, Ray, Vec2, Vec3};
