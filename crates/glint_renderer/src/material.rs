//! Surface materials and their scattering rules.

use crate::sampler::{gen_f32, random_cos_weighted_hemisphere, random_sphere_direction};
use crate::{hittable::HitRecord, Ray};
use glint_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Survival probability of a diffuse bounce (Russian roulette).
pub const PROB_DIFF: f32 = 0.9;

/// Diffuse scatter directions shorter than this fall back to the normal.
const MIN_SCATTER_LENGTH: f32 = 1e-5;

/// How diffuse surfaces pick their bounce direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffuseSampling {
    /// `normal + u * random_sphere_direction()`, with `u` uniform in [0, 1)
    #[default]
    ScaledSphere,
    /// `normalize(normal + random_sphere_point)`
    CosineWeighted,
}

/// The closed set of surface behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Light,
    Diffuse,
    Reflective,
    Refractive,
}

/// A surface material. Primitives own their material by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Radiance emitted by the surface (zero for non-lights)
    pub emissive: Color,
    /// Albedo / tint
    pub color: Color,
    pub kind: MaterialKind,
}

/// Per-frame parameters shared by every scatter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterContext {
    pub index_of_refraction: f32,
    pub diffuse_sampling: DiffuseSampling,
}

impl Default for ScatterContext {
    fn default() -> Self {
        Self {
            index_of_refraction: 1.3,
            diffuse_sampling: DiffuseSampling::default(),
        }
    }
}

/// Outcome of a scatter call.
///
/// The attenuation always applies to the path, even when it terminates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    pub attenuation: Color,
    /// `Some` when the path continues along this ray
    pub scattered: Option<Ray>,
}

impl ScatterResult {
    fn continue_with(attenuation: Color, scattered: Ray) -> Self {
        Self {
            attenuation,
            scattered: Some(scattered),
        }
    }

    fn terminate(attenuation: Color) -> Self {
        Self {
            attenuation,
            scattered: None,
        }
    }

    /// Whether the path continues.
    pub fn proceeds(&self) -> bool {
        self.scattered.is_some()
    }
}

impl Material {
    pub fn new(emissive: Color, color: Color, kind: MaterialKind) -> Self {
        Self {
            emissive,
            color,
            kind,
        }
    }

    /// A pure emitter.
    pub fn light(emissive: Color) -> Self {
        Self::new(emissive, Color::ONE, MaterialKind::Light)
    }

    pub fn diffuse(color: Color) -> Self {
        Self::new(Color::ZERO, color, MaterialKind::Diffuse)
    }

    pub fn reflective(color: Color) -> Self {
        Self::new(Color::ZERO, color, MaterialKind::Reflective)
    }

    pub fn refractive(color: Color) -> Self {
        Self::new(Color::ZERO, color, MaterialKind::Refractive)
    }

    /// Same material with a different emission.
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive != Color::ZERO
    }

    /// Scatter an incoming ray at a hit point.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        ctx: &ScatterContext,
        rng: &mut dyn RngCore,
    ) -> ScatterResult {
        match self.kind {
            // Lights end the path; the integrator adds the emission
            MaterialKind::Light => ScatterResult::terminate(Color::ONE),
            MaterialKind::Diffuse => self.scatter_diffuse(rec, ctx.diffuse_sampling, rng),
            MaterialKind::Reflective => {
                let direction = reflect(ray_in.direction(), rec.normal).normalize();
                ScatterResult::continue_with(self.color, Ray::new(rec.p, direction))
            }
            MaterialKind::Refractive => {
                self.scatter_refractive(ray_in, rec, ctx.index_of_refraction, rng)
            }
        }
    }

    fn scatter_diffuse(
        &self,
        rec: &HitRecord,
        sampling: DiffuseSampling,
        rng: &mut dyn RngCore,
    ) -> ScatterResult {
        if gen_f32(rng) >= PROB_DIFF {
            // Terminated paths carry the compensated weight of the survivors
            return ScatterResult::terminate(self.color / PROB_DIFF);
        }

        let direction = match sampling {
            DiffuseSampling::ScaledSphere => {
                let dir = rec.normal + gen_f32(rng) * random_sphere_direction(rng);
                if dir.length() < MIN_SCATTER_LENGTH {
                    rec.normal
                } else {
                    dir.normalize()
                }
            }
            DiffuseSampling::CosineWeighted => random_cos_weighted_hemisphere(rec.normal, rng),
        };

        ScatterResult::continue_with(self.color, Ray::new(rec.p, direction))
    }

    fn scatter_refractive(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        ior: f32,
        rng: &mut dyn RngCore,
    ) -> ScatterResult {
        let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };
        let normal = if rec.front_face { rec.normal } else { -rec.normal };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        let direction = if must_reflect(refraction_ratio, sin_theta)
            || reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, normal).normalize()
        } else {
            refract(unit_direction, normal, refraction_ratio)
        };

        ScatterResult::continue_with(self.color, Ray::new(rec.p, direction))
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n` facing it.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Total internal reflection test. The boundary case counts as reflection.
#[inline]
pub fn must_reflect(refraction_ratio: f32, sin_theta: f32) -> bool {
    refraction_ratio * sin_theta >= 1.0
}

/// Schlick's approximation for reflectance.
///
/// Symmetric in `ior` and `1 / ior`, so the refraction ratio can be passed
/// directly.
#[inline]
pub fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
