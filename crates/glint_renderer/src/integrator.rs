//! Path integrator.
//!
//! Follows one camera path through the scene as a bounded loop: intersect,
//! scatter, attenuate, and stop when the path escapes to the sky, is absorbed,
//! or runs out of bounces.

use crate::{Color, Hittable, Ray, ScatterContext};
use glint_math::Interval;
use rand::RngCore;

/// Horizon color of the sky gradient.
const SKY_HORIZON: Color = Color::new(1.0, 1.0, 1.0);
/// Zenith color of the sky gradient.
const SKY_ZENITH: Color = Color::new(0.5, 0.7, 1.0);

/// Parameters of one traced path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathParams {
    /// Maximum number of intersection steps
    pub max_depth: u32,
    /// Lower bound of every intersection query
    pub min_epsilon: f32,
    pub sky_intensity: f32,
    pub scatter: ScatterContext,
}

/// Why a path stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// No hit; sky radiance was added
    EscapedToSky,
    /// A light was hit or a scatter model ended the path
    Absorbed,
    /// Still bouncing after `max_depth` steps; contributes black
    RecursionExhausted,
}

/// Result of tracing one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub radiance: Color,
    /// Number of surface interactions
    pub bounces: u32,
    pub termination: Termination,
}

/// Background radiance for a ray that left the scene.
pub fn sky_color(ray: &Ray, sky_intensity: f32) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (SKY_HORIZON * (1.0 - a) + SKY_ZENITH * a) * sky_intensity
}

/// Trace one path starting at `ray`.
///
/// Emission is summed along the path and the attenuations multiplied; the
/// final radiance is their product.
pub fn trace_path<H: Hittable + ?Sized>(
    ray: &Ray,
    world: &H,
    params: &PathParams,
    rng: &mut dyn RngCore,
) -> PathSample {
    let ray_t = Interval::from_min(params.min_epsilon);
    let mut ray = *ray;
    let mut accumulated = Color::ZERO;
    let mut total_attenuation = Color::ONE;

    for bounce in 0..params.max_depth {
        let Some(rec) = world.hit(&ray, ray_t) else {
            accumulated += sky_color(&ray, params.sky_intensity);
            return PathSample {
                radiance: accumulated * total_attenuation,
                bounces: bounce,
                termination: Termination::EscapedToSky,
            };
        };

        let result = rec.material.scatter(&ray, &rec, &params.scatter, rng);
        total_attenuation *= result.attenuation;
        accumulated += rec.material.emissive;

        match result.scattered {
            Some(scattered) => ray = scattered,
            None => {
                return PathSample {
                    radiance: accumulated * total_attenuation,
                    bounces: bounce + 1,
                    termination: Termination::Absorbed,
                }
            }
        }
    }

    PathSample {
        radiance: Color::ZERO,
        bounces: params.max_depth,
        termination: Termination::RecursionExhausted,
    }
}

/// Radiance arriving along `ray`.
pub fn ray_color<H: Hittable + ?Sized>(
    ray: &Ray,
    world: &H,
    params: &PathParams,
    rng: &mut dyn RngCore,
) -> Color {
    trace_path(ray, world, params, rng).radiance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Scene, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(max_depth: u32) -> PathParams {
        PathParams {
            max_depth,
            min_epsilon: 0.001,
            sky_intensity: 1.0,
            scatter: ScatterContext::default(),
        }
    }

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up should be more blue (less red than white)
        let up_color = sky_color(&Ray::new(Vec3::ZERO, Vec3::Y), 1.0);
        let down_color = sky_color(&Ray::new(Vec3::ZERO, Vec3::NEG_Y), 1.0);

        assert!((up_color - SKY_ZENITH).length() < 1e-6);
        assert!((down_color - SKY_HORIZON).length() < 1e-6);

        let dimmed = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)), 0.5);
        assert!((dimmed - SKY_ZENITH * 0.5).length() < 1e-6);
    }

    #[test]
    fn test_escape_to_sky() {
        let scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let sample = trace_path(&ray, &scene, &params(5), &mut rng);
        assert_eq!(sample.termination, Termination::EscapedToSky);
        assert_eq!(sample.bounces, 0);
        assert!((sample.radiance - sky_color(&ray, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_light_hit_returns_emission() {
        let mut scene = Scene::new();
        scene
            .add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::light(Vec3::new(3.0, 2.0, 1.0)))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let sample = trace_path(&ray, &scene, &params(1), &mut rng);
        assert_eq!(sample.termination, Termination::Absorbed);
        assert_eq!(sample.bounces, 1);
        assert_eq!(sample.radiance, Vec3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_mirror_then_sky_is_attenuated() {
        let mut scene = Scene::new();
        scene
            .add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::reflective(Vec3::splat(0.5)))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let sample = trace_path(&ray, &scene, &params(4), &mut rng);
        assert_eq!(sample.termination, Termination::EscapedToSky);
        assert_eq!(sample.bounces, 1);

        // Straight back along +Z: horizontal sky, halved by the mirror
        let expected = sky_color(&Ray::new(Vec3::ZERO, Vec3::Z), 1.0) * 0.5;
        assert!((sample.radiance - expected).length() < 1e-5);
    }

    #[test]
    fn test_recursion_exhausted_is_black() {
        // Two facing mirrors trap the path
        let mut scene = Scene::new();
        let mirror = Material::reflective(Vec3::ONE).with_emissive(Vec3::splat(0.1));
        scene.add_sphere(Vec3::ZERO, 10.0, mirror).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let sample = trace_path(&ray, &scene, &params(7), &mut rng);
        assert_eq!(sample.termination, Termination::RecursionExhausted);
        assert_eq!(sample.bounces, 7);
        assert_eq!(sample.radiance, Vec3::ZERO);
    }

    #[test]
    fn test_min_epsilon_skips_self_hit() {
        // Ray starting on the surface of a mirror must not re-hit it
        let mut scene = Scene::new();
        scene
            .add_sphere(Vec3::new(0.0, 0.0, -1.0), 1.0, Material::reflective(Vec3::ONE))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let sample = trace_path(&ray, &scene, &params(3), &mut rng);
        assert_eq!(sample.termination, Termination::EscapedToSky);
        assert_eq!(sample.bounces, 0);
    }

    #[test]
    fn test_radiance_is_finite_and_non_negative() {
        let scene = Scene::reference(3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let p = params(25);

        for _ in 0..2_000 {
            let d = crate::sampler::random_sphere_direction(&mut rng);
            let color = ray_color(&Ray::new(Vec3::ZERO, d), &scene, &p, &mut rng);
            assert!(color.is_finite());
            assert!(color.min_element() >= 0.0, "negative radiance {}", color);
        }
    }
}
