//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use glint_math::{Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Produced fresh for every query and borrowed from the primitive that was hit.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal (outward for spheres, winding order for triangles)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray arrived against the stored normal
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Build a record, deriving `front_face` from the ray and the stored normal.
    pub fn new(ray: &Ray, t: f32, normal: Vec3, material: &'a Material) -> Self {
        Self {
            p: ray.at(t),
            normal,
            t,
            front_face: ray.direction().dot(normal) < 0.0,
            material,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object with a distance inside `ray_t`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;
}

/// Linear closest-hit scan.
///
/// Each candidate is tested against the interval shrunk to the best distance
/// found so far, and only a strictly closer hit replaces it, so the earliest
/// object wins exact ties.
impl<T: Hittable> Hittable for [T] {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in self {
            let interval = closest.map_or(ray_t, |best| ray_t.with_max(best.t));
            if let Some(rec) = object.hit(ray, interval) {
                if closest.map_or(true, |best| rec.t < best.t) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }
}
