//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    error::SceneError,
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use glint_math::{Interval, Vec3};

/// Determinants below this magnitude mean the ray is parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Squared cross-product length below which a triangle is degenerate.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Raw Möller-Trumbore solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, counter-clockwise winding)
    normal: Vec3,
    /// Disables back-face culling
    double_sided: bool,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Fails when the vertices are collinear or not finite.
    pub fn new(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        double_sided: bool,
        material: Material,
    ) -> Result<Self, SceneError> {
        if !(v0.is_finite() && v1.is_finite() && v2.is_finite()) {
            return Err(SceneError::NonFinite("triangle vertex"));
        }

        let cross = (v1 - v0).cross(v2 - v0);
        if cross.length_squared() < DEGENERATE_EPSILON {
            return Err(SceneError::DegenerateTriangle);
        }

        Ok(Self {
            v0,
            v1,
            v2,
            normal: cross.normalize(),
            double_sided,
            material,
        })
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Solve for the hit distance and barycentric coordinates.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        // Back face
        if !self.double_sided && det < 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.v0;
        let u = tvec.dot(pvec) * inv_det;

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if !ray_t.contains(t) {
            return None;
        }

        Some(TriangleHit { t, u, v })
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let hit = self.intersect(ray, ray_t)?;
        // The geometric normal is kept as-is on both faces
        Some(HitRecord::new(ray, hit.t, self.normal, &self.material))
    }
}
