//! Scene assembly.
//!
//! A scene is two ordered primitive lists, built once per frame and then only
//! read while tracing. Every primitive is validated on the way in.

use crate::{
    error::SceneError,
    hittable::{HitRecord, Hittable},
    Color, Material, Ray, Sphere, Triangle,
};
use glint_math::{Interval, Vec3};

/// Static list of spheres and triangles.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    triangles: Vec<Triangle>,
    /// Sphere whose emission tracks the sun intensity setting
    sun: Option<usize>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a sphere, returning its index.
    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: Material,
    ) -> Result<usize, SceneError> {
        let sphere = Sphere::new(center, radius, material)?;
        self.spheres.push(sphere);
        Ok(self.spheres.len() - 1)
    }

    /// Validate and append a triangle, returning its index.
    pub fn add_triangle(
        &mut self,
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        double_sided: bool,
        material: Material,
    ) -> Result<usize, SceneError> {
        let triangle = Triangle::new(v0, v1, v2, double_sided, material)?;
        self.triangles.push(triangle);
        Ok(self.triangles.len() - 1)
    }

    /// Append a sphere and designate it as the sun.
    pub fn add_sun(
        &mut self,
        center: Vec3,
        radius: f32,
        material: Material,
    ) -> Result<usize, SceneError> {
        let index = self.add_sphere(center, radius, material)?;
        self.sun = Some(index);
        Ok(index)
    }

    /// Re-bake the sun sphere's emission. No-op without a sun.
    pub fn set_sun_intensity(&mut self, intensity: f32) {
        if let Some(sun) = self.sun.and_then(|index| self.spheres.get_mut(index)) {
            let material = sun.material().with_emissive(Color::splat(intensity));
            sun.set_material(material);
        }
    }

    pub fn sun(&self) -> Option<&Sphere> {
        self.sun.and_then(|index| self.spheres.get(index))
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Total primitive count.
    pub fn len(&self) -> usize {
        self.spheres.len() + self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The demo scene: three small spheres on a yellow ground sphere, a blue
    /// sphere and two triangles further back, and a large sun sphere whose
    /// emission is `sun_intensity`.
    pub fn reference(sun_intensity: f32) -> Result<Self, SceneError> {
        let ground = Material::diffuse(Color::new(0.8, 0.8, 0.0));
        let center = Material::refractive(Color::new(0.95, 0.95, 0.85));
        let left = Material::reflective(Color::new(0.9, 0.9, 0.9));
        let right = Material::diffuse(Color::new(0.7, 0.3, 0.3));
        let back = Material::diffuse(Color::new(0.48, 0.83, 0.93));
        let sun = Material::diffuse(Color::ONE).with_emissive(Color::splat(sun_intensity));
        let tri_far = Material::diffuse(Color::new(1.0, 1.0, 0.0));
        let tri_near = Material::reflective(Color::new(0.7, 0.7, 0.0))
            .with_emissive(Color::new(0.8, 0.0, 5.0));

        let mut scene = Self::new();
        scene.add_sphere(Vec3::new(-1.2, 0.0, -5.0), 0.5, left)?;
        scene.add_sphere(Vec3::new(0.0, -0.2, -5.0), 0.3, center)?;
        scene.add_sphere(Vec3::new(1.2, 0.0, -4.5), 0.5, right)?;
        scene.add_sphere(Vec3::new(0.0, -100.5, -5.0), 100.0, ground)?;
        scene.add_sphere(Vec3::new(1.0, 0.0, -10.0), 1.0, back)?;
        scene.add_sun(Vec3::new(0.0, 0.0, -30.0), 10.0, sun)?;

        scene.add_triangle(
            Vec3::new(-1.0, 0.0, -15.0),
            Vec3::new(1.0, 0.0, -15.0),
            Vec3::new(0.0, 2.0, -15.0),
            false,
            tri_far,
        )?;
        scene.add_triangle(
            Vec3::new(-3.0, 0.0, -10.0),
            Vec3::new(-1.0, 0.0, -10.0),
            Vec3::new(0.0, 2.0, -10.0),
            true,
            tri_near,
        )?;

        log::debug!(
            "Built reference scene: {} spheres, {} triangles, sun intensity {}",
            scene.spheres.len(),
            scene.triangles.len(),
            sun_intensity
        );

        Ok(scene)
    }
}

impl Hittable for Scene {
    /// Spheres first, then triangles. A triangle only replaces a sphere hit
    /// when it is strictly closer.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let sphere_hit = self.spheres.as_slice().hit(ray, ray_t);
        let triangle_t = sphere_hit.map_or(ray_t, |rec| ray_t.with_max(rec.t));

        match self.triangles.as_slice().hit(ray, triangle_t) {
            Some(rec) if sphere_hit.map_or(true, |best| rec.t < best.t) => Some(rec),
            _ => sphere_hit,
        }
    }
}
