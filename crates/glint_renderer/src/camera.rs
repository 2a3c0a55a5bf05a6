//! Camera for ray generation.
//!
//! The camera basis is derived once per frame and handed to the pixel
//! estimator by reference.

use crate::Ray;
use glint_math::{Mat4, Vec2, Vec3};

/// Pinhole camera described by an orthonormal basis and the tangents of the
/// horizontal and vertical half-angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    /// tan(horizontal half-angle)
    canvas_u: f32,
    /// tan(vertical half-angle)
    canvas_v: f32,
}

impl Camera {
    /// Create a camera from an explicit basis.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect`: width / height
    pub fn from_basis(
        origin: Vec3,
        right: Vec3,
        up: Vec3,
        forward: Vec3,
        vfov: f32,
        aspect: f32,
    ) -> Self {
        let (canvas_u, canvas_v) = viewport_tangents(vfov, aspect);
        Self::from_tangents(origin, right, up, forward, canvas_u, canvas_v)
    }

    /// Create a camera from a basis and explicit half-angle tangents.
    pub fn from_tangents(
        origin: Vec3,
        right: Vec3,
        up: Vec3,
        forward: Vec3,
        canvas_u: f32,
        canvas_v: f32,
    ) -> Self {
        Self {
            origin,
            right: right.normalize(),
            up: up.normalize(),
            forward: forward.normalize(),
            canvas_u,
            canvas_v,
        }
    }

    /// The demo camera: at the origin looking down -Z, `hfov` degrees across
    /// the image width, the vertical extent shrunk by `height / width`.
    pub fn reference(hfov: f32, width: u32, height: u32) -> Self {
        let canvas_u = (hfov.to_radians() / 2.0).tan();
        let canvas_v = canvas_u * height as f32 / width.max(1) as f32;
        Self::from_tangents(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::NEG_Z, canvas_u, canvas_v)
    }

    /// Position the camera at `look_from`, facing `look_at`.
    pub fn look_at(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32) -> Self {
        // Calculate camera basis vectors
        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        Self::from_basis(look_from, u, v, -w, vfov, aspect)
    }

    /// Read the basis from a camera-to-world matrix (camera looks down its
    /// local -Z axis).
    pub fn from_world_matrix(camera_to_world: Mat4, vfov: f32, aspect: f32) -> Self {
        Self::from_basis(
            camera_to_world.w_axis.truncate(),
            camera_to_world.x_axis.truncate(),
            camera_to_world.y_axis.truncate(),
            -camera_to_world.z_axis.truncate(),
            vfov,
            aspect,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Half-angle tangents `(horizontal, vertical)`.
    pub fn canvas(&self) -> (f32, f32) {
        (self.canvas_u, self.canvas_v)
    }

    /// Ray through a normalized device coordinate in [-1, 1]², +Y up.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let direction = (ndc.x * self.canvas_u * self.right
            + ndc.y * self.canvas_v * self.up
            + self.forward)
            .normalize();
        Ray::new(self.origin, direction)
    }

    /// Ray for pixel (x, y) of a `width` x `height` image, row 0 at the top.
    ///
    /// `offset` jitters the sample position in pixels around the pixel center.
    /// Coordinates outside the image extrapolate past the frustum edge.
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32, offset: Vec2) -> Ray {
        let px = x as f32 + 0.5 + offset.x;
        let py = height as f32 - y as f32 - 0.5 + offset.y;
        let ndc = Vec2::new(px / width as f32, py / height as f32) * 2.0 - Vec2::ONE;
        self.ray_through(ndc)
    }
}

impl Default for Camera {
    /// At the origin looking down -Z with a 60° vertical field of view.
    fn default() -> Self {
        Self::from_basis(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::NEG_Z, 60.0, 1.0)
    }
}

/// Tangents of the horizontal and vertical half-angles.
pub fn viewport_tangents(vfov: f32, aspect: f32) -> (f32, f32) {
    let v = (vfov.to_radians() / 2.0).tan();
    (v * aspect, v)
}
