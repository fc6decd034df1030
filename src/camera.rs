use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::math::ray::Ray;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_resolution(&mut self, resolution: Vec2) {
        if resolution.x > 0.0 && resolution.y > 0.0 {
            self.aspect = resolution.x / resolution.y;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn get_vp_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    /// (x right, y up, both in -1..1).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.get_vp_matrix().inverse();

        let near = inverse * ndc.extend(0.0).extend(1.0);
        let far = inverse * ndc.extend(1.0).extend(1.0);

        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;

        Ray::new(near, far - near)
    }
}

/// Converts a cursor position in physical pixels to normalized device
/// coordinates.
pub fn cursor_to_ndc(cursor: Vec2, resolution: Vec2) -> Vec2 {
    if resolution.x <= 0.0 || resolution.y <= 0.0 {
        return Vec2::ZERO;
    }

    Vec2::new(
        cursor.x / resolution.x * 2.0 - 1.0,
        -(cursor.y / resolution.y * 2.0 - 1.0),
    )
}
