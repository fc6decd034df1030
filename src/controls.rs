use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Orbit camera around a target point: drag to rotate, wheel to zoom.
/// Input is accumulated and bled off over several frames.
pub struct OrbitControls {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,

    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,

    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitControls {
    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_SPEED: f32 = 0.1;
    const DAMPING: f32 = 0.8;
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 50.0;
    const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            target,
            yaw,
            pitch,
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            dragging: false,
            last_cursor: None,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        self.target
            + Vec3::new(
                self.yaw.sin() * cos_pitch,
                self.pitch.sin(),
                self.yaw.cos() * cos_pitch,
            ) * self.distance
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        if !dragging {
            self.last_cursor = None;
        }
    }

    pub fn cursor_moved(&mut self, cursor: Vec2) {
        if self.dragging {
            if let Some(last) = self.last_cursor {
                let delta = cursor - last;
                self.yaw_velocity -= delta.x * Self::ROTATE_SPEED;
                self.pitch_velocity += delta.y * Self::ROTATE_SPEED;
            }
        }

        self.last_cursor = Some(cursor);
    }

    /// Positive `lines` zooms in.
    pub fn scrolled(&mut self, lines: f32) {
        self.zoom_velocity -= lines * Self::ZOOM_SPEED;
    }

    /// Applies pending motion and writes eye/target into `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        self.distance = (self.distance * (1.0 + self.zoom_velocity))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);

        self.yaw_velocity *= Self::DAMPING;
        self.pitch_velocity *= Self::DAMPING;
        self.zoom_velocity *= Self::DAMPING;

        camera.eye = self.eye();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_eye_matches_constructor() {
        let eye = Vec3::new(0.0, 3.0, -6.0);
        let controls = OrbitControls::new(eye, Vec3::new(0.0, 0.5, 0.0));

        assert!((controls.eye() - eye).length() < 1e-4);
    }

    #[test]
    fn drag_rotates_and_settles() {
        let mut controls = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO, 1.0);

        controls.set_dragging(true);
        controls.cursor_moved(Vec2::new(100.0, 100.0));
        controls.cursor_moved(Vec2::new(150.0, 100.0));
        controls.set_dragging(false);

        for _ in 0..100 {
            controls.update(&mut camera);
        }

        assert!(camera.eye.x.abs() > 0.1);
        assert!((camera.eye.length() - 5.0).abs() < 1e-3);
        let settled = camera.eye;
        controls.update(&mut camera);
        assert!((camera.eye - settled).length() < 1e-4);
    }

    #[test]
    fn cursor_moves_without_drag_do_not_rotate() {
        let mut controls = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO, 1.0);

        controls.cursor_moved(Vec2::new(0.0, 0.0));
        controls.cursor_moved(Vec2::new(300.0, 300.0));
        controls.update(&mut camera);

        assert!((camera.eye - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut controls = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO, 1.0);

        for _ in 0..200 {
            controls.scrolled(5.0);
            controls.update(&mut camera);
        }

        assert!((camera.eye.length() - OrbitControls::MIN_DISTANCE).abs() < 1e-4);
    }
}
