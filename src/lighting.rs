use glam::Vec3;

#[derive(Debug, Clone)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Direction the light travels in, normalized.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.5,
            },
            directional: DirectionalLight {
                direction: Vec3::new(-1.0, -2.0, -1.5).normalize(),
                color: Vec3::ONE,
                intensity: 0.8,
            },
        }
    }
}
