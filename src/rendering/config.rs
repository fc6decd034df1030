#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub clear_color: wgpu::Color,
    pub present_mode: wgpu::PresentMode,
}

impl RenderConfig {
    pub fn with_background(background: [f32; 3]) -> Self {
        Self {
            clear_color: wgpu::Color {
                r: background[0] as f64,
                g: background[1] as f64,
                b: background[2] as f64,
                a: 1.0,
            },
            ..Default::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}
