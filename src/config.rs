use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "assets/viewer.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub path: String,
    #[serde(default)]
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureChoice {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Loaded in order; failures are skipped.
    pub models: Vec<ModelEntry>,
    pub textures: Vec<TextureChoice>,
    pub extension_min: f32,
    pub extension_max: f32,
    pub extension_duration_ms: u64,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub background: [f32; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ModelEntry {
                    path: "assets/models/crate.gltf".to_string(),
                    position: Vec3::new(-1.5, 0.0, 0.0),
                },
                ModelEntry {
                    path: "assets/models/pillar.gltf".to_string(),
                    position: Vec3::new(1.5, 0.0, 0.0),
                },
            ],
            textures: vec![
                TextureChoice {
                    label: "Checker".to_string(),
                    path: "assets/textures/checker.png".to_string(),
                },
                TextureChoice {
                    label: "Stripes".to_string(),
                    path: "assets/textures/stripes.png".to_string(),
                },
                TextureChoice {
                    label: "Dots".to_string(),
                    path: "assets/textures/dots.png".to_string(),
                },
            ],
            extension_min: 0.0,
            extension_max: 2.0,
            extension_duration_ms: 300,
            grid_size: 20.0,
            grid_divisions: 20,
            camera_eye: Vec3::new(0.0, 3.0, -6.0),
            camera_target: Vec3::new(0.0, 0.5, 0.0),
            background: [0.12, 0.12, 0.14],
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let config: ViewerConfig = ron::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        // x * (1 + factor) collapses or mirrors the model at -1 and below.
        if config.extension_min <= -1.0 {
            anyhow::bail!(
                "{}: extension_min ({}) must be greater than -1",
                path.display(),
                config.extension_min
            );
        }

        if config.extension_min > config.extension_max {
            anyhow::bail!(
                "{}: extension_min ({}) is greater than extension_max ({})",
                path.display(),
                config.extension_min,
                config.extension_max
            );
        }

        Ok(config)
    }

    /// Falls back to the built-in defaults when the file is missing or bad.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }

    #[cfg(test)]
    pub fn to_ron(&self) -> anyhow::Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .context("Failed to serialize config")
    }
}
