use anyhow::Result;

use crate::config::{ViewerConfig, DEFAULT_CONFIG_PATH};

mod camera;
mod config;
mod controls;
mod engine;
mod extension;
mod gravity;
mod lighting;
mod material_manager;
mod math;
mod model;
mod model_loader;
mod rendering;
mod scene_graph;
mod selection;
mod texture_manager;
mod ui;
mod viewer;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ViewerConfig::load_or_default(&config_path);

    pollster::block_on(window::run(config))?;

    Ok(())
}
