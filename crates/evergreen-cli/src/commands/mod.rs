//! CLI command implementations

pub mod config;
pub mod play;
pub mod render;
pub mod simulate;
pub mod validate;

use anyhow::{Context, Result};
use evergreen_formation::{load_scene_config, SceneConfig};

/// Load a scene file, or the built-in scene when none is given, then apply a seed override
pub fn load_config(scene: Option<&str>, seed: Option<u32>) -> Result<SceneConfig> {
    let mut config = match scene {
        Some(path) => load_scene_config(path).with_context(|| format!("Failed to load scene: {path}"))?,
        None => SceneConfig::default(),
    };
    if seed.is_some() {
        config.scene.seed = seed;
    }
    Ok(config)
}
