//! Evergreen Player - standalone window binary
//!
//! Usage:
//!   evergreen-player [scene.toml] [--seed <n>] [--fullscreen]

use anyhow::{Context, Result};
use clap::Parser;
use evergreen_formation::{load_scene_config, SceneConfig};

#[derive(Parser)]
#[command(name = "evergreen-player")]
#[command(about = "Watch a particle cloud assemble into a tree")]
struct Args {
    /// Scene file; built-in defaults when omitted
    scene: Option<String>,

    /// Override the scene's generation seed
    #[arg(long)]
    seed: Option<u32>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.scene {
        Some(path) => load_scene_config(path).with_context(|| format!("Failed to load scene: {path}"))?,
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.scene.seed = args.seed;
    }

    println!("Scene: {} ({} particles)", config.scene.name, config.total_count());
    println!();
    println!("Controls:");
    println!("  Space    - Toggle scattered / formed");
    println!("  Drag     - Orbit");
    println!("  Wheel    - Zoom");
    println!("  F11      - Toggle fullscreen");
    println!("  Escape   - Exit");

    evergreen_player::run(config, args.fullscreen)
}
