//! Play command - opens the interactive player for a scene

use anyhow::Result;

pub struct PlayArgs {
    pub scene: Option<String>,
    pub seed: Option<u32>,
    pub fullscreen: bool,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let config = super::load_config(args.scene.as_deref(), args.seed)?;

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
