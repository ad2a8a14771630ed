//! Print the built-in scene as TOML, a starting point for custom scene files

use anyhow::{Context, Result};
use evergreen_formation::SceneConfig;

pub fn run(output: Option<&str>) -> Result<()> {
    let text = SceneConfig::default().to_toml_string()?;
    match output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("Failed to write {path}"))?;
            println!("Wrote default scene to {path}");
        }
        None => print!("{text}"),
    }
    Ok(())
}
