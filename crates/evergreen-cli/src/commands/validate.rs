//! Scene validation command

use anyhow::{bail, Result};
use evergreen_formation::SceneConfig;
use serde::Serialize;

pub struct ValidateArgs {
    pub scene: String,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub count: usize,
    pub scatter_radius: f32,
    pub base_radius: f32,
    pub height: f32,
    pub damping_rate: f32,
}

/// One row per group, foliage first
pub fn summarize(config: &SceneConfig) -> Vec<GroupSummary> {
    let foliage = &config.foliage;
    let mut rows = vec![GroupSummary {
        label: "foliage".to_string(),
        count: foliage.count,
        scatter_radius: foliage.scatter_radius,
        base_radius: foliage.base_radius,
        height: foliage.height,
        damping_rate: foliage.damping_rate,
    }];
    rows.extend(config.ornaments.iter().map(|o| GroupSummary {
        label: o.label(),
        count: o.count,
        scatter_radius: o.scatter_radius,
        base_radius: o.base_radius,
        height: o.height,
        damping_rate: o.damping_rate,
    }));
    rows
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let config = super::load_config(Some(args.scene.as_str()), None)?;
    let rows = summarize(&config);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "text" => {
            println!("Scene '{}' is valid ({} particles)", config.scene.name, config.total_count());
            for row in &rows {
                println!(
                    "  {:<14} x{:<6} scatter {:>5.1}  base {:>4.1}  height {:>4.1}  damping {:.2}",
                    row.label, row.count, row.scatter_radius, row.base_radius, row.height, row.damping_rate
                );
            }
        }
        _ => bail!("Unknown format: {}", args.format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_summary() {
        let rows = summarize(&SceneConfig::default());
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["foliage", "box/gold", "sphere/red", "sphere/silver"]);
        assert_eq!(rows[0].count, 6000);
        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), 6450);
    }
}
