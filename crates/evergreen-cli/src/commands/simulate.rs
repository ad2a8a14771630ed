//! Headless progress trace: step a scene with a fixed delta and sample every group

use anyhow::{bail, Result};
use evergreen_formation::{GroupSnapshot, SceneConfig};
use evergreen_player::Session;
use evergreen_runtime::FormationState;
use serde::Serialize;

pub struct SimulateArgs {
    pub scene: Option<String>,
    pub seed: Option<u32>,
    pub duration: f64,
    pub dt: f64,
    pub every: f64,
    pub toggle_at: Vec<f64>,
    pub no_auto: bool,
    pub format: String,
}

/// Stepping parameters, independent of where the scene came from
#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub duration: f64,
    pub dt: f64,
    /// Sampling interval in seconds, rounded to a whole number of steps
    pub every: f64,
    /// Times at which the formation is toggled, in seconds
    pub toggle_at: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceSample {
    pub time: f64,
    pub state: FormationState,
    pub groups: Vec<GroupSnapshot>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = super::load_config(args.scene.as_deref(), args.seed)?;
    if args.no_auto {
        config.scene.auto_assemble = false;
    }

    let samples = trace(
        &config,
        &TraceOptions {
            duration: args.duration,
            dt: args.dt,
            every: args.every,
            toggle_at: args.toggle_at,
        },
    )?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&samples)?),
        "text" => print!("{}", format_text(&samples)),
        _ => bail!("Unknown format: {}", args.format),
    }
    Ok(())
}

pub fn trace(config: &SceneConfig, options: &TraceOptions) -> Result<Vec<TraceSample>> {
    if !(options.dt.is_finite() && options.dt > 0.0 && options.dt <= 0.25) {
        bail!("--dt must be in (0, 0.25], got {}", options.dt);
    }
    if !(options.duration.is_finite() && options.duration >= 0.0) {
        bail!("--duration must be zero or more, got {}", options.duration);
    }

    let mut session = Session::new(config, 1.0)?;
    let steps = (options.duration / options.dt).round() as usize;
    let steps_per_sample = ((options.every / options.dt).round() as usize).max(1);

    let mut toggles = options.toggle_at.clone();
    toggles.sort_by(f64::total_cmp);
    let mut toggles = toggles.into_iter().peekable();

    let sample = |session: &Session| TraceSample {
        time: session.clock.total_time,
        state: session.state(),
        groups: session.system.snapshots(),
    };

    let mut samples = vec![sample(&session)];
    for step in 1..=steps {
        while toggles
            .next_if(|&t| t <= session.clock.total_time + options.dt * 0.5)
            .is_some()
        {
            session.toggle_formation();
        }
        session.step(options.dt)?;
        if step % steps_per_sample == 0 || step == steps {
            samples.push(sample(&session));
        }
    }
    Ok(samples)
}

pub fn format_text(samples: &[TraceSample]) -> String {
    let Some(first) = samples.first() else {
        return String::new();
    };

    let mut out = format!("{:>8}  {:<10}", "time", "state");
    for group in &first.groups {
        out.push_str(&format!("  {:>14}", group.label));
    }
    out.push('\n');

    for sample in samples {
        out.push_str(&format!("{:>7.2}s  {:<10}", sample.time, sample.state.name()));
        for group in &sample.groups {
            let mark = if group.settled { '*' } else { ' ' };
            out.push_str(&format!("  {:>13.4}{}", group.progress, mark));
        }
        out.push('\n');
    }
    out
}
