//! Evergreen CLI - simulate, render, validate and play formation scenes

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, play, render, simulate, validate};

#[derive(Parser)]
#[command(name = "evergreen")]
#[command(about = "Particle clouds that assemble into a tree and scatter again", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a scene headlessly and print a progress trace
    Simulate {
        /// Path to scene file (built-in scene when omitted)
        scene: Option<String>,

        /// Override the generation seed
        #[arg(long)]
        seed: Option<u32>,

        /// Seconds to simulate
        #[arg(long, default_value = "6.0")]
        duration: f64,

        /// Fixed step in seconds
        #[arg(long, default_value = "0.016666667")]
        dt: f64,

        /// Sampling interval in seconds
        #[arg(long, default_value = "0.5")]
        every: f64,

        /// Toggle the formation at these times (repeatable)
        #[arg(long = "toggle-at")]
        toggle_at: Vec<f64>,

        /// Disable the scene's auto-assemble
        #[arg(long)]
        no_auto: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Render a scene to a PNG image (headless)
    Render {
        /// Path to scene file (built-in scene when omitted)
        scene: Option<String>,

        /// Override the generation seed
        #[arg(long)]
        seed: Option<u32>,

        /// Output image path
        #[arg(short, long, default_value = "render.png")]
        output: String,

        /// Image width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Seconds of simulation before capture
        #[arg(long, default_value = "6.0")]
        time: f64,

        /// Formation state: auto, scattered or formed
        #[arg(long, default_value = "auto", value_parser = parse_state_arg)]
        state: String,

        /// Camera orbit distance
        #[arg(long)]
        distance: Option<f32>,

        /// Camera horizontal angle in degrees
        #[arg(long)]
        yaw: Option<f32>,
    },

    /// Check a scene file and summarize its groups
    Validate {
        /// Path to scene file
        scene: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Open the interactive player
    Play {
        /// Path to scene file (built-in scene when omitted)
        scene: Option<String>,

        /// Override the generation seed
        #[arg(long)]
        seed: Option<u32>,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,
    },

    /// Print the built-in scene as TOML
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_state_arg(s: &str) -> Result<String, String> {
    render::parse_state(s).map(|_| s.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            scene,
            seed,
            duration,
            dt,
            every,
            toggle_at,
            no_auto,
            format,
        } => simulate::run(simulate::SimulateArgs {
            scene,
            seed,
            duration,
            dt,
            every,
            toggle_at,
            no_auto,
            format,
        }),
        Commands::Render {
            scene,
            seed,
            output,
            width,
            height,
            time,
            state,
            distance,
            yaw,
        } => render::run(render::RenderArgs {
            scene,
            seed,
            output,
            width,
            height,
            time,
            state,
            distance,
            yaw,
        }),
        Commands::Validate { scene, format } => validate::run(validate::ValidateArgs { scene, format }),
        Commands::Play {
            scene,
            seed,
            fullscreen,
        } => play::run(play::PlayArgs {
            scene,
            seed,
            fullscreen,
        }),
        Commands::Config { output } => config::run(output.as_deref()),
    }
}
