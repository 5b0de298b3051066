//! Smart mirror body and gesture analysis over recorded landmark streams.

use anyhow::{Context, Result};
use body_gesture_analysis::{
    app::{AppConfig, MirrorApp, OutputFormat},
    config::{Config, EXAMPLE_CONFIG},
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording to replay (JSON)
    #[arg(long, required_unless_present = "example_config")]
    recording: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Measurement smoothing filter, overrides the config file
    /// (none, moving_average[:N], median[:N], exponential[:alpha])
    #[arg(short, long)]
    filter: Option<String>,

    /// Report body measurements every N analyzed frames (0 disables)
    #[arg(long, default_value = "30")]
    measure_every: u64,

    /// Print actions and measurements as JSON lines
    #[arg(long)]
    json: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    example_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Body Gesture Analysis");

    let mut settings = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(filter) = args.filter {
        settings.smoothing.filter = filter;
    }
    settings.validate()?;

    let recording = args.recording.context("--recording is required")?;
    let config = AppConfig {
        recording,
        measure_every: args.measure_every,
        output: if args.json { OutputFormat::Json } else { OutputFormat::Text },
    };

    let mut app = MirrorApp::new(config, &settings)?;
    app.run()?;

    Ok(())
}
