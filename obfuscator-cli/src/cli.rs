// ============================================================================
// obfuscator-cli/src/cli.rs
// ============================================================================
//
// COMMAND LINE DEFINITION: Arguments and Subcommands
//
// Every `run` option is optional on the command line so that environment
// variables and the settings file can supply it; defaults are applied by
// obfuscator-core when the layers are resolved.

use clap::{Args, Parser, Subcommand};
use obfuscator_core::config::{DEFAULT_HOST, DEFAULT_PORT};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "OBS Obfuscator: switch OBS scenes when a game's map is on screen",
    long_about = "Watches a masked region of a monitor for known reference images using \
                  ORB feature matching and switches between two OBS scenes through \
                  obs-websocket."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write the log to this file (a directory gets a timestamped file)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Settings file (defaults to settings.json next to the executable)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the screen and switch scenes until interrupted
    Run(RunArgs),
    /// List the scenes OBS reports
    Scenes(ScenesArgs),
    /// List the monitors that can be captured
    Monitors,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory holding the {format}/ reference images and mask-{format}.png files
    #[arg(value_name = "RESOURCE_DIR")]
    pub resource_dir: Option<PathBuf>,

    /// Screen format: 720p, 960p, 1080p, 1440p or 2160p
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Index of the monitor to capture, starting at 1
    #[arg(short, long, value_name = "INDEX")]
    pub monitor: Option<usize>,

    /// Scene to activate while a reference image is visible
    #[arg(long, value_name = "SCENE")]
    pub scene_on: Option<String>,

    /// Scene to activate while no reference image is visible
    #[arg(long, value_name = "SCENE")]
    pub scene_off: Option<String>,

    /// Number of features to detect per image
    #[arg(long, value_name = "COUNT")]
    pub features: Option<usize>,

    /// Number of good matches a reference image must exceed
    #[arg(long, value_name = "COUNT")]
    pub matches: Option<usize>,

    /// obs-websocket host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// obs-websocket listening port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Write a keypoint overlay of every frame to the debug directory
    #[arg(long)]
    pub show_debug_window: bool,

    /// Directory for debug frames (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Pause before switching back to the default scene, in milliseconds
    #[arg(long, value_name = "MS")]
    pub settle_delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ScenesArgs {
    /// obs-websocket host
    #[arg(long, value_name = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// obs-websocket listening port
    #[arg(short, long, value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
