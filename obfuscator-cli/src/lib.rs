// obfuscator-cli/src/lib.rs
//
// Library portion of the OBS Obfuscator CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, RunArgs, ScenesArgs};
pub use commands::{run_monitors, run_scenes, run_watch};
pub use error::{CliErrorContext, CliResult};
