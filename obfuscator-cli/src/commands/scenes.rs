//! `scenes`: prints the scene names OBS reports, to help pick
//! `--scene-on` / `--scene-off`.

use crate::cli::ScenesArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use obfuscator_core::external::{ObsWebsocket, SceneSwitcher};

pub fn run_scenes(args: &ScenesArgs) -> CliResult<()> {
    let url = format!("ws://{}:{}", args.host, args.port);
    let mut obs = ObsWebsocket::connect(&url)?;
    let scenes = obs.list_scenes().cli_context("Failed to list OBS scenes")?;

    terminal::print_section("OBS Scenes");
    for scene in &scenes {
        terminal::print_item(scene);
    }
    Ok(())
}
