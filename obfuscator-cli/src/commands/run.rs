// ============================================================================
// obfuscator-cli/src/commands/run.rs
// ============================================================================
//
// RUN COMMAND: Watch the Screen and Switch Scenes
//
// Startup order matters: configuration and game resources are validated
// before the monitor is opened and before OBS is contacted, so a missing
// mask or an unsupported format fails fast without touching OBS.
//
// AI-ASSISTANT-INFO: Entry point of the main watch loop

// ---- Internal crate imports ----
use crate::cli::RunArgs;
use crate::config::{layer_settings, load_file_settings};
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

// ---- External crate imports ----
use console::Term;
use log::{debug, warn};
use obfuscator_core::controller::SceneController;
use obfuscator_core::driver::{Driver, ScenePair};
use obfuscator_core::external::{MonitorCapture, ObsWebsocket, SceneSwitcher, ThreadSleep};
use obfuscator_core::{load_detector, CoreConfig, ResolutionProfile, Settings};

// ---- Standard library imports ----
use std::io::IsTerminal;
use std::path::Path;

/// Resolves the configuration from flags, environment and settings file.
///
/// When no layer provides a format and a user is at the terminal, the
/// format is asked for interactively.
pub fn resolve_config(args: &RunArgs, config_path: Option<&Path>) -> CliResult<CoreConfig> {
    let file = load_file_settings(config_path)?;
    let mut settings = layer_settings(args.to_settings(), Settings::from_env(), file);

    if settings.format.is_none() && std::io::stdin().is_terminal() {
        settings.format = Some(prompt_format(&Term::stderr())?);
    }

    settings.into_config()
}

fn prompt_format(term: &Term) -> CliResult<String> {
    term.write_str(&format!(
        "Your game resolution ({}): ",
        ResolutionProfile::variants_display()
    ))
    .cli_context("Failed to prompt for the screen format")?;
    let answer = term
        .read_line()
        .cli_context("Failed to read the screen format")?;
    Ok(answer.trim().to_string())
}

fn print_config(config: &CoreConfig) {
    terminal::print_section("Configuration");
    terminal::print_status("Resources", &config.resource_dir.display().to_string(), false);
    terminal::print_status("Format", config.profile.as_str(), true);
    terminal::print_status("Monitor", &config.monitor.to_string(), false);
    terminal::print_status("Scene on", &config.target_scene, true);
    terminal::print_status("Scene off", &config.default_scene, true);
    terminal::print_status("Features", &config.features.to_string(), false);
    terminal::print_status("Matches", &config.required_good_matches.to_string(), false);
    terminal::print_status("OBS", &config.websocket_url(), false);
    if config.show_debug_window {
        terminal::print_status(
            "Debug frames",
            &config.effective_debug_dir().display().to_string(),
            false,
        );
    }
}

/// Warns about configured scenes OBS does not know.
fn check_scenes(config: &CoreConfig, available: &[String]) {
    for scene in [&config.default_scene, &config.target_scene] {
        if !available.iter().any(|s| s == scene) {
            terminal::print_warning(&format!("OBS has no scene named '{}'", scene));
        }
    }
}

/// Runs the watch loop. Only returns on a startup error.
pub fn run_watch(args: &RunArgs, config_path: Option<&Path>) -> CliResult<()> {
    let config = resolve_config(args, config_path)?;
    print_config(&config);

    let detector = load_detector(&config)?;
    let capture = MonitorCapture::new(config.monitor)?;
    debug!("Monitor {} is {:?} pixels", capture.index(), capture.dimensions());

    let mut obs = ObsWebsocket::connect(&config.websocket_url())?;
    match obs.list_scenes() {
        Ok(scenes) => {
            terminal::print_status("Detected scenes", &scenes.join(", "), false);
            check_scenes(&config, &scenes);
        }
        Err(e) => warn!("Could not list OBS scenes: {}", e),
    }

    terminal::print_success("Watching the screen. Press Ctrl+C to stop.");
    let mut driver = Driver::new(
        capture,
        obs,
        ThreadSleep,
        detector,
        SceneController::new(config.settle_delay),
        ScenePair::new(&config.default_scene, &config.target_scene),
    );
    driver.run()
}
