// ============================================================================
// obfuscator-cli/src/config.rs
// ============================================================================
//
// CLI CONFIGURATION: Layering Flags, Environment and Settings File
//
// Precedence, highest first:
//   1. command-line flags
//   2. OBFUSCATOR_* environment variables
//   3. the settings file (settings.json next to the executable, or --config)
//   4. built-in defaults
//
// AI-ASSISTANT-INFO: Resolves RunArgs into layered obfuscator-core Settings

// ---- Internal crate imports ----
use crate::cli::RunArgs;
use crate::error::{CliErrorContext, CliResult};

// ---- External crate imports ----
use obfuscator_core::config::SETTINGS_FILE_NAME;
use obfuscator_core::Settings;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Settings file looked up when `--config` is not given.
pub fn default_settings_path() -> CliResult<PathBuf> {
    let exe = std::env::current_exe().cli_context("Failed to locate the executable")?;
    let dir = exe
        .parent()
        .cli_with_context(|| format!("Executable has no parent directory: {}", exe.display()))?;
    Ok(dir.join(SETTINGS_FILE_NAME))
}

/// Loads the settings file layer.
///
/// An explicit `--config` file must exist; the default file is optional.
pub fn load_file_settings(explicit: Option<&Path>) -> CliResult<Settings> {
    match explicit {
        Some(path) => Settings::from_file(path),
        None => Settings::from_optional_file(&default_settings_path()?),
    }
}

impl RunArgs {
    /// The command-line layer. Unset flags stay `None`.
    pub fn to_settings(&self) -> Settings {
        Settings {
            resource_dir: self.resource_dir.clone(),
            format: self.format.clone(),
            monitor: self.monitor,
            scene_on: self.scene_on.clone(),
            scene_off: self.scene_off.clone(),
            features: self.features,
            matches: self.matches,
            host: self.host.clone(),
            port: self.port,
            show_debug_window: self.show_debug_window.then_some(true),
            debug_dir: self.debug_dir.clone(),
            settle_delay_ms: self.settle_delay_ms,
        }
    }
}

/// Combines the three layers in precedence order.
pub fn layer_settings(flags: Settings, env: Settings, file: Settings) -> Settings {
    flags.or(env).or(file)
}
