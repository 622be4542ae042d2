// ============================================================================
// obfuscator-core/src/config/settings.rs
// ============================================================================
//
// LAYERED SETTINGS: Partial Configuration From One Source
//
// A `Settings` value holds whatever a single source provides: command-line
// flags, `OBFUSCATOR_*` environment variables or the JSON settings file.
// Layers are combined with `or`, the left-hand side winning, and resolved
// into a `CoreConfig` on top of the built-in defaults:
//
//     flags.or(env).or(file).into_config()
//
// Option names match the command-line flags (`scene_on`, `matches`, ...).

use super::utils::{get_env_bool, get_env_parsed, get_env_path, get_env_string, process_env};
use super::{CoreConfig, CoreConfigBuilder, ResolutionProfile};
use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Partial configuration from a single source. Unset values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resource_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub monitor: Option<usize>,
    pub scene_on: Option<String>,
    pub scene_off: Option<String>,
    pub features: Option<usize>,
    pub matches: Option<usize>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub show_debug_window: Option<bool>,
    pub debug_dir: Option<PathBuf>,
    pub settle_delay_ms: Option<u64>,
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// Any read or parse failure is a configuration error naming the file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Configuration(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            CoreError::Configuration(format!(
                "Invalid settings file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads settings from a JSON file if it exists, otherwise returns empty settings.
    pub fn from_optional_file(path: &Path) -> CoreResult<Self> {
        if path.is_file() {
            log::debug!("Loading settings file: {}", path.display());
            Self::from_file(path)
        } else {
            log::debug!("No settings file at {}", path.display());
            Ok(Self::default())
        }
    }

    /// Reads `OBFUSCATOR_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    /// Reads `OBFUSCATOR_*` variables through the given lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            resource_dir: get_env_path(&lookup, "resource_dir"),
            format: get_env_string(&lookup, "format"),
            monitor: get_env_parsed(&lookup, "monitor"),
            scene_on: get_env_string(&lookup, "scene_on"),
            scene_off: get_env_string(&lookup, "scene_off"),
            features: get_env_parsed(&lookup, "features"),
            matches: get_env_parsed(&lookup, "matches"),
            host: get_env_string(&lookup, "host"),
            port: get_env_parsed(&lookup, "port"),
            show_debug_window: get_env_bool(&lookup, "show_debug_window"),
            debug_dir: get_env_path(&lookup, "debug_dir"),
            settle_delay_ms: get_env_parsed(&lookup, "settle_delay_ms"),
        }
    }

    /// Fills unset values from a lower-precedence layer.
    pub fn or(self, lower: Settings) -> Settings {
        Settings {
            resource_dir: self.resource_dir.or(lower.resource_dir),
            format: self.format.or(lower.format),
            monitor: self.monitor.or(lower.monitor),
            scene_on: self.scene_on.or(lower.scene_on),
            scene_off: self.scene_off.or(lower.scene_off),
            features: self.features.or(lower.features),
            matches: self.matches.or(lower.matches),
            host: self.host.or(lower.host),
            port: self.port.or(lower.port),
            show_debug_window: self.show_debug_window.or(lower.show_debug_window),
            debug_dir: self.debug_dir.or(lower.debug_dir),
            settle_delay_ms: self.settle_delay_ms.or(lower.settle_delay_ms),
        }
    }

    /// Resolves the layered settings into a validated [`CoreConfig`].
    ///
    /// `resource_dir` and `format` have no defaults and must be set by some layer.
    pub fn into_config(self) -> CoreResult<CoreConfig> {
        let resource_dir = self.resource_dir.ok_or_else(|| {
            CoreError::Configuration("No resource directory given".to_string())
        })?;
        let format = self.format.ok_or_else(|| {
            CoreError::Configuration(format!(
                "No screen format given. Valid options: {}",
                ResolutionProfile::variants_display()
            ))
        })?;
        let profile: ResolutionProfile = format
            .parse()
            .map_err(|e: super::ResolutionProfileParseError| {
                CoreError::Configuration(e.to_string())
            })?;

        let mut builder = CoreConfigBuilder::new()
            .resource_dir(resource_dir)
            .profile(profile);

        if let Some(monitor) = self.monitor {
            builder = builder.monitor(monitor);
        }
        if let Some(scene) = self.scene_on {
            builder = builder.target_scene(scene);
        }
        if let Some(scene) = self.scene_off {
            builder = builder.default_scene(scene);
        }
        if let Some(features) = self.features {
            builder = builder.features(features);
        }
        if let Some(matches) = self.matches {
            builder = builder.required_good_matches(matches);
        }
        if let Some(host) = self.host {
            builder = builder.host(host);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(enabled) = self.show_debug_window {
            builder = builder.show_debug_window(enabled);
        }
        if let Some(dir) = self.debug_dir {
            builder = builder.debug_dir(dir);
        }
        if let Some(ms) = self.settle_delay_ms {
            builder = builder.settle_delay(Duration::from_millis(ms));
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}
