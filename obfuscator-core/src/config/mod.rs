//! Configuration structures and constants for the obfuscator-core library.
//!
//! This module provides the configuration of the detection pipeline, the
//! scene controller and the OBS connection. Values are layered from several
//! sources (flags, environment, settings file, built-in defaults); see
//! [`Settings`] for the layering and [`CoreConfigBuilder`] for the defaults.

mod builder;
mod settings;
pub mod utils;

use crate::error::{CoreError, CoreResult};
use crate::features::OrbConfig;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use builder::CoreConfigBuilder;
pub use settings::Settings;

// Default constants

/// Default monitor to capture. Monitors are numbered from 1.
pub const DEFAULT_MONITOR: usize = 1;

/// Scene shown while none of the reference images is visible.
pub const DEFAULT_SCENE_OFF: &str = "Live Gaming";

/// Scene shown while a reference image is visible.
pub const DEFAULT_SCENE_ON: &str = "Live Gaming (Map Covered)";

/// Default number of ORB features to detect per image.
pub const DEFAULT_FEATURES: usize = 500;

/// Default number of good matches a reference image must exceed to count as present.
pub const DEFAULT_REQUIRED_GOOD_MATCHES: usize = 20;

/// Default obs-websocket host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default obs-websocket listening port (obs-websocket 4.x).
pub const DEFAULT_PORT: u16 = 4444;

/// Pause before switching back to the default scene, in milliseconds.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// Prefix of the environment variables read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "OBFUSCATOR_";

/// Name of the settings file looked up next to the executable.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Screen formats the game resources are provided for.
///
/// Each profile selects a reference image directory and a mask file under
/// the resource directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionProfile {
    P720,
    P960,
    P1080,
    P1440,
    P2160,
}

impl ResolutionProfile {
    /// Directory and mask suffix for this profile.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResolutionProfile::P720 => "720p",
            ResolutionProfile::P960 => "960p",
            ResolutionProfile::P1080 => "1080p",
            ResolutionProfile::P1440 => "1440p",
            ResolutionProfile::P2160 => "2160p",
        }
    }

    /// All profiles, in ascending resolution.
    pub const fn all() -> &'static [ResolutionProfile] {
        &[
            ResolutionProfile::P720,
            ResolutionProfile::P960,
            ResolutionProfile::P1080,
            ResolutionProfile::P1440,
            ResolutionProfile::P2160,
        ]
    }

    /// Profile identifiers for help text and error messages.
    pub const fn variants() -> &'static [&'static str] {
        &["720p", "960p", "1080p", "1440p", "2160p"]
    }

    pub const fn variants_display() -> &'static str {
        "720p, 960p, 1080p, 1440p, 2160p"
    }
}

impl fmt::Display for ResolutionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a resolution profile from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionProfileParseError {
    invalid_value: String,
}

impl ResolutionProfileParseError {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self {
            invalid_value: value.into(),
        }
    }
}

impl fmt::Display for ResolutionProfileParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown screen format '{}'. Valid options: {}",
            self.invalid_value,
            ResolutionProfile::variants_display()
        )
    }
}

impl std::error::Error for ResolutionProfileParseError {}

impl FromStr for ResolutionProfile {
    type Err = ResolutionProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ResolutionProfile::all()
            .iter()
            .copied()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ResolutionProfileParseError::new(s))
    }
}

/// Main configuration structure for the obfuscator-core library.
///
/// Holds everything the driver needs: where the game resources live, which
/// monitor to watch, how strict the matcher is and which OBS scenes to
/// switch between. It is usually produced by [`Settings::into_config`] after
/// layering flags, environment and the settings file, or directly through
/// [`CoreConfigBuilder`].
///
/// # Examples
///
/// ```rust,no_run
/// use obfuscator_core::config::{CoreConfigBuilder, ResolutionProfile};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .resource_dir(PathBuf::from("/path/to/resources"))
///     .profile(ResolutionProfile::P1080)
///     .monitor(2)
///     .required_good_matches(25)
///     .build();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Resources ----

    /// Root directory holding `{profile}/` image directories and `mask-{profile}.png` files
    pub resource_dir: PathBuf,

    /// Screen format selecting the reference images and mask
    pub profile: ResolutionProfile,

    // ---- Capture ----

    /// Monitor to capture, numbered from 1
    pub monitor: usize,

    // ---- Matching ----

    /// Number of ORB features detected per image
    pub features: usize,

    /// A reference image is present when its good match count exceeds this value
    pub required_good_matches: usize,

    // ---- Scenes ----

    /// Scene shown while nothing is detected
    pub default_scene: String,

    /// Scene shown while a reference image is detected
    pub target_scene: String,

    /// Pause before switching back to the default scene
    pub settle_delay: Duration,

    // ---- OBS Connection ----

    /// obs-websocket host
    pub host: String,

    /// obs-websocket port
    pub port: u16,

    // ---- Diagnostics ----

    /// Render detected keypoints to a debug image every tick
    pub show_debug_window: bool,

    /// Directory for debug frames (defaults to the system temp dir)
    pub debug_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Creates a configuration with defaults for everything but the resources.
    pub fn new(resource_dir: PathBuf, profile: ResolutionProfile) -> Self {
        CoreConfigBuilder::new()
            .resource_dir(resource_dir)
            .profile(profile)
            .build()
    }

    /// Checks option values that the type system cannot.
    pub fn validate(&self) -> CoreResult<()> {
        if self.monitor == 0 {
            return Err(CoreError::Configuration(
                "Monitor index must be 1 or greater".to_string(),
            ));
        }
        if self.features == 0 {
            return Err(CoreError::Configuration(
                "Number of features must be greater than 0".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(CoreError::Configuration(
                "OBS websocket port must be greater than 0".to_string(),
            ));
        }
        if self.default_scene.trim().is_empty() || self.target_scene.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Scene names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// ORB parameters used for both reference images and captured frames.
    pub fn orb_config(&self) -> OrbConfig {
        OrbConfig {
            n_features: self.features,
            ..OrbConfig::default()
        }
    }

    /// Directory debug frames are written to.
    pub fn effective_debug_dir(&self) -> PathBuf {
        self.debug_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// obs-websocket URL built from host and port.
    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfigBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse_is_case_insensitive() {
        assert_eq!("1080P".parse::<ResolutionProfile>().unwrap(), ResolutionProfile::P1080);
        assert_eq!(" 720p ".parse::<ResolutionProfile>().unwrap(), ResolutionProfile::P720);
    }

    #[test]
    fn test_profile_parse_rejects_unknown() {
        let err = "4k".parse::<ResolutionProfile>().unwrap_err();
        assert!(err.to_string().contains("4k"));
        assert!(err.to_string().contains("2160p"));
    }

    #[test]
    fn test_profile_variants_match_as_str() {
        let names: Vec<&str> = ResolutionProfile::all().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ResolutionProfile::variants());
    }

    #[test]
    fn test_validate_rejects_zero_monitor() {
        let mut config = CoreConfig::new(PathBuf::from("res"), ResolutionProfile::P1080);
        config.monitor = 0;
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_features() {
        let mut config = CoreConfig::new(PathBuf::from("res"), ResolutionProfile::P1080);
        config.features = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = CoreConfig::new(PathBuf::from("res"), ResolutionProfile::P1440);
        assert!(config.validate().is_ok());
        assert_eq!(config.websocket_url(), "ws://localhost:4444");
        assert_eq!(config.orb_config().n_features, DEFAULT_FEATURES);
    }
}
