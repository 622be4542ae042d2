//! Core library of the OBS Obfuscator.
//!
//! Watches a masked region of a monitor for known reference images (for
//! example a game's minimap) using ORB feature matching, and switches OBS
//! between a default scene and a target scene when they appear or vanish.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use obfuscator_core::config::{CoreConfigBuilder, ResolutionProfile};
//! use obfuscator_core::controller::SceneController;
//! use obfuscator_core::driver::{Driver, ScenePair};
//! use obfuscator_core::external::{MonitorCapture, ObsWebsocket, SceneSwitcher, ThreadSleep};
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .resource_dir(PathBuf::from("/path/to/resources"))
//!     .profile(ResolutionProfile::P1080)
//!     .build();
//! config.validate().unwrap();
//!
//! let detector = obfuscator_core::load_detector(&config).unwrap();
//! let mut obs = ObsWebsocket::connect(&config.websocket_url()).unwrap();
//! println!("Scenes: {:?}", obs.list_scenes().unwrap());
//!
//! let mut driver = Driver::new(
//!     MonitorCapture::new(config.monitor).unwrap(),
//!     obs,
//!     ThreadSleep,
//!     detector,
//!     SceneController::new(config.settle_delay),
//!     ScenePair::new(&config.default_scene, &config.target_scene),
//! );
//! driver.run();
//! ```

pub mod config;
pub mod controller;
pub mod detection;
pub mod driver;
pub mod error;
pub mod external;
pub mod features;
pub mod resources;

// Re-exports for public API
pub use config::{CoreConfig, ResolutionProfile, Settings};
pub use controller::{SceneCommand, SceneController, SceneState};
pub use detection::{DetectionSignal, Detector, Frame};
pub use driver::{Driver, ScenePair, TickReport};
pub use error::{CoreError, CoreResult};
pub use resources::{load_resources, Mask, ReferenceSet, ResourceLayout};

use detection::DebugOverlay;
use features::OrbDetector;

/// Loads the resources named by `config` and builds the frame detector.
///
/// Fails with a configuration error when the reference directory or the
/// mask is missing, before anything else is set up.
pub fn load_detector(config: &CoreConfig) -> CoreResult<Detector> {
    let layout = ResourceLayout::new(&config.resource_dir, config.profile);
    let orb = OrbDetector::new(config.orb_config());
    let (references, mask) = load_resources(&layout, &orb)?;

    let mut detector = Detector::new(orb, references, mask, config.required_good_matches);
    if config.show_debug_window {
        let dir = config.effective_debug_dir();
        std::fs::create_dir_all(&dir)?;
        let overlay = DebugOverlay::new(&dir);
        log::info!("Writing debug frames to {}", overlay.path().display());
        detector = detector.with_debug_overlay(overlay);
    }
    Ok(detector)
}
