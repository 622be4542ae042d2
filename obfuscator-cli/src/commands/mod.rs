//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Watches the screen and switches OBS scenes.
pub mod run;

/// Lists OBS scenes.
pub mod scenes;

/// Lists capturable monitors.
pub mod monitors;

pub use monitors::run_monitors;
pub use run::run_watch;
pub use scenes::run_scenes;
