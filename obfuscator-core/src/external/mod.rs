// ============================================================================
// obfuscator-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL COLLABORATORS: Screen Capture, OBS and Time
//
// The driver never talks to the screen, OBS or the clock directly. It goes
// through the traits below so tests can substitute their own fakes.
//
// KEY COMPONENTS:
// - FrameSource: produces one frame per call (MonitorCapture via xcap)
// - SceneSwitcher: lists and switches OBS scenes (ObsWebsocket)
// - Pause: blocks for the settle delay (ThreadSleep, NoPause)

// ---- Internal crate imports ----
use crate::detection::Frame;
use crate::error::CoreResult;

// ---- Standard library imports ----
use std::time::Duration;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Monitor capture through xcap
pub mod capture;

/// obs-websocket 4.x client
pub mod obs;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use capture::{list_monitors, MonitorCapture, MonitorInfo};
pub use obs::ObsWebsocket;

// ============================================================================
// TRAITS
// ============================================================================

/// Source of captured frames.
pub trait FrameSource {
    /// Captures the current frame. An error makes the tick a no-op.
    fn capture(&mut self) -> CoreResult<Frame>;
}

/// Scene control of the presentation service.
pub trait SceneSwitcher {
    /// Names of all scenes, in service order.
    fn list_scenes(&mut self) -> CoreResult<Vec<String>>;

    /// Makes `name` the active scene.
    fn set_current_scene(&mut self, name: &str) -> CoreResult<()>;
}

/// Blocking pause used for the settle delay.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&mut self, _duration: Duration) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn capture(&mut self) -> CoreResult<Frame> {
        (**self).capture()
    }
}

impl<T: SceneSwitcher + ?Sized> SceneSwitcher for Box<T> {
    fn list_scenes(&mut self) -> CoreResult<Vec<String>> {
        (**self).list_scenes()
    }

    fn set_current_scene(&mut self, name: &str) -> CoreResult<()> {
        (**self).set_current_scene(name)
    }
}
