// ============================================================================
// obfuscator-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Obfuscator Core
//
// Errors are split by how the driver reacts to them:
// - Configuration: fatal, surfaced before the main loop starts
// - Capture: the current tick becomes a no-op
// - PresentationService: logged, the controller is not rolled back
//
// Wrapped library errors (io, image, json, websocket) are mapped onto these
// kinds at the call site wherever the kind matters to the caller.

use thiserror::Error;

/// Errors produced by the obfuscator core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing or invalid resource directory, mask file, reference image or
    /// option value. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No frame could be produced for this tick.
    #[error("Capture error: {0}")]
    Capture(String),

    /// The scene-control service refused or failed a request.
    #[error("Presentation service error: {0}")]
    PresentationService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether this error must stop the process before the main loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Configuration(_))
    }
}

/// Result type for obfuscator core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl From<tungstenite::Error> for CoreError {
    fn from(err: tungstenite::Error) -> Self {
        CoreError::PresentationService(err.to_string())
    }
}

impl From<xcap::XCapError> for CoreError {
    fn from(err: xcap::XCapError) -> Self {
        CoreError::Capture(err.to_string())
    }
}
