// ============================================================================
// obfuscator-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the obfuscator-core error type. Context added here keeps the
// error's kind, so a configuration problem stays a configuration problem
// after the CLI has described where it happened.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: context extension for Result and Option
//
// AI-ASSISTANT-INFO: CLI error handling utilities

// ---- Internal crate imports ----
use obfuscator_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

/// Prefixes the error message with `context`, keeping the error kind.
///
/// Wrapped library errors are reported as configuration errors since the
/// CLI only touches files and the environment during startup.
fn with_context(error: CoreError, context: impl fmt::Display) -> CoreError {
    match error {
        CoreError::Capture(msg) => CoreError::Capture(format!("{}: {}", context, msg)),
        CoreError::PresentationService(msg) => {
            CoreError::PresentationService(format!("{}: {}", context, msg))
        }
        CoreError::Configuration(msg) => CoreError::Configuration(format!("{}: {}", context, msg)),
        other => CoreError::Configuration(format!("{}: {}", context, other)),
    }
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| with_context(e.into(), context))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| with_context(e.into(), f()))
    }
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.ok_or_else(|| CoreError::Configuration(context.to_string()))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| CoreError::Configuration(f().to_string()))
    }
}

/// Short hint shown under an error, if there is a common fix.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::Configuration(msg)
            if msg.contains("Mask file")
                || msg.contains("directory not found")
                || msg.contains("No reference images") =>
        {
            Some("Check the resource directory and that the game resources support the format")
        }
        CoreError::Configuration(msg) if msg.contains("screen format") => {
            Some("Pass --format or set OBFUSCATOR_FORMAT")
        }
        CoreError::PresentationService(_) => {
            Some("Make sure OBS is running with obs-websocket enabled on the configured port")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_keeps_error_kind() {
        let result: Result<(), CoreError> = Err(CoreError::PresentationService("refused".into()));
        match result.cli_context("Connecting to OBS") {
            Err(CoreError::PresentationService(msg)) => {
                assert_eq!(msg, "Connecting to OBS: refused")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_io_error_becomes_configuration_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.cli_with_context(|| "Reading settings").unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Reading settings"));
    }

    #[test]
    fn test_none_is_configuration_error() {
        let value: Option<u8> = None;
        assert!(matches!(value.cli_context("missing"), Err(CoreError::Configuration(_))));
    }
}
