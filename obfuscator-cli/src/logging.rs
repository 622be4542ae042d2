// ============================================================================
// obfuscator-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Optional File Logging
//
// Console output goes through env_logger with a colored level tag. When a
// log file is requested, fern dispatches every record to both the console
// and the file; the file copy has ANSI codes stripped.
//
// Level selection:
// - --verbose: debug
// - otherwise RUST_LOG if set (e.g. RUST_LOG=trace), else info
//
// AI-ASSISTANT-INFO: Logger initialization and log file naming

// ---- Internal crate imports ----
use crate::error::{CliErrorContext, CliResult};

// ---- External crate imports ----
use log::{Level, LevelFilter, Record};
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Resolves `--log-file`: a directory gets a timestamped file inside it.
pub fn log_file_path(requested: &Path) -> PathBuf {
    if requested.is_dir() {
        requested.join(format!("obs-obfuscator_{}.log", get_timestamp()))
    } else {
        requested.to_path_buf()
    }
}

/// Level from `--verbose` and `RUST_LOG`.
pub fn select_level(verbose: bool, rust_log: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    rust_log
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn level_tag(level: Level, color: bool) -> String {
    let tag = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    if !color {
        return tag.to_string();
    }
    match level {
        Level::Error => tag.bright_red().to_string(),
        Level::Warn => tag.yellow().to_string(),
        Level::Info => tag.green().to_string(),
        Level::Debug => tag.blue().to_string(),
        Level::Trace => tag.magenta().to_string(),
    }
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn format_line(record: &Record, color: bool) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    format!("{} {} {}", timestamp, level_tag(record.level(), color), record.args())
}

/// Initializes the global logger. Call once, before any other output.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = select_level(verbose, rust_log.as_deref());
    let color = use_color();

    let Some(requested) = log_file else {
        env_logger::Builder::new()
            .format(move |buf, record| writeln!(buf, "{}", format_line(record, color)))
            .filter_level(level)
            .init();
        return Ok(None);
    };

    let path = log_file_path(requested);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .cli_with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = fern::log_file(&path)
        .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;

    let console = fern::Dispatch::new()
        .format(move |out, _message, record| {
            out.finish(format_args!("{}", format_line(record, color)))
        })
        .chain(std::io::stderr());
    let file_output = fern::Dispatch::new()
        .format(|out, _message, record| {
            let line = strip_ansi_escapes::strip_str(format_line(record, false));
            out.finish(format_args!("{}", line))
        })
        .chain(file);

    fern::Dispatch::new()
        .level(level)
        .chain(console)
        .chain(file_output)
        .apply()
        .map_err(|e| {
            obfuscator_core::CoreError::Configuration(format!(
                "Logger already initialized: {}",
                e
            ))
        })?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }

    #[test]
    fn test_select_level() {
        assert_eq!(select_level(true, Some("error")), LevelFilter::Debug);
        assert_eq!(select_level(false, Some("trace")), LevelFilter::Trace);
        assert_eq!(select_level(false, Some("bogus")), LevelFilter::Info);
        assert_eq!(select_level(false, None), LevelFilter::Info);
    }

    #[test]
    fn test_log_file_path_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.extension().is_some_and(|ext| ext == "log"));

        let explicit = dir.path().join("run.log");
        assert_eq!(log_file_path(&explicit), explicit);
    }

    #[test]
    fn test_plain_level_tag() {
        assert_eq!(level_tag(Level::Warn, false), "WARN ");
    }
}
