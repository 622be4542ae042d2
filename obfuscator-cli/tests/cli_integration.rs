use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary with a clean environment
fn obfuscator_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("obs-obfuscator").expect("Failed to find obs-obfuscator binary");
    for (key, _) in std::env::vars() {
        if key.starts_with("OBFUSCATOR_") || key == "RUST_LOG" {
            cmd.env_remove(key);
        }
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Writes an empty settings file so the test never picks up one next to the binary.
fn empty_settings(dir: &std::path::Path) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("settings.json");
    fs::write(&path, "{}")?;
    Ok(path)
}

#[test]
fn test_help_lists_subcommands() -> Result<(), Box<dyn Error>> {
    obfuscator_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("run"))
        .stdout(contains("scenes"))
        .stdout(contains("monitors"));
    Ok(())
}

#[test]
fn test_run_missing_mask_fails_before_connecting() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    fs::create_dir_all(resources.path().join("1080p"))?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .arg("run")
        .arg(resources.path())
        .args(["--format", "1080p"])
        // Nothing listens here; a connection attempt would report OBS instead.
        .args(["--port", "1"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("mask-1080p.png"));
    Ok(())
}

#[test]
fn test_run_unsupported_format_directory() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .arg("run")
        .arg(resources.path())
        .args(["--format", "720p"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("720p"));
    Ok(())
}

#[test]
fn test_run_invalid_format() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .arg("run")
        .arg(resources.path())
        .args(["--format", "480p"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Unknown screen format '480p'"));
    Ok(())
}

#[test]
fn test_run_without_format_and_no_terminal() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .arg("run")
        .arg(resources.path())
        .arg("--config")
        .arg(&settings)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("No screen format given"));
    Ok(())
}

#[test]
fn test_format_from_environment() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .env("OBFUSCATOR_FORMAT", "1440p")
        .arg("run")
        .arg(resources.path())
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .stderr(contains("1440p"));
    Ok(())
}

#[test]
fn test_settings_file_supplies_resource_dir() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = resources.path().join("settings.json");
    fs::write(
        &settings,
        format!(
            r#"{{ "resource_dir": {:?}, "format": "2160p" }}"#,
            resources.path().display().to_string()
        ),
    )?;

    obfuscator_cmd()
        .arg("run")
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .stderr(contains("2160p"));
    Ok(())
}

#[test]
fn test_missing_explicit_settings_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    obfuscator_cmd()
        .arg("run")
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("absent.json"));
    Ok(())
}

#[test]
fn test_errors_still_reported_with_quiet_log_level() -> Result<(), Box<dyn Error>> {
    let resources = tempdir()?;
    let settings = empty_settings(resources.path())?;

    obfuscator_cmd()
        .env("RUST_LOG", "warn")
        .arg("run")
        .arg(resources.path())
        .args(["--format", "480p"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Unknown screen format '480p'"));
    Ok(())
}
