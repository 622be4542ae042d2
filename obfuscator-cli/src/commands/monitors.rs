//! `monitors`: lists the monitors `run --monitor` accepts.

use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use obfuscator_core::external::{list_monitors, MonitorInfo};

/// One line per monitor, e.g. `1: DP-1 2560x1440 at (0, 0) [primary]`.
pub fn describe_monitor(monitor: &MonitorInfo) -> String {
    format!(
        "{}: {} {}x{} at ({}, {}){}",
        monitor.index,
        monitor.name,
        monitor.width,
        monitor.height,
        monitor.x,
        monitor.y,
        if monitor.is_primary { " [primary]" } else { "" }
    )
}

pub fn run_monitors() -> CliResult<()> {
    let monitors = list_monitors().cli_context("Failed to enumerate monitors")?;

    terminal::print_section("Monitors");
    if monitors.is_empty() {
        terminal::print_warning("No monitors found");
    }
    for monitor in &monitors {
        terminal::print_item(&describe_monitor(monitor));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_primary_monitor() {
        let monitor = MonitorInfo {
            index: 1,
            name: "DP-1".to_string(),
            x: 0,
            y: 0,
            width: 2560,
            height: 1440,
            is_primary: true,
        };
        assert_eq!(describe_monitor(&monitor), "1: DP-1 2560x1440 at (0, 0) [primary]");
    }
}
