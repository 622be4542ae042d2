//! Monitor capture through `xcap`.
//!
//! Monitors are numbered from 1 in enumeration order, so `--monitor 1` is
//! the first monitor the platform reports.

use super::FrameSource;
use crate::detection::Frame;
use crate::error::{CoreError, CoreResult};

use log::debug;
use xcap::Monitor;

/// Description of one attached monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// 1-based index accepted by [`MonitorCapture::new`].
    pub index: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Lists the attached monitors.
pub fn list_monitors() -> CoreResult<Vec<MonitorInfo>> {
    let monitors = Monitor::all()?;
    Ok(monitors
        .iter()
        .enumerate()
        .map(|(i, m)| MonitorInfo {
            index: i + 1,
            name: m.name().to_string(),
            x: m.x(),
            y: m.y(),
            width: m.width(),
            height: m.height(),
            is_primary: m.is_primary(),
        })
        .collect())
}

/// Captures full frames of one monitor.
pub struct MonitorCapture {
    index: usize,
    monitor: Monitor,
}

impl std::fmt::Debug for MonitorCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorCapture")
            .field("index", &self.index)
            .field("name", &self.monitor.name())
            .finish()
    }
}

impl MonitorCapture {
    /// Opens monitor `index`, counted from 1.
    ///
    /// Index 0 and indices past the last monitor are configuration errors.
    pub fn new(index: usize) -> CoreResult<Self> {
        if index == 0 {
            return Err(CoreError::Configuration(
                "Monitor index must be 1 or greater".to_string(),
            ));
        }
        let mut monitors = Monitor::all()?;
        let count = monitors.len();
        if index > count {
            return Err(CoreError::Configuration(format!(
                "Monitor {} does not exist ({} monitor(s) attached)",
                index, count
            )));
        }
        let monitor = monitors.swap_remove(index - 1);
        debug!(
            "Capturing monitor {} ({}, {}x{})",
            index,
            monitor.name(),
            monitor.width(),
            monitor.height()
        );
        Ok(Self { index, monitor })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Capture size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.monitor.width(), self.monitor.height())
    }
}

impl FrameSource for MonitorCapture {
    fn capture(&mut self) -> CoreResult<Frame> {
        Ok(self.monitor.capture_image()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_zero_is_rejected_before_enumeration() {
        match MonitorCapture::new(0) {
            Err(CoreError::Configuration(msg)) => assert!(msg.contains("1 or greater")),
            other => panic!("expected configuration error, got {:?}", other.map(|c| c.index())),
        }
    }
}
