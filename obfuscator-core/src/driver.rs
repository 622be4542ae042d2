// ============================================================================
// obfuscator-core/src/driver.rs
// ============================================================================
//
// DRIVER LOOP: Capture, Detect, Switch
//
// Each tick captures a frame, evaluates it, feeds the signal to the scene
// controller and sends the resulting command (if any) to OBS. Ticks run back
// to back; the only intentional wait is the settle delay before switching
// back to the default scene.
//
// No error stops the loop. Capture errors turn the tick into a no-op and
// failed scene switches are logged without rolling the controller back.

// ---- Internal crate imports ----
use crate::controller::{SceneCommand, SceneController};
use crate::detection::{DetectionSignal, Detector};
use crate::error::CoreResult;
use crate::external::{FrameSource, Pause, SceneSwitcher};

// ---- External crate imports ----
use log::{debug, error, info, warn};

// ---- Standard library imports ----
use std::time::{Duration, Instant};

/// Scene names the controller's commands resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePair {
    /// Shown while nothing is detected.
    pub default_scene: String,
    /// Shown while a reference image is detected.
    pub target_scene: String,
}

impl ScenePair {
    pub fn new(default_scene: impl Into<String>, target_scene: impl Into<String>) -> Self {
        Self {
            default_scene: default_scene.into(),
            target_scene: target_scene.into(),
        }
    }

    pub fn resolve(&self, command: SceneCommand) -> &str {
        command.scene_name(&self.default_scene, &self.target_scene)
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Time from capture to the scene switch decision.
    pub elapsed: Duration,
    pub signal: DetectionSignal,
    pub command: Option<SceneCommand>,
    /// Whether the command was accepted by OBS. `false` when there was none.
    pub switched: bool,
}

impl TickReport {
    /// Elapsed seconds rounded to two decimals.
    pub fn elapsed_secs_rounded(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100.0).round() / 100.0
    }

    /// Source delay to configure in OBS so the switch lands in time, in ms.
    pub fn suggested_delay_ms(&self) -> u64 {
        (self.elapsed_secs_rounded() * 1000.0).round() as u64
    }
}

/// Runs detection ticks and forwards scene switches.
pub struct Driver<F, S, P>
where
    F: FrameSource,
    S: SceneSwitcher,
    P: Pause,
{
    frames: F,
    scenes: S,
    pause: P,
    detector: Detector,
    controller: SceneController,
    scene_pair: ScenePair,
}

impl<F, S, P> Driver<F, S, P>
where
    F: FrameSource,
    S: SceneSwitcher,
    P: Pause,
{
    pub fn new(
        frames: F,
        scenes: S,
        pause: P,
        detector: Detector,
        controller: SceneController,
        scene_pair: ScenePair,
    ) -> Self {
        Self {
            frames,
            scenes,
            pause,
            detector,
            controller,
            scene_pair,
        }
    }

    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub fn scenes(&self) -> &S {
        &self.scenes
    }

    pub fn pauser(&self) -> &P {
        &self.pause
    }

    /// Shows the default scene so OBS matches the controller's initial state.
    pub fn sync_initial_scene(&mut self) -> CoreResult<()> {
        let scene = &self.scene_pair.default_scene;
        debug!("Syncing OBS to default scene '{}'", scene);
        self.scenes.set_current_scene(scene)
    }

    /// Runs exactly one detection cycle.
    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();

        let frame = match self.frames.capture() {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                None
            }
        };

        let signal = match self.detector.evaluate(frame.as_ref()) {
            Ok(signal) => signal,
            Err(e) => {
                warn!("Detection failed: {}", e);
                DetectionSignal::NoFrame
            }
        };

        let command = self.controller.transition(signal);
        let mut elapsed = start.elapsed();
        let mut switched = false;

        if let Some(command) = command {
            let settle = command.settle_delay();
            if !settle.is_zero() {
                self.pause.pause(settle);
            }
            let result = self.scenes.set_current_scene(self.scene_pair.resolve(command));
            if matches!(command, SceneCommand::SwitchToTarget) {
                elapsed = start.elapsed();
            }
            switched = self.report_switch(command, result);
        }

        let report = TickReport {
            elapsed,
            signal,
            command,
            switched,
        };

        if report.command.is_some() {
            info!(
                "Tick took {:.2} seconds. Suggested OBS source delay: {}ms. Num good matches: {}",
                report.elapsed_secs_rounded(),
                report.suggested_delay_ms(),
                signal.good_matches().unwrap_or(0)
            );
        }

        report
    }

    fn report_switch(&self, command: SceneCommand, result: CoreResult<()>) -> bool {
        let scene = self.scene_pair.resolve(command);
        match result {
            Ok(()) => {
                debug!("Switched to scene '{}'", scene);
                true
            }
            Err(e) => {
                error!("Failed to switch to scene '{}': {}", scene, e);
                false
            }
        }
    }

    /// Runs `count` ticks and returns their reports.
    pub fn run_ticks(&mut self, count: usize) -> Vec<TickReport> {
        (0..count).map(|_| self.tick()).collect()
    }

    /// Syncs the initial scene and ticks until the process is terminated.
    pub fn run(&mut self) -> ! {
        if let Err(e) = self.sync_initial_scene() {
            warn!("Could not show the default scene at startup: {}", e);
        }
        info!(
            "Watching for {} reference image(s)",
            self.detector.references().len()
        );
        loop {
            self.tick();
        }
    }
}
