// ============================================================================
// obfuscator-core/src/controller.rs
// ============================================================================
//
// SCENE CONTROLLER: Two-State Scene Selection
//
// Turns the per-tick detection signal into scene switch commands. A command
// is emitted only when the state actually changes, so repeated detections
// never re-send the same scene:
//
//   ShowingDefaultScene --Present--> ShowingTargetScene  (SwitchToTarget)
//   ShowingTargetScene  --Absent-->  ShowingDefaultScene (SwitchToDefault)
//
// Every other combination, and NoFrame in any state, emits nothing.

use crate::detection::DetectionSignal;

use std::time::Duration;

/// Scene currently selected by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    #[default]
    ShowingDefaultScene,
    ShowingTargetScene,
}

/// Scene switch requested by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    SwitchToTarget,
    /// Switch back after waiting `settle`.
    SwitchToDefault { settle: Duration },
}

impl SceneCommand {
    /// Pause the driver takes before sending this command.
    pub fn settle_delay(&self) -> Duration {
        match self {
            SceneCommand::SwitchToTarget => Duration::ZERO,
            SceneCommand::SwitchToDefault { settle } => *settle,
        }
    }

    /// Scene this command switches to, from a `(default, target)` pair.
    pub fn scene_name<'a>(&self, default_scene: &'a str, target_scene: &'a str) -> &'a str {
        match self {
            SceneCommand::SwitchToTarget => target_scene,
            SceneCommand::SwitchToDefault { .. } => default_scene,
        }
    }
}

/// Hysteresis state machine owning the current scene state.
#[derive(Debug, Clone)]
pub struct SceneController {
    state: SceneState,
    settle_delay: Duration,
}

impl SceneController {
    /// Starts in [`SceneState::ShowingDefaultScene`].
    pub fn new(settle_delay: Duration) -> Self {
        Self::with_state(SceneState::default(), settle_delay)
    }

    pub fn with_state(state: SceneState, settle_delay: Duration) -> Self {
        Self { state, settle_delay }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Applies one tick's signal. Returns a command only on a state change.
    pub fn transition(&mut self, signal: DetectionSignal) -> Option<SceneCommand> {
        match (self.state, signal) {
            (SceneState::ShowingDefaultScene, DetectionSignal::Present { .. }) => {
                self.state = SceneState::ShowingTargetScene;
                Some(SceneCommand::SwitchToTarget)
            }
            (SceneState::ShowingTargetScene, DetectionSignal::Absent { .. }) => {
                self.state = SceneState::ShowingDefaultScene;
                Some(SceneCommand::SwitchToDefault {
                    settle: self.settle_delay,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(100);

    fn present() -> DetectionSignal {
        DetectionSignal::Present { good_matches: 30 }
    }

    fn absent() -> DetectionSignal {
        DetectionSignal::Absent { good_matches: 3 }
    }

    #[test]
    fn test_starts_in_default_scene() {
        assert_eq!(SceneController::new(SETTLE).state(), SceneState::ShowingDefaultScene);
    }

    #[test]
    fn test_absent_absent_present_present_absent() {
        let mut controller = SceneController::new(SETTLE);
        let commands: Vec<SceneCommand> = [absent(), absent(), present(), present(), absent()]
            .into_iter()
            .filter_map(|s| controller.transition(s))
            .collect();

        assert_eq!(
            commands,
            vec![
                SceneCommand::SwitchToTarget,
                SceneCommand::SwitchToDefault { settle: SETTLE },
            ]
        );
        assert_eq!(controller.state(), SceneState::ShowingDefaultScene);
    }

    #[test]
    fn test_present_twice_in_target_emits_nothing() {
        let mut controller = SceneController::with_state(SceneState::ShowingTargetScene, SETTLE);
        assert_eq!(controller.transition(present()), None);
        assert_eq!(controller.transition(present()), None);
        assert_eq!(controller.state(), SceneState::ShowingTargetScene);
    }

    #[test]
    fn test_no_frame_never_transitions() {
        for state in [SceneState::ShowingDefaultScene, SceneState::ShowingTargetScene] {
            let mut controller = SceneController::with_state(state, SETTLE);
            assert_eq!(controller.transition(DetectionSignal::NoFrame), None);
            assert_eq!(controller.state(), state);
        }
    }

    #[test]
    fn test_commands_always_alternate() {
        let mut controller = SceneController::new(SETTLE);
        let signals = [
            present(),
            DetectionSignal::NoFrame,
            absent(),
            absent(),
            present(),
            present(),
            DetectionSignal::NoFrame,
            present(),
            absent(),
            present(),
        ];
        let commands: Vec<SceneCommand> = signals
            .into_iter()
            .filter_map(|s| controller.transition(s))
            .collect();

        assert_eq!(commands.len(), 5);
        for pair in commands.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(commands[0], SceneCommand::SwitchToTarget);
    }

    #[test]
    fn test_command_accessors() {
        let back = SceneCommand::SwitchToDefault { settle: SETTLE };
        assert_eq!(back.settle_delay(), SETTLE);
        assert_eq!(SceneCommand::SwitchToTarget.settle_delay(), Duration::ZERO);
        assert_eq!(back.scene_name("Gaming", "Covered"), "Gaming");
        assert_eq!(SceneCommand::SwitchToTarget.scene_name("Gaming", "Covered"), "Covered");
    }
}
