//! Builder for [`CoreConfig`].
//!
//! Every field starts at its built-in default; setters override one value at
//! a time. This is the lowest layer of the configuration precedence chain.

use super::*;

/// Builder for creating [`CoreConfig`] instances.
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a builder populated with the built-in defaults.
    pub fn new() -> Self {
        Self {
            config: CoreConfig {
                resource_dir: PathBuf::from("."),
                profile: ResolutionProfile::P1080,
                monitor: DEFAULT_MONITOR,
                features: DEFAULT_FEATURES,
                required_good_matches: DEFAULT_REQUIRED_GOOD_MATCHES,
                default_scene: DEFAULT_SCENE_OFF.to_string(),
                target_scene: DEFAULT_SCENE_ON.to_string(),
                settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                show_debug_window: false,
                debug_dir: None,
            },
        }
    }

    pub fn resource_dir(mut self, dir: PathBuf) -> Self {
        self.config.resource_dir = dir;
        self
    }

    pub fn profile(mut self, profile: ResolutionProfile) -> Self {
        self.config.profile = profile;
        self
    }

    pub fn monitor(mut self, monitor: usize) -> Self {
        self.config.monitor = monitor;
        self
    }

    pub fn features(mut self, features: usize) -> Self {
        self.config.features = features;
        self
    }

    pub fn required_good_matches(mut self, matches: usize) -> Self {
        self.config.required_good_matches = matches;
        self
    }

    pub fn default_scene<S: Into<String>>(mut self, scene: S) -> Self {
        self.config.default_scene = scene.into();
        self
    }

    pub fn target_scene<S: Into<String>>(mut self, scene: S) -> Self {
        self.config.target_scene = scene.into();
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn show_debug_window(mut self, enabled: bool) -> Self {
        self.config.show_debug_window = enabled;
        self
    }

    pub fn debug_dir(mut self, dir: PathBuf) -> Self {
        self.config.debug_dir = Some(dir);
        self
    }

    pub fn build(self) -> CoreConfig {
        self.config
    }
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfigBuilder::new().build();

        assert_eq!(config.monitor, 1);
        assert_eq!(config.features, 500);
        assert_eq!(config.required_good_matches, 20);
        assert_eq!(config.port, 4444);
        assert_eq!(config.default_scene, "Live Gaming");
        assert_eq!(config.target_scene, "Live Gaming (Map Covered)");
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert!(!config.show_debug_window);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .resource_dir(PathBuf::from("/res"))
            .profile(ResolutionProfile::P2160)
            .monitor(2)
            .features(800)
            .required_good_matches(12)
            .default_scene("Desk")
            .target_scene("Blurred")
            .settle_delay(Duration::ZERO)
            .host("10.0.0.5")
            .port(4455)
            .show_debug_window(true)
            .debug_dir(PathBuf::from("/tmp/dbg"))
            .build();

        assert_eq!(config.resource_dir, PathBuf::from("/res"));
        assert_eq!(config.profile, ResolutionProfile::P2160);
        assert_eq!(config.monitor, 2);
        assert_eq!(config.features, 800);
        assert_eq!(config.required_good_matches, 12);
        assert_eq!(config.default_scene, "Desk");
        assert_eq!(config.target_scene, "Blurred");
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.websocket_url(), "ws://10.0.0.5:4455");
        assert!(config.show_debug_window);
        assert_eq!(config.effective_debug_dir(), PathBuf::from("/tmp/dbg"));
    }
}
