use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::preview::view_state::DEFAULT_VIEWPORT;
use crate::preview::ViewportSpec;
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Banner texts shown over the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageConfig {
    pub snapshot_title: String,
    pub pinned_title: String,
    pub missing_snapshot: String,
    pub tests_running: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            snapshot_title: "DOM Snapshot".into(),
            pinned_title: "DOM Snapshot (pinned)".into(),
            missing_snapshot: "The snapshot is missing. Displaying current state of the DOM."
                .into(),
            tests_running: "Cannot show Snapshot while tests are running".into(),
        }
    }
}

/// Preview configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Time each frame of a multi-frame request stays on screen
    pub cycle_interval: Duration,
    /// Viewport before the runner reports one
    pub default_viewport: ViewportSpec,
    pub messages: MessageConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(800),
            default_viewport: DEFAULT_VIEWPORT,
            messages: MessageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlPreviewSection {
    cycle_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlViewportSection {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlMessagesSection {
    snapshot_title: Option<String>,
    pinned_title: Option<String>,
    missing_snapshot: Option<String>,
    tests_running: Option<String>,
}

/// Root of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    preview: Option<TomlPreviewSection>,
    viewport: Option<TomlViewportSection>,
    messages: Option<TomlMessagesSection>,
}

impl PreviewConfig {
    /// Load configuration from the default location, merging with defaults.
    ///
    /// Writes the example config on first run. A file that fails to parse is
    /// logged and ignored.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
            return Self::default();
        }

        match Self::load_from(&config_file) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable config, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, failing on IO or parse errors.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(preview) = toml_config.preview {
            if let Some(ms) = preview.cycle_interval_ms {
                if ms == 0 {
                    return Err(ConfigError::Invalid(
                        "preview.cycle_interval_ms must be greater than zero".into(),
                    ));
                }
                config.cycle_interval = Duration::from_millis(ms);
            }
        }

        if let Some(viewport) = toml_config.viewport {
            if let Some(width) = viewport.width {
                config.default_viewport.width = width;
            }
            if let Some(height) = viewport.height {
                config.default_viewport.height = height;
            }
        }

        if let Some(messages) = toml_config.messages {
            if let Some(title) = messages.snapshot_title {
                config.messages.snapshot_title = title;
            }
            if let Some(title) = messages.pinned_title {
                config.messages.pinned_title = title;
            }
            if let Some(text) = messages.missing_snapshot {
                config.messages.missing_snapshot = text;
            }
            if let Some(text) = messages.tests_running {
                config.messages.tests_running = text;
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}
