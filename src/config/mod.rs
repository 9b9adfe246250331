use crate::tui::styles::{BoxStyle, Theme};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the event loop waits for input before ticking
    pub tick_rate_ms: u64,

    /// Capture mouse clicks
    pub mouse_enabled: bool,

    /// Border of main windows
    pub window_box_style: BoxStyle,

    /// Border of modal dialogs
    pub dialog_box_style: BoxStyle,

    /// Where to write logs while the terminal is in use
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: true,
            window_box_style: BoxStyle::Single,
            dialog_box_style: BoxStyle::Double,
            log_file: None,
        }
    }
}

impl Config {
    /// Initialize configuration from the first config file found, then the environment
    pub fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Configuration files in priority order:
    /// 1. ./.textui.json
    /// 2. ./textui.json
    /// 3. $CONFIG_DIR/textui/config.json
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./.textui.json"), PathBuf::from("./textui.json")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("textui").join("config.json"));
        }
        paths
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Load a JSON config file; missing fields keep their defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(tick) = std::env::var("TEXTUI_TICK_MS") {
            if let Ok(tick) = tick.parse() {
                self.tick_rate_ms = tick;
            }
        }

        if let Ok(mouse) = std::env::var("TEXTUI_MOUSE") {
            self.mouse_enabled = matches!(mouse.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(log_file) = std::env::var("TEXTUI_LOG_FILE") {
            self.log_file = Some(PathBuf::from(log_file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.tick_rate_ms) {
            return Err(anyhow::anyhow!(
                "tick_rate_ms must be between 1 and 1000, got {}",
                self.tick_rate_ms
            ));
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn theme(&self) -> Theme {
        Theme::default().with_box_styles(self.window_box_style, self.dialog_box_style)
    }
}
