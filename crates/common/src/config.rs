//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VaceError, VaceResult};

/// Largest splice offset the host accepts. Bounds the number of grey fill
/// frames a single splice can synthesize.
pub const MAX_FRAME_OFFSET: usize = 2000;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where edited sequences are written when no output is given.
    pub output_dir: PathBuf,

    /// Default editing parameters.
    #[serde(default)]
    pub editing: EditingDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default editing parameters applied by front-ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingDefaults {
    /// Mask value written at inserted keyframe positions.
    pub keyframe_mask_value: f32,

    /// Upper bound accepted for `frame_offset` when splicing.
    pub max_frame_offset: usize,

    /// Grey level (0-255) used for splice gap frames and clip-doctor grey painting.
    pub gap_grey_level: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vace=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("vace-out"),
            editing: EditingDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditingDefaults {
    fn default() -> Self {
        Self {
            keyframe_mask_value: 0.0,
            max_frame_offset: MAX_FRAME_OFFSET,
            gap_grey_level: 127,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl EditingDefaults {
    /// Reject values the host contract does not allow.
    pub fn validate(&self) -> VaceResult<()> {
        if !(0.0..=1.0).contains(&self.keyframe_mask_value) {
            return Err(VaceError::config(format!(
                "keyframe_mask_value ({}) must be within 0.0-1.0",
                self.keyframe_mask_value
            )));
        }
        if self.max_frame_offset > MAX_FRAME_OFFSET {
            return Err(VaceError::config(format!(
                "max_frame_offset ({}) exceeds the hard cap of {MAX_FRAME_OFFSET}",
                self.max_frame_offset
            )));
        }
        Ok(())
    }

    /// Grey level normalized to `[0.0, 1.0]`.
    pub fn gap_grey_value(&self) -> f32 {
        self.gap_grey_level as f32 / 255.0
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Read and validate a config file.
    pub fn load_from(path: &Path) -> VaceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.editing.validate()?;
        Ok(config)
    }

    /// Save config to the standard location and return where it went.
    pub fn save(&self) -> VaceResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Write config as pretty-printed JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> VaceResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vace").join("config.json")
}
