// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process configuration.
//!
//! Settings are an explicit value loaded at startup and threaded through the
//! command handlers; nothing reads configuration from globals. The file
//! lives next to the vault as RON with a format version.

use archnet_canvas::LayoutConfig;
use archnet_engine::{HttpEngineConfig, LocalEngineConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version.
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Default settings file name.
pub const SETTINGS_FILE_NAME: &str = "archnet.ron";

/// Which completion engine binding to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineSettings {
    /// Remote HTTP completion API.
    Http(HttpEngineConfig),
    /// Locally spawned inference process.
    Local(LocalEngineConfig),
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::Http(HttpEngineConfig::default())
    }
}

/// Grid placement settings for file cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// X coordinate of the first card's top-left corner.
    pub x: i64,
    /// Y coordinate of the first card's top-left corner.
    pub y: i64,
    /// Card width in pixels.
    pub width: i64,
    /// Card height in pixels.
    pub height: i64,
    /// Margin between cards, horizontal and vertical.
    pub margin: i64,
    /// Cards per grid row.
    pub columns: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 400,
            height: 500,
            margin: 50,
            columns: 4,
        }
    }
}

/// Complete settings for the command binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Settings format version.
    pub version: u32,
    /// Spacing and sizing for generated cards.
    pub layout: LayoutConfig,
    /// Grid placement for file cards.
    pub grid: GridSettings,
    /// Completions requested per expansion.
    pub completions: usize,
    /// Completion engine binding.
    pub engine: EngineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            layout: LayoutConfig::default(),
            grid: GridSettings::default(),
            completions: 1,
            engine: EngineSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> std::io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        Ok(settings)
    }

    /// Save settings to a file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(path, content)
    }
}
