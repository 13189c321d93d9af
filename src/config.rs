use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Smallest accepted surface edge in pixels
pub const MIN_SURFACE: u32 = 16;
/// Largest accepted surface edge in pixels
pub const MAX_SURFACE: u32 = 4096;

/// Errors raised while reading or writing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unknown profile '{0}' (expected compact or fit-height)")]
    UnknownProfile(String),
}

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Engine tunables
    pub settings: EngineSettings,
    /// Pixel size of the drawing surface
    pub surface_width: u32,
    pub surface_height: u32,
    /// Delay between animation frames (host-level)
    pub frame_millis: u64,
    /// Stroke the boundary outline after every reset (host-level)
    pub show_boundary: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: EngineSettings::default(),
            surface_width: 320,
            surface_height: 250,
            frame_millis: 16,
            show_boundary: false,
        }
    }
}

impl AppConfig {
    /// Per-user config location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-accretion").join("config.json"))
    }

    /// Pull the surface size back into `MIN_SURFACE..=MAX_SURFACE`
    pub fn clamp_surface(&mut self) {
        self.surface_width = self.surface_width.clamp(MIN_SURFACE, MAX_SURFACE);
        self.surface_height = self.surface_height.clamp(MIN_SURFACE, MAX_SURFACE);
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.clamp_surface();
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the per-user location; defaults when absent
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
