//! Game settings and preferences
//!
//! Persisted separately from progression as a small JSON file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{TICK_RATE_HZ, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::PersistenceError;
use crate::level::LayoutOptions;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Ticks per second
    pub tick_rate_hz: u32,
    /// Viewport size in world units
    pub viewport_width: i32,
    pub viewport_height: i32,

    // === Files ===
    /// Directory holding the level text files
    pub levels_dir: PathBuf,
    /// Progression save file
    pub save_path: PathBuf,

    // === Audio ===
    pub sound_enabled: bool,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Coin pickup cue volume (0.0 - 1.0)
    pub cue_volume: f32,

    // === Cheats ===
    /// Fill every empty cell with a coin
    pub coin_rain: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            levels_dir: PathBuf::from("levels"),
            save_path: PathBuf::from("progress.json"),

            sound_enabled: true,
            music_volume: 0.05,
            cue_volume: 0.2,

            coin_rain: false,
        }
    }
}

impl Settings {
    /// Music volume after the sound switch
    pub fn effective_music_volume(&self) -> f32 {
        if self.sound_enabled {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Cue volume after the sound switch
    pub fn effective_cue_volume(&self) -> f32 {
        if self.sound_enabled {
            self.cue_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Wall-clock length of one tick
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            coin_rain: self.coin_rain,
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring unreadable settings {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not read settings {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| PersistenceError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
