//! Persisted kick-flash configuration (part of C9's Event Bridge): which
//! scene(s) a kick fires, and in what rotation.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// How successive kicks pick among multiple configured flash scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    Single,
    Alternate,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickFlashConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub mode: FlashMode,
    pub scenes: Vec<String>,
    #[serde(default)]
    alternate_index: usize,
}

fn default_true() -> bool {
    true
}

fn default_intensity() -> f32 {
    1.0
}

impl Default for FlashMode {
    fn default() -> Self {
        FlashMode::Single
    }
}

impl KickFlashConfig {
    /// Build a fresh configuration with the rotation index reset to zero,
    /// for callers (e.g. `configure_kick_flash`) replacing the whole config
    /// rather than loading it from disk.
    pub fn new(enabled: bool, intensity: f32, mode: FlashMode, scenes: Vec<String>) -> Self {
        Self { enabled, intensity, mode, scenes, alternate_index: 0 }
    }

    pub fn load(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse { path: "kick_flash.json".into(), source })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse { path: "kick_flash.json".into(), source })
    }

    /// The scene name to fire for the next kick, advancing internal rotation
    /// state for `Alternate` mode. `rand_index` selects among `scenes` for
    /// `Random` mode and is supplied by the caller so this stays deterministic
    /// and testable.
    pub fn next_flash_scene(&mut self, rand_index: usize) -> Option<&str> {
        if !self.enabled || self.scenes.is_empty() {
            return None;
        }
        let idx = match self.mode {
            FlashMode::Single => 0,
            FlashMode::Alternate => {
                let idx = self.alternate_index % self.scenes.len();
                self.alternate_index = self.alternate_index.wrapping_add(1);
                idx
            }
            FlashMode::Random => rand_index % self.scenes.len(),
        };
        Some(self.scenes[idx].as_str())
    }

    pub fn default_config() -> Self {
        Self { enabled: true, intensity: 1.0, mode: FlashMode::Single, scenes: vec!["white_flash".to_string()], alternate_index: 0 }
    }
}
