//! Error types for loading and validating fixture/scene/sequence/kick-flash
//! configuration (C10, §7 "Configuration error").

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("malformed JSON in {path:?}: {source}")]
    Parse { path: PathBuf, #[source] source: serde_json::Error },

    #[error("fixture {name:?} channel index {index} is out of range [0, 511]")]
    ChannelOutOfRange { name: String, index: i64 },

    #[error("fixtures {a:?} and {b:?} both address DMX channel {channel}")]
    OverlappingFixtures { a: String, b: String, channel: usize },

    #[error("scene {name:?} has type \"flash\" but no decay time")]
    FlashSceneMissingDecay { name: String },

    #[error("sequence {sequence:?} references unknown scene {scene:?}")]
    UnknownSceneReference { sequence: String, scene: String },

    #[error("unknown band name in {context}: {source}")]
    UnknownBand { context: String, #[source] source: lumen_core::UnknownBand },
}
