//! Top-level orchestrator errors: anything that should abort startup.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Config(#[from] lumen_config::ConfigError),

    #[error("no default audio input device found")]
    NoInputDevice,

    #[error("audio device reported an unsupported input config: {0}")]
    UnsupportedInputConfig(String),

    #[error(transparent)]
    Artnet(#[from] lumen_artnet::ArtnetError),
}
