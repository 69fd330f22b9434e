//! Error types for the audio analysis pipeline.

use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// All of these are recoverable: a [`DspError`] never stops the audio thread,
/// it is logged and the pipeline degrades (pass-through filter, zeroed band
/// levels) so a bad input chunk never silences the whole analyzer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DspError {
    #[error("chunk length {0} is not supported by the configured FFT size {1}")]
    ChunkLengthMismatch(usize, usize),

    #[error("failed to construct analysis filter: {0}")]
    FilterConstruction(String),

    #[error("invalid analyzer parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, DspError>;
