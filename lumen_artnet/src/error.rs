//! Error types for Art-Net encoding and transport.

use std::fmt;

/// Error codes for Art-Net operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtnetError {
    /// The DMX data slice did not contain exactly 512 bytes.
    InvalidDataLength,
    /// The underlying UDP socket failed to bind or send.
    IoError,
}

impl fmt::Display for ArtnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtnetError::InvalidDataLength => write!(f, "DMX data must be exactly 512 bytes"),
            ArtnetError::IoError => write!(f, "Art-Net socket I/O error"),
        }
    }
}

impl std::error::Error for ArtnetError {}

impl From<std::io::Error> for ArtnetError {
    fn from(_: std::io::Error) -> Self {
        ArtnetError::IoError
    }
}

/// Result type alias for lumen_artnet operations.
pub type Result<T> = std::result::Result<T, ArtnetError>;
