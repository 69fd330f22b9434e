//! # Lumen Config
//!
//! Loading and validation for the lighting rig's on-disk JSON records:
//! fixture descriptors, scene definitions, sequences, and persisted
//! kick-flash state (C3, C4, C10).
//!
//! Every loader accepts either snake_case or camelCase keys and rejects
//! malformed or structurally invalid input at load time rather than
//! silently defaulting; only a missing *file* falls back to a small
//! built-in catalog.

pub mod error;
pub mod fixtures;
pub mod kick_flash;
pub mod scenes;
pub mod sequences;

pub use error::{ConfigError, Result};
pub use fixtures::{ChannelOffsets, Fixture, FixtureRegistry};
pub use kick_flash::{FlashMode, KickFlashConfig};
pub use scenes::{Channels, Scene, SceneCatalog};
pub use sequences::{Sequence, SequenceCatalog, Step};
