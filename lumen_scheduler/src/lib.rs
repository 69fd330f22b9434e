//! # Lumen Scheduler
//!
//! The Lighting Scheduler (C5) and the Event Bridge (C9) that feeds it:
//! owns per-band sequence playback and per-fixture flash state, arbitrates
//! between them on every tick, and translates [`lumen_dsp::DetectorEvent`]s
//! into scheduler operations.

mod bridge;
mod error;
mod flash;
mod intensity;
mod scheduler;
mod state;

pub use bridge::EventBridge;
pub use error::{Result, SchedulerError};
pub use flash::FlashRecord;
pub use scheduler::Scheduler;
pub use state::BandSchedulerState;
