//! # Lumen Core
//!
//! Foundational, allocation-free mechanisms shared by the analysis and
//! scheduling crates: a lock-free SPSC ring buffer for the detector-to-scheduler
//! event channel, a stack-allocated vector for draining it without allocating,
//! denormal flushing for the hot DSP path, and a small PRNG for the `random`
//! kick-flash scene mode.

pub mod band;
pub mod denormal;
pub mod random;
pub mod spsc;
pub mod stack_vec;

pub use band::{Band, UnknownBand};
pub use denormal::{flush_denormal_f32, flush_denormal_f64, flush_denormals_f32_batch, flush_denormals_f64_batch};
pub use random::XorShiftRng;
pub use spsc::{Consumer, Producer, SpscRingBuffer};
pub use stack_vec::StackVec;
