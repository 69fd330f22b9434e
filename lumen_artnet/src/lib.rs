//! # Lumen Art-Net
//!
//! Art-Net (DMX512-over-UDP) wire codec and frame buffer.
//!
//! - [`codec`]: byte-exact `OpDmx` frame encode/decode (C1).
//! - [`dmx`]: the thread-safe 512-byte universe plus its refresh pump (C2).
//!
//! ## Example
//!
//! ```rust,no_run
//! use lumen_artnet::{ArtnetSender, DmxFrameBuffer};
//! use std::net::IpAddr;
//!
//! let buffer = DmxFrameBuffer::new();
//! buffer.apply_fixture(0, [255, 0, 0, 0], true);
//!
//! let sender = ArtnetSender::new("127.0.0.1".parse::<IpAddr>().unwrap(), 0).unwrap();
//! sender.send(&buffer.snapshot()).unwrap();
//! ```

pub mod codec;
pub mod dmx;
pub mod error;

pub use codec::{decode, encode, to_universe_array, ArtnetSender, ARTNET_PORT, DMX_UNIVERSE_SIZE};
pub use dmx::{run_refresh_loop, DmxFrameBuffer};
pub use error::{ArtnetError, Result};
