//! Command-line surface for the Engine Orchestrator (C11).

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lumen", about = "Real-time audio-reactive Art-Net lighting controller")]
pub struct Cli {
    /// Art-Net target IP (the universe is also duplicated to loopback).
    #[arg(long, default_value = "127.0.0.1")]
    pub target_ip: IpAddr,

    /// DMX universe number (low byte of the Art-Net universe word).
    #[arg(long, default_value_t = 0)]
    pub universe: u8,

    /// DMX refresh rate in Hz, 10-60.
    #[arg(long, default_value_t = 30)]
    pub refresh_hz: u32,

    /// Scheduler tick interval in milliseconds, 5-40.
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    #[arg(long, default_value = "./fixtures.json")]
    pub fixtures: PathBuf,

    #[arg(long, default_value = "./scenes.json")]
    pub scenes: PathBuf,

    #[arg(long, default_value = "./sequences.json")]
    pub sequences: PathBuf,

    #[arg(long, default_value = "./kick_flash.json")]
    pub kick_flash: PathBuf,

    /// Chunk length (frames) fed to the band analyzer each pass.
    #[arg(long, default_value_t = 1024)]
    pub chunk_len: usize,

    /// Enable T-net-rx: a read-only monitor that logs received Art-Net frames.
    #[arg(long)]
    pub monitor: bool,
}
