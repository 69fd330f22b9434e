//! # Lumen
//!
//! The Engine Orchestrator (C11): parses CLI arguments, loads configuration,
//! and spawns the four worker threads described in the specification's
//! concurrency model (`T-audio`, `T-scheduler`, `T-dmx-refresh`, and the
//! optional `T-net-rx`).

pub mod capture;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod net_monitor;

use cli::Cli;
use command::{apply_kick_flash_command, EngineHandle, KickFlashCommand, PipelineCommand};
use error::Result;
use lumen_artnet::{ArtnetSender, DmxFrameBuffer};
use lumen_core::spsc::SpscRingBuffer;
use lumen_dsp::{AnalysisConfig, DetectorEvent};
use lumen_scheduler::{EventBridge, Scheduler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const EVENT_CHANNEL_CAPACITY: usize = 256;
const COMMAND_CHANNEL_CAPACITY: usize = 32;
const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// The join handles for every thread `spawn` started.
pub struct EngineThreads {
    audio: std::thread::JoinHandle<()>,
    scheduler: std::thread::JoinHandle<()>,
    dmx: std::thread::JoinHandle<()>,
    monitor: Option<std::thread::JoinHandle<()>>,
}

impl EngineThreads {
    /// Block until every thread stops (or its 1s join timeout elapses).
    pub fn join(self) {
        join_with_timeout("T-audio", self.audio);
        join_with_timeout("T-scheduler", self.scheduler);
        join_with_timeout("T-dmx-refresh", self.dmx);
        if let Some(handle) = self.monitor {
            join_with_timeout("T-net-rx", handle);
        }
    }
}

/// Load configuration, spawn every worker thread, and return immediately
/// with a live [`EngineHandle`] (for programmatic control, §6) and the
/// thread handles (for an eventual shutdown join). Does not block.
pub fn spawn(cli: Cli) -> Result<(EngineHandle, EngineThreads)> {
    let config = config::load(&cli)?;
    let fixtures = Arc::new(config.fixtures);
    let scenes = Arc::new(config.scenes);
    let sequences = Arc::new(config.sequences);

    let buffer = DmxFrameBuffer::new();
    let sender = ArtnetSender::new(cli.target_ip, cli.universe)?;
    let running = Arc::new(AtomicBool::new(true));

    let (event_producer, mut event_consumer) = SpscRingBuffer::new::<DetectorEvent>(EVENT_CHANNEL_CAPACITY);
    let (pipeline_commands_tx, pipeline_commands_rx) = SpscRingBuffer::new::<PipelineCommand>(COMMAND_CHANNEL_CAPACITY);
    let (kick_flash_commands_tx, mut kick_flash_commands_rx) = SpscRingBuffer::new::<KickFlashCommand>(COMMAND_CHANNEL_CAPACITY);

    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            log::info!("shutdown requested");
            running.store(false, Ordering::Relaxed);
        })
        .expect("failed to install Ctrl-C handler");
    }

    let audio = {
        let running = Arc::clone(&running);
        let analysis_config = AnalysisConfig::new(cli.chunk_len, 48_000.0);
        std::thread::spawn(move || {
            if let Err(err) = capture::run_audio_thread(analysis_config, event_producer, pipeline_commands_rx, running) {
                log::error!("T-audio exited: {err}");
            }
        })
    };

    let scheduler = {
        let buffer = buffer.clone();
        let running = Arc::clone(&running);
        let fixtures = Arc::clone(&fixtures);
        let scenes = Arc::clone(&scenes);
        let sequences = Arc::clone(&sequences);
        let kick_flash = config.kick_flash;
        let tick_ms = cli.tick_ms;
        std::thread::spawn(move || {
            let mut scheduler = Scheduler::new(buffer, fixtures.clone(), scenes, sequences.clone());
            let mut bridge = EventBridge::new(fixtures, sequences, kick_flash, 0x5EED);
            let period = Duration::from_millis(tick_ms);

            while running.load(Ordering::Relaxed) {
                let now = Instant::now();
                while let Some(command) = kick_flash_commands_rx.try_pop() {
                    apply_kick_flash_command(&mut bridge, command);
                }
                while let Some(event) = event_consumer.try_pop() {
                    bridge.dispatch(event, &mut scheduler, now);
                }
                scheduler.tick(now);
                std::thread::sleep(period);
            }
        })
    };

    let dmx = {
        let buffer = buffer.clone();
        let running = Arc::clone(&running);
        let refresh_hz = cli.refresh_hz;
        std::thread::spawn(move || {
            lumen_artnet::dmx::run_refresh_loop(buffer, sender, refresh_hz, running);
        })
    };

    let monitor = cli.monitor.then(|| {
        let running = Arc::clone(&running);
        std::thread::spawn(move || net_monitor::run(running))
    });

    let handle = EngineHandle::new(pipeline_commands_tx, kick_flash_commands_tx, Arc::clone(&running));
    Ok((handle, EngineThreads { audio, scheduler, dmx, monitor }))
}

/// Run the engine until a shutdown signal is observed. Returns once every
/// thread has stopped (or the join timeout elapsed, in which case the
/// straggler is logged, not panicked on). The CLI binary's entry point.
pub fn run(cli: Cli) -> Result<()> {
    let (_handle, threads) = spawn(cli)?;
    threads.join();
    Ok(())
}

fn join_with_timeout(name: &str, handle: std::thread::JoinHandle<()>) {
    let deadline = Instant::now() + SHUTDOWN_JOIN_TIMEOUT;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("{name} did not shut down within {SHUTDOWN_JOIN_TIMEOUT:?}; abandoning its handle");
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    if let Err(err) = handle.join() {
        log::warn!("{name} panicked: {err:?}");
    }
}
