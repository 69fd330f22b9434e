//! The programmatic command surface of §6: plain methods an embedding
//! caller uses to steer a running engine (never a network RPC — see
//! SPEC_FULL.md's Non-goals). Threshold and kick-flash commands are queued
//! to the threads that own the relevant state; monitor selection has no
//! owning thread of its own, so it is just shared, queryable state.

use lumen_config::{FlashMode, KickFlashConfig};
use lumen_core::spsc::Producer;
use lumen_core::Band;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Commands consumed by `T-audio`: adjust per-band detector thresholds.
#[derive(Debug, Clone, Copy)]
pub enum PipelineCommand {
    SetThreshold { band: Band, value: f32 },
    SetAutoThreshold { band: Band, auto: bool },
    AdjustKickSensitivity { sensitivity: f32 },
}

/// Commands consumed by `T-scheduler`: replace the kick-flash rotation.
#[derive(Debug, Clone)]
pub struct KickFlashCommand {
    pub scenes: Vec<String>,
    pub mode: FlashMode,
    pub intensity: f32,
    pub enabled: bool,
}

impl KickFlashCommand {
    fn into_config(self) -> KickFlashConfig {
        KickFlashConfig::new(self.enabled, self.intensity, self.mode, self.scenes)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MonitorState {
    band: Option<Band>,
    volume: f32,
}

/// A live handle to a running engine. Cloning shares the same underlying
/// engine; every clone can issue commands and flip the shutdown flag.
#[derive(Clone)]
pub struct EngineHandle {
    pipeline_commands: Arc<Mutex<Producer<PipelineCommand>>>,
    kick_flash_commands: Arc<Mutex<Producer<KickFlashCommand>>>,
    monitor: Arc<Mutex<MonitorState>>,
    running: Arc<AtomicBool>,
}

impl EngineHandle {
    pub(crate) fn new(
        pipeline_commands: Producer<PipelineCommand>,
        kick_flash_commands: Producer<KickFlashCommand>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            pipeline_commands: Arc::new(Mutex::new(pipeline_commands)),
            kick_flash_commands: Arc::new(Mutex::new(kick_flash_commands)),
            monitor: Arc::new(Mutex::new(MonitorState::default())),
            running,
        }
    }

    pub fn set_threshold(&self, band: Band, value: f32) {
        self.send_pipeline(PipelineCommand::SetThreshold { band, value });
    }

    pub fn set_auto_threshold(&self, band: Band, auto: bool) {
        self.send_pipeline(PipelineCommand::SetAutoThreshold { band, auto });
    }

    pub fn adjust_kick_sensitivity(&self, sensitivity: f32) {
        self.send_pipeline(PipelineCommand::AdjustKickSensitivity { sensitivity });
    }

    /// Replace the kick-flash scene rotation. Validation of the scene names
    /// themselves happens at scheduler dispatch time, the same as any other
    /// scene lookup (§7's "Flash / sequence name not found" policy).
    pub fn configure_kick_flash(&self, scenes: Vec<String>, mode: FlashMode, intensity: f32, enabled: bool) {
        let mut producer = self.kick_flash_commands.lock().expect("kick-flash command queue poisoned");
        if producer.try_push(KickFlashCommand { scenes, mode, intensity, enabled }).is_err() {
            log::warn!("kick-flash command queue full, dropping configure_kick_flash request");
        }
    }

    /// Selects which band's analysis the embedding caller wishes to preview;
    /// this engine has no audio-output component (§2's component list has no
    /// monitor-playback stage), so this is stored state an embedder can read
    /// back, not a live audio patch.
    pub fn set_monitor_band(&self, band: Option<Band>) {
        self.monitor.lock().expect("monitor state poisoned").band = band;
    }

    pub fn set_monitor_volume(&self, volume: f32) {
        self.monitor.lock().expect("monitor state poisoned").volume = volume.clamp(0.0, 1.0);
    }

    pub fn monitor_band(&self) -> Option<Band> {
        self.monitor.lock().expect("monitor state poisoned").band
    }

    pub fn monitor_volume(&self) -> f32 {
        self.monitor.lock().expect("monitor state poisoned").volume
    }

    /// Clears the shutdown flag, the same signal a Ctrl-C would send; every
    /// spawned thread notices within one of its own poll intervals.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn send_pipeline(&self, command: PipelineCommand) {
        let mut producer = self.pipeline_commands.lock().expect("pipeline command queue poisoned");
        if producer.try_push(command).is_err() {
            log::warn!("pipeline command queue full, dropping {command:?}");
        }
    }
}

/// Apply one pipeline command to the analysis pipeline; called from `T-audio`.
pub(crate) fn apply_pipeline_command(pipeline: &mut lumen_dsp::AnalysisPipeline, command: PipelineCommand) {
    match command {
        PipelineCommand::SetThreshold { band, value } => pipeline.set_threshold(band, value),
        PipelineCommand::SetAutoThreshold { band, auto } => pipeline.set_auto_threshold(band, auto),
        PipelineCommand::AdjustKickSensitivity { sensitivity } => pipeline.adjust_kick_sensitivity(sensitivity),
    }
}

/// Apply one kick-flash command by replacing the bridge's configuration;
/// called from `T-scheduler`.
pub(crate) fn apply_kick_flash_command(bridge: &mut lumen_scheduler::EventBridge, command: KickFlashCommand) {
    bridge.set_kick_flash_config(command.into_config());
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::spsc::SpscRingBuffer;

    #[test]
    fn set_threshold_is_observed_by_the_consumer() {
        let (producer, mut consumer) = SpscRingBuffer::new::<PipelineCommand>(8);
        let (kf_producer, _kf_consumer) = SpscRingBuffer::new::<KickFlashCommand>(8);
        let running = Arc::new(AtomicBool::new(true));
        let handle = EngineHandle::new(producer, kf_producer, running);

        handle.set_threshold(Band::Bass, 0.42);
        match consumer.try_pop() {
            Some(PipelineCommand::SetThreshold { band: Band::Bass, value }) => assert_eq!(value, 0.42),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stop_clears_the_running_flag() {
        let (producer, _consumer) = SpscRingBuffer::new::<PipelineCommand>(8);
        let (kf_producer, _kf_consumer) = SpscRingBuffer::new::<KickFlashCommand>(8);
        let running = Arc::new(AtomicBool::new(true));
        let handle = EngineHandle::new(producer, kf_producer, running);

        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
    }

    #[test]
    fn monitor_selection_round_trips() {
        let (producer, _consumer) = SpscRingBuffer::new::<PipelineCommand>(8);
        let (kf_producer, _kf_consumer) = SpscRingBuffer::new::<KickFlashCommand>(8);
        let running = Arc::new(AtomicBool::new(true));
        let handle = EngineHandle::new(producer, kf_producer, running);

        handle.set_monitor_band(Some(Band::Treble));
        handle.set_monitor_volume(1.5);
        assert_eq!(handle.monitor_band(), Some(Band::Treble));
        assert_eq!(handle.monitor_volume(), 1.0);
    }
}
