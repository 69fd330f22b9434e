//! # Lumen DSP
//!
//! The audio analysis pipeline: banded energy extraction (C6), kick-onset
//! detection (C7), and adaptive thresholding / sustained-level / fade-to-black
//! detection (C8). [`AnalysisPipeline`] wires all three into the single pass
//! that runs on the audio thread per incoming chunk, producing the
//! [`DetectorEvent`]s that the scheduler crate consumes.

pub mod bands;
pub mod config;
pub mod error;
pub mod events;
pub mod fade;
pub mod fft;
pub mod filter;
pub mod kick;
pub mod sustained;
pub mod threshold;

pub use bands::BandAnalyzer;
pub use config::AnalysisConfig;
pub use error::{DspError, Result};
pub use events::DetectorEvent;
pub use fade::{FadeConfig, FadeDetector, FadeTransition};
pub use filter::LowPassFilter;
pub use kick::{KickConfig, KickDetector, KickResult};
pub use sustained::{SustainedDetector, SustainedTransition};
pub use threshold::AdaptiveThreshold;

use lumen_core::{Band, StackVec};
use std::time::{Duration, Instant};

const MAX_EVENTS_PER_CHUNK: usize = 16;

struct BandState {
    threshold: AdaptiveThreshold,
    sustained: SustainedDetector,
    fade: FadeDetector,
}

impl BandState {
    fn new(stability_threshold: f32, fade_config: FadeConfig) -> Self {
        Self {
            threshold: AdaptiveThreshold::new(),
            sustained: SustainedDetector::with_stability_threshold(stability_threshold),
            fade: FadeDetector::new(fade_config),
        }
    }
}

/// Runs C6 + C7 + C8 over each incoming audio chunk and emits the resulting
/// [`DetectorEvent`]s. One instance lives on `T-audio` for the whole process.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    analyzer: BandAnalyzer,
    kick_detector: KickDetector,
    bands: [BandState; 4],
    last_chunk_at: Option<Instant>,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        let analyzer = BandAnalyzer::with_smoothing(config.chunk_len, config.sample_rate, config.smoothing_alpha);
        let kick_detector = KickDetector::new(config.sample_rate, config.kick.clone());
        let bands = std::array::from_fn(|_| BandState::new(config.sustained_stability_threshold, config.fade));
        Self { config, analyzer, kick_detector, bands, last_chunk_at: None }
    }

    /// Process one mono chunk (must be `config.chunk_len` samples) captured at
    /// `now`, returning the events it produced. Allocation-free: the result is
    /// a stack-allocated, bounded event buffer (drop-oldest beyond capacity,
    /// matching the SPSC channel's own overflow policy downstream).
    pub fn process(&mut self, chunk: &[f32], now: Instant) -> StackVec<DetectorEvent, MAX_EVENTS_PER_CHUNK> {
        let mut events = StackVec::new();
        let dt = match self.last_chunk_at.replace(now) {
            Some(prev) => now.saturating_duration_since(prev),
            None => Duration::from_secs_f32(self.config.chunk_len as f32 / self.config.sample_rate),
        };

        let levels = self.analyzer.process(chunk);

        let kick_result = self.kick_detector.process_block(chunk, now);
        if kick_result.kick {
            let _ = events.push(DetectorEvent::Kick { band: Band::Bass });
        }

        for band in Band::ALL {
            let level = levels[band.index()];
            let state = &mut self.bands[band.index()];

            state.threshold.update(level);
            let threshold = state.threshold.value();

            if let Some(transition) = state.sustained.update(level, threshold) {
                let event = match transition {
                    SustainedTransition::Start(i) => DetectorEvent::SustainedStart { band, intensity: i },
                    SustainedTransition::Update(i) => DetectorEvent::SustainedUpdate { band, intensity: i },
                    SustainedTransition::End => DetectorEvent::SustainedEnd { band },
                };
                let _ = events.push(event);
            }

            if let Some(transition) = state.fade.tick(level, dt) {
                let event = match transition {
                    FadeTransition::Update(i) => DetectorEvent::FadeUpdate { band, intensity: i },
                    FadeTransition::Complete => DetectorEvent::FadeComplete { band },
                };
                let _ = events.push(event);
            }
        }

        events
    }

    pub fn set_threshold(&mut self, band: Band, value: f32) {
        self.bands[band.index()].threshold.set_manual(value);
    }

    pub fn set_auto_threshold(&mut self, band: Band, auto: bool) {
        self.bands[band.index()].threshold.set_auto(auto);
    }

    pub fn adjust_kick_sensitivity(&mut self, sensitivity: f32) {
        self.kick_detector.adjust_sensitivity(sensitivity);
    }
}
