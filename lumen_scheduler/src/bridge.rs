//! Event Bridge (C9): trivial but load-bearing translation from
//! [`DetectorEvent`]s into [`Scheduler`] calls, plus the kick-flash
//! scene-rotation logic that picks which scene a kick fires.

use crate::scheduler::Scheduler;
use lumen_config::{FixtureRegistry, KickFlashConfig, SequenceCatalog};
use lumen_core::{Band, XorShiftRng};
use lumen_dsp::DetectorEvent;
use std::sync::Arc;
use std::time::Instant;

/// Kicks amplify the bridged flash intensity by this factor, clamped to 1.0,
/// so a kick always reads as visually dominant over a sustained sequence.
const KICK_INTENSITY_AMPLIFICATION: f32 = 1.5;

pub struct EventBridge {
    fixtures: Arc<FixtureRegistry>,
    sequences: Arc<SequenceCatalog>,
    kick_flash: KickFlashConfig,
    rng: XorShiftRng,
}

impl EventBridge {
    pub fn new(fixtures: Arc<FixtureRegistry>, sequences: Arc<SequenceCatalog>, kick_flash: KickFlashConfig, seed: u64) -> Self {
        Self { fixtures, sequences, kick_flash, rng: XorShiftRng::new(seed) }
    }

    pub fn kick_flash_config(&self) -> &KickFlashConfig {
        &self.kick_flash
    }

    pub fn set_kick_flash_config(&mut self, config: KickFlashConfig) {
        self.kick_flash = config;
    }

    fn random_index(&mut self, len: usize) -> usize {
        let sample = self.rng.next_noise_sample();
        (((sample + 1.0) / 2.0) * len as f64) as usize
    }

    /// Translate one detector event into the corresponding scheduler call,
    /// per the table in §4.9.
    pub fn dispatch(&mut self, event: DetectorEvent, scheduler: &mut Scheduler, now: Instant) {
        match event {
            DetectorEvent::Kick { band } => self.handle_kick(band, scheduler, now),
            DetectorEvent::SustainedStart { band, intensity } => {
                if let Some(sequence) = self.sequences.for_band(band) {
                    scheduler.start_sequence(band, &sequence.name, intensity, now);
                }
            }
            DetectorEvent::SustainedUpdate { band, intensity } => {
                scheduler.update_intensity(band, intensity);
            }
            DetectorEvent::SustainedEnd { band } => {
                scheduler.stop_sequence(band);
            }
            DetectorEvent::FadeUpdate { band, intensity } => {
                let base = scheduler.base_intensity(band);
                scheduler.update_intensity(band, base * intensity);
            }
            DetectorEvent::FadeComplete { band } => {
                scheduler.stop_sequence(band);
            }
        }
    }

    fn handle_kick(&mut self, band: Band, scheduler: &mut Scheduler, now: Instant) {
        let rand_index = self.random_index(self.kick_flash.scenes.len().max(1));
        let Some(scene_name) = self.kick_flash.next_flash_scene(rand_index) else {
            return;
        };
        let scene_name = scene_name.to_string();
        let intensity = (self.kick_flash.intensity * KICK_INTENSITY_AMPLIFICATION).min(1.0);
        let targets: Vec<_> = self.fixtures.kick_responsive().filter(|f| f.band == band).collect();
        scheduler.fire_flash(&scene_name, targets, intensity, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_artnet::DmxFrameBuffer;
    use lumen_config::{FlashMode, SceneCatalog};

    fn fixtures() -> Arc<FixtureRegistry> {
        Arc::new(
            FixtureRegistry::load(
                r#"[{"name":"f1","start_channel":1,"channels":{"r":1,"g":2,"b":3,"w":4},"band":"Bass","responds_to_kicks":true}]"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn kick_fires_a_flash_on_kick_responsive_bass_fixtures() {
        let buffer = DmxFrameBuffer::new();
        let fx = fixtures();
        let sc = Arc::new(SceneCatalog::default_catalog());
        let sq = Arc::new(SequenceCatalog::load("[]", &sc).unwrap());
        let mut scheduler = Scheduler::new(buffer.clone(), fx.clone(), sc, sq.clone());
        let kick_flash = KickFlashConfig { scenes: vec!["white_flash".into()], mode: FlashMode::Single, ..KickFlashConfig::default_config() };
        let mut bridge = EventBridge::new(fx, sq, kick_flash, 7);

        bridge.dispatch(DetectorEvent::Kick { band: Band::Bass }, &mut scheduler, Instant::now());
        assert_eq!(&buffer.snapshot()[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn disabled_kick_flash_is_a_noop() {
        let buffer = DmxFrameBuffer::new();
        let fx = fixtures();
        let sc = Arc::new(SceneCatalog::default_catalog());
        let sq = Arc::new(SequenceCatalog::load("[]", &sc).unwrap());
        let mut scheduler = Scheduler::new(buffer.clone(), fx.clone(), sc, sq.clone());
        let kick_flash = KickFlashConfig { enabled: false, ..KickFlashConfig::default_config() };
        let mut bridge = EventBridge::new(fx, sq, kick_flash, 7);

        bridge.dispatch(DetectorEvent::Kick { band: Band::Bass }, &mut scheduler, Instant::now());
        assert_eq!(buffer.snapshot(), [0u8; 512]);
    }
}
