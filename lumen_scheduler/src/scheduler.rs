//! Lighting Scheduler (C5), "the heart": owns per-band sequence playback,
//! per-fixture flash state, and arbitrates the two so that, at every tick,
//! each DMX cell has exactly one effective writer.

use crate::error::SchedulerError;
use crate::flash::FlashRecord;
use crate::intensity::{apply_channels, clamp_to_floor, effective_intensity};
use crate::state::BandSchedulerState;
use lumen_artnet::DmxFrameBuffer;
use lumen_config::{Fixture, FixtureRegistry, SceneCatalog, SequenceCatalog};
use lumen_core::Band;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

fn lookup_scene<'a>(scenes: &'a SceneCatalog, name: &str) -> Result<&'a lumen_config::Scene, SchedulerError> {
    scenes.get(name).ok_or_else(|| SchedulerError::UnknownScene(name.to_string()))
}

fn lookup_sequence<'a>(sequences: &'a SequenceCatalog, name: &str) -> Result<&'a lumen_config::Sequence, SchedulerError> {
    sequences.get(name).ok_or_else(|| SchedulerError::UnknownSequence(name.to_string()))
}

pub struct Scheduler {
    buffer: DmxFrameBuffer,
    fixtures: Arc<FixtureRegistry>,
    scenes: Arc<SceneCatalog>,
    sequences: Arc<SequenceCatalog>,
    bands: [BandSchedulerState; 4],
    flashes: HashMap<String, FlashRecord>,
}

impl Scheduler {
    pub fn new(
        buffer: DmxFrameBuffer,
        fixtures: Arc<FixtureRegistry>,
        scenes: Arc<SceneCatalog>,
        sequences: Arc<SequenceCatalog>,
    ) -> Self {
        let now = Instant::now();
        Self {
            buffer,
            fixtures,
            scenes,
            sequences,
            bands: std::array::from_fn(|_| BandSchedulerState::idle(now)),
            flashes: HashMap::new(),
        }
    }

    /// Start (or restart) a looping sequence on `band`. A missing sequence
    /// name is a logged no-op; the band is left in whatever state it was in.
    pub fn start_sequence(&mut self, band: Band, sequence_name: &str, intensity: f32, now: Instant) {
        let sequence = match lookup_sequence(&self.sequences, sequence_name) {
            Ok(sequence) => sequence,
            Err(err) => {
                log::warn!("start_sequence: {err} (band {band})");
                return;
            }
        };
        let base_intensity = sequence.base_intensity;
        self.bands[band.index()] = BandSchedulerState {
            active_sequence: Some(sequence_name.to_string()),
            step_index: 0,
            step_entered_at: now,
            intensity: clamp_to_floor(intensity, base_intensity),
            base_intensity,
        };
    }

    /// Clear `band`'s sequence state and drive every fixture in that band to
    /// black. Fixtures under an active flash are still written; the flash
    /// will simply paint over them again on its next interpolation (they
    /// naturally decay to whatever color they captured at flash start, not
    /// to this black write).
    pub fn stop_sequence(&mut self, band: Band) {
        self.bands[band.index()] = BandSchedulerState::idle(Instant::now());
        for fixture in self.fixtures.by_band(band) {
            for idx in fixture.absolute_indices() {
                self.buffer.set(idx, 0, true);
            }
        }
    }

    /// The base intensity of a band's currently active sequence, or `1.0` if
    /// the band is idle (used by the fade bridge to rescale fade progress).
    pub fn base_intensity(&self, band: Band) -> f32 {
        let state = &self.bands[band.index()];
        if state.is_active() {
            state.base_intensity
        } else {
            1.0
        }
    }

    /// Apply the same floor-clamping rule as `start_sequence`. Effective on
    /// the next step application; a no-op if the band has no active sequence.
    pub fn update_intensity(&mut self, band: Band, intensity: f32) {
        let state = &mut self.bands[band.index()];
        if !state.is_active() {
            return;
        }
        state.intensity = clamp_to_floor(intensity, state.base_intensity);
    }

    /// Fire a flash on every fixture in `target_fixtures`: captures each
    /// fixture's current sequence-step color as the flash's decay target,
    /// paints the scene's color immediately, and installs a priority record.
    pub fn fire_flash<'f>(&mut self, scene_name: &str, target_fixtures: impl IntoIterator<Item = &'f Fixture>, intensity: f32, now: Instant) {
        let scene = match lookup_scene(&self.scenes, scene_name) {
            Ok(scene) => scene,
            Err(err) => {
                log::warn!("fire_flash: {err}");
                return;
            }
        };
        let decay = match scene {
            lumen_config::Scene::Flash { decay, .. } => *decay,
            _ => std::time::Duration::ZERO,
        };
        let start_channels = apply_channels(scene.channels().as_array(), intensity.clamp(0.0, 1.0));

        for fixture in target_fixtures {
            let target_channels = self.current_step_channels(fixture.band, now);
            let record = FlashRecord::new(start_channels, target_channels, decay, now);
            self.apply_rgbw(fixture, start_channels, true);
            self.flashes.insert(fixture.name.clone(), record);
        }
    }

    /// The color a band's active sequence would currently paint, before any
    /// flash override; black if the band is idle or its state can't resolve.
    fn current_step_channels(&self, band: Band, _now: Instant) -> [u8; 4] {
        let state = &self.bands[band.index()];
        let Some(sequence_name) = state.active_sequence.as_deref() else {
            return [0; 4];
        };
        let Some(sequence) = self.sequences.get(sequence_name) else {
            return [0; 4];
        };
        if sequence.steps.is_empty() {
            return [0; 4];
        }
        let step = &sequence.steps[state.step_index % sequence.steps.len()];
        let Some(scene) = self.scenes.get(&step.scene) else {
            return [0; 4];
        };
        let effective = effective_intensity(state.intensity, step.intensity_multiplier);
        apply_channels(scene.channels().as_array(), effective)
    }

    fn apply_rgbw(&self, fixture: &Fixture, channels: [u8; 4], force: bool) {
        for (idx, value) in fixture.absolute_indices().into_iter().zip(channels) {
            self.buffer.set(idx, value, force);
        }
    }

    /// Advance flashes and sequences by one tick (§4.5 tick algorithm).
    /// Flashes are applied before sequences, which is what enforces the
    /// priority contract.
    pub fn tick(&mut self, now: Instant) {
        let completed: Vec<String> = self
            .flashes
            .iter()
            .filter(|(_, record)| record.is_complete(now))
            .map(|(name, _)| name.clone())
            .collect();

        for name in &completed {
            if let Some(record) = self.flashes.remove(name) {
                if let Some(fixture) = self.fixtures.get(name) {
                    self.apply_rgbw(fixture, record.target_channels, true);
                }
            }
        }

        for (name, record) in &self.flashes {
            if let Some(fixture) = self.fixtures.get(name) {
                let color = record.interpolate(now);
                self.apply_rgbw(fixture, color, true);
            }
        }

        for band in Band::ALL {
            self.advance_band(band, now);
        }
    }

    fn advance_band(&mut self, band: Band, now: Instant) {
        let Some(sequence_name) = self.bands[band.index()].active_sequence.clone() else {
            return;
        };
        let Some(sequence) = self.sequences.get(&sequence_name) else {
            return;
        };
        if sequence.steps.is_empty() {
            return;
        }

        let state = &mut self.bands[band.index()];
        let step = &sequence.steps[state.step_index % sequence.steps.len()];
        if now.saturating_duration_since(state.step_entered_at) >= step.duration {
            state.step_index += 1;
            state.step_entered_at = now;
            if state.step_index >= sequence.steps.len() {
                if sequence.loops {
                    state.step_index = 0;
                } else {
                    state.active_sequence = None;
                }
            }
        }

        let colors = self.current_step_channels(band, now);
        for fixture in self.fixtures.by_band(band) {
            if self.flashes.contains_key(&fixture.name) {
                continue;
            }
            self.apply_rgbw(fixture, colors, false);
        }
    }
}
