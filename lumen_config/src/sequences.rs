//! Sequence Catalog, the other half of C4: looping step lists bound to a band.

use crate::error::{ConfigError, Result};
use crate::scenes::SceneCatalog;
use lumen_core::Band;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// One step in a sequence: a scene reference, a dwell duration, and an
/// optional per-step intensity multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub scene: String,
    pub duration: Duration,
    pub intensity_multiplier: f32,
}

/// A looping step list bound to one band.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub band: Band,
    pub steps: Vec<Step>,
    pub loops: bool,
    pub base_intensity: f32,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    scene: String,
    duration_seconds: f32,
    #[serde(default = "default_multiplier")]
    intensity_multiplier: f32,
}

fn default_multiplier() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct RawSequence {
    name: String,
    band: String,
    steps: Vec<RawStep>,
    #[serde(rename = "loop", default = "default_true")]
    loops: bool,
    base_intensity: Option<f32>,
}

fn default_true() -> bool {
    true
}

impl RawSequence {
    fn into_sequence(self, scenes: &SceneCatalog) -> Result<Sequence> {
        let band = Band::from_str(&self.band)
            .map_err(|source| ConfigError::UnknownBand { context: format!("sequence {:?}", self.name), source })?;

        let steps = self
            .steps
            .into_iter()
            .map(|s| {
                if scenes.get(&s.scene).is_none() {
                    return Err(ConfigError::UnknownSceneReference {
                        sequence: self.name.clone(),
                        scene: s.scene.clone(),
                    });
                }
                Ok(Step {
                    scene: s.scene,
                    duration: Duration::from_secs_f32(s.duration_seconds),
                    intensity_multiplier: s.intensity_multiplier,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Sequence { name: self.name, band, steps, loops: self.loops, base_intensity: self.base_intensity.unwrap_or(1.0) })
    }
}

/// Sequences indexed by name and by band.
pub struct SequenceCatalog {
    sequences: HashMap<String, Sequence>,
    by_band: HashMap<Band, Vec<String>>,
}

impl SequenceCatalog {
    pub fn load(json: &str, scenes: &SceneCatalog) -> Result<Self> {
        let raw: Vec<RawSequence> =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { path: "sequences.json".into(), source })?;

        let mut sequences = HashMap::new();
        let mut by_band: HashMap<Band, Vec<String>> = HashMap::new();
        for raw_seq in raw {
            let sequence = raw_seq.into_sequence(scenes)?;
            by_band.entry(sequence.band).or_default().push(sequence.name.clone());
            sequences.insert(sequence.name.clone(), sequence);
        }

        Ok(Self { sequences, by_band })
    }

    pub fn get(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(name)
    }

    /// The first configured sequence for a band, used by the Event Bridge's
    /// `sequence_for_band(b)` lookup.
    pub fn for_band(&self, band: Band) -> Option<&Sequence> {
        self.by_band.get(&band)?.first().and_then(|name| self.sequences.get(name))
    }

    pub fn default_catalog(scenes: &SceneCatalog) -> Self {
        let json = r#"[
            {"name":"bass_pulse","band":"Bass","loop":true,"base_intensity":0.4,
             "steps":[{"scene":"black","duration_seconds":1.0}]},
            {"name":"lowmid_pulse","band":"Low-Mid","loop":true,"base_intensity":0.4,
             "steps":[{"scene":"black","duration_seconds":1.0}]},
            {"name":"highmid_pulse","band":"High-Mid","loop":true,"base_intensity":0.4,
             "steps":[{"scene":"black","duration_seconds":1.0}]},
            {"name":"treble_pulse","band":"Treble","loop":true,"base_intensity":0.4,
             "steps":[{"scene":"black","duration_seconds":1.0}]}
        ]"#;
        Self::load(json, scenes).expect("built-in default sequence catalog must be valid")
    }
}
