//! Detector event vocabulary (feeds C9, the Event Bridge).

use lumen_core::Band;

/// An event produced by the analysis pipeline, destined for the scheduler via
/// the SPSC channel described in §5 of the specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorEvent {
    Kick { band: Band },
    SustainedStart { band: Band, intensity: f32 },
    SustainedUpdate { band: Band, intensity: f32 },
    SustainedEnd { band: Band },
    FadeUpdate { band: Band, intensity: f32 },
    FadeComplete { band: Band },
}

impl DetectorEvent {
    pub fn band(&self) -> Band {
        match self {
            DetectorEvent::Kick { band }
            | DetectorEvent::SustainedStart { band, .. }
            | DetectorEvent::SustainedUpdate { band, .. }
            | DetectorEvent::SustainedEnd { band }
            | DetectorEvent::FadeUpdate { band, .. }
            | DetectorEvent::FadeComplete { band } => *band,
        }
    }
}
