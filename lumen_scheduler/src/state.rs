//! Per-band scheduler state (§3 "Scheduler side").

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct BandSchedulerState {
    pub active_sequence: Option<String>,
    pub step_index: usize,
    pub step_entered_at: Instant,
    pub intensity: f32,
    pub base_intensity: f32,
}

impl BandSchedulerState {
    pub fn idle(now: Instant) -> Self {
        Self { active_sequence: None, step_index: 0, step_entered_at: now, intensity: 0.0, base_intensity: 0.0 }
    }

    pub fn is_active(&self) -> bool {
        self.active_sequence.is_some()
    }
}
