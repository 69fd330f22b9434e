//! Sustained-level latch (part of C8). Grounded on the source's
//! `is_sustained_energy`, generalized from a fixed `>0.6` gate to a gate
//! relative to the band's adaptive threshold.

use std::collections::VecDeque;

const WINDOW_LEN: usize = 40;
const STABILITY_WINDOW: usize = 20;
const LEVEL_RATIO: f32 = 0.6;
const DEFAULT_STABILITY_THRESHOLD: f32 = 0.1;

/// Edge-triggered output of the sustained-level detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SustainedTransition {
    Start(f32),
    Update(f32),
    End,
}

pub struct SustainedDetector {
    window: VecDeque<f32>,
    stability_threshold: f32,
    sustained: bool,
}

impl SustainedDetector {
    pub fn new() -> Self {
        Self::with_stability_threshold(DEFAULT_STABILITY_THRESHOLD)
    }

    pub fn with_stability_threshold(stability_threshold: f32) -> Self {
        Self { window: VecDeque::with_capacity(WINDOW_LEN), stability_threshold, sustained: false }
    }

    pub fn is_sustained(&self) -> bool {
        self.sustained
    }

    /// Feed one smoothed level and the band's current adaptive threshold;
    /// returns the transition (if any) this sample produced.
    pub fn update(&mut self, level: f32, threshold: f32) -> Option<SustainedTransition> {
        if self.window.len() == WINDOW_LEN {
            self.window.pop_front();
        }
        self.window.push_back(level);

        let take = self.window.len().min(STABILITY_WINDOW);
        let recent: Vec<f32> = self.window.iter().rev().take(take).copied().collect();
        let mean = recent.iter().sum::<f32>() / recent.len() as f32;
        let variance = recent.iter().map(|&v| (v - mean).powi(2)).sum::<f32>() / recent.len() as f32;

        let now_sustained = mean >= LEVEL_RATIO * threshold && variance <= self.stability_threshold;

        let transition = match (self.sustained, now_sustained) {
            (false, true) => {
                let intensity = sustained_intensity(mean, threshold);
                Some(SustainedTransition::Start(intensity))
            }
            (true, true) => Some(SustainedTransition::Update(sustained_intensity(mean, threshold))),
            (true, false) => Some(SustainedTransition::End),
            (false, false) => None,
        };

        self.sustained = now_sustained;
        transition
    }
}

impl Default for SustainedDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn sustained_intensity(mean: f32, threshold: f32) -> f32 {
    let floor = LEVEL_RATIO * threshold;
    let headroom = (1.0 - floor).max(f32::EPSILON);
    let ratio = ((mean - floor) / headroom).max(0.0);
    ratio.powf(0.7).clamp(0.3, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_above_threshold_emits_start_then_update() {
        let mut detector = SustainedDetector::new();
        let mut saw_start = false;
        let mut saw_update = false;
        for _ in 0..25 {
            if let Some(t) = detector.update(0.8, 0.3) {
                match t {
                    SustainedTransition::Start(_) if !saw_start => saw_start = true,
                    SustainedTransition::Update(_) => saw_update = true,
                    _ => {}
                }
            }
        }
        assert!(saw_start);
        assert!(saw_update);
        assert!(detector.is_sustained());
    }

    #[test]
    fn falling_emits_end() {
        let mut detector = SustainedDetector::new();
        for _ in 0..25 {
            detector.update(0.8, 0.3);
        }
        assert!(detector.is_sustained());
        let mut saw_end = false;
        for _ in 0..25 {
            if let Some(SustainedTransition::End) = detector.update(0.01, 0.3) {
                saw_end = true;
            }
        }
        assert!(saw_end);
        assert!(!detector.is_sustained());
    }

    #[test]
    fn unstable_level_never_latches_despite_high_mean() {
        let mut detector = SustainedDetector::new();
        for i in 0..40 {
            let level = if i % 2 == 0 { 0.95 } else { 0.05 };
            detector.update(level, 0.3);
        }
        assert!(!detector.is_sustained());
    }

    #[test]
    fn intensity_is_always_in_expected_range() {
        assert!((0.3..=1.0).contains(&sustained_intensity(1.0, 0.3)));
        assert!((0.3..=1.0).contains(&sustained_intensity(0.18, 0.3)));
    }
}
