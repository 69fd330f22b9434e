//! Silence-triggered fade-to-black (part of C8).
//!
//! Resolves the spec's open question on in-progress-fade cancellation: any
//! sample whose level rises above `silence_threshold` cancels a fade, whether
//! it is pending (silence timer running) or already in progress. See
//! DESIGN.md for the rationale.

use std::time::Duration;

const DEFAULT_SILENCE_THRESHOLD: f32 = 0.05;
const DEFAULT_START_DELAY: Duration = Duration::from_secs(3);
const DEFAULT_FADE_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeTransition {
    Update(f32),
    Complete,
}

#[derive(Debug, Clone, Copy)]
pub struct FadeConfig {
    pub silence_threshold: f32,
    pub start_delay: Duration,
    pub duration: Duration,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            start_delay: DEFAULT_START_DELAY,
            duration: DEFAULT_FADE_DURATION,
        }
    }
}

pub struct FadeDetector {
    config: FadeConfig,
    silence_duration: Duration,
    fade_elapsed: Option<Duration>,
}

impl FadeDetector {
    pub fn new(config: FadeConfig) -> Self {
        Self { config, silence_duration: Duration::ZERO, fade_elapsed: None }
    }

    pub fn is_fading(&self) -> bool {
        self.fade_elapsed.is_some()
    }

    /// Advance the detector by `dt` with the latest smoothed level.
    pub fn tick(&mut self, level: f32, dt: Duration) -> Option<FadeTransition> {
        if level >= self.config.silence_threshold {
            self.silence_duration = Duration::ZERO;
            if self.fade_elapsed.is_some() {
                self.fade_elapsed = None;
            }
            return None;
        }

        if let Some(elapsed) = &mut self.fade_elapsed {
            *elapsed += dt;
            if *elapsed >= self.config.duration {
                self.fade_elapsed = None;
                self.silence_duration = Duration::ZERO;
                return Some(FadeTransition::Complete);
            }
            let p = elapsed.as_secs_f32() / self.config.duration.as_secs_f32();
            return Some(FadeTransition::Update(1.0 - p));
        }

        self.silence_duration += dt;
        if self.silence_duration >= self.config.start_delay {
            self.fade_elapsed = Some(Duration::ZERO);
            return Some(FadeTransition::Update(1.0));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_begins_after_silence_threshold_and_completes_monotonically() {
        let mut detector = FadeDetector::new(FadeConfig::default());
        let dt = Duration::from_millis(100);

        for _ in 0..34 {
            detector.tick(0.02, dt);
        }
        assert!(detector.is_fading());

        let mut last = f32::MAX;
        let mut saw_complete = false;
        for _ in 0..60 {
            match detector.tick(0.02, dt) {
                Some(FadeTransition::Update(i)) => {
                    assert!(i <= last + 1e-6);
                    last = i;
                }
                Some(FadeTransition::Complete) => {
                    saw_complete = true;
                    break;
                }
                None => panic!("fade should keep emitting until complete"),
            }
        }
        assert!(saw_complete);
    }

    #[test]
    fn non_silent_sample_cancels_pending_fade() {
        let mut detector = FadeDetector::new(FadeConfig::default());
        let dt = Duration::from_millis(500);
        detector.tick(0.01, dt);
        detector.tick(0.01, dt);
        detector.tick(0.9, dt);
        assert!(!detector.is_fading());
        assert_eq!(detector.silence_duration, Duration::ZERO);
    }

    #[test]
    fn non_silent_sample_cancels_in_progress_fade() {
        let mut detector = FadeDetector::new(FadeConfig::default());
        let dt = Duration::from_millis(100);
        for _ in 0..31 {
            detector.tick(0.01, dt);
        }
        assert!(detector.is_fading());
        let transition = detector.tick(0.5, dt);
        assert!(transition.is_none());
        assert!(!detector.is_fading());
    }
}
