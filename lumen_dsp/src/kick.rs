//! Kick Detector (C7): low-band filter + RMS envelope + spectral flux fusion
//! with adaptive robust normalization and a refractory period. Grounded on the
//! source's `KickDetector.process_block` / `_scipy_kick_detection`.

use crate::filter::LowPassFilter;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const HISTORY_LEN: usize = 200;
const MIN_HISTORY_FOR_ROBUST_NORM: usize = 10;
const FLUX_FFT_LEN: usize = 512;
const ONSET_WINDOW: usize = 5;

#[derive(Debug, Clone)]
pub struct KickConfig {
    pub low_hz: f32,
    pub high_hz: f32,
    pub threshold: f32,
    pub threshold_k: f32,
    pub min_energy: f32,
    pub refractory: Duration,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            low_hz: 30.0,
            high_hz: 170.0,
            threshold: 0.3,
            threshold_k: 2.0,
            min_energy: 0.005,
            refractory: Duration::from_millis(150),
        }
    }
}

/// Bounded sample history with median/MAD robust-normalization support.
struct RollingHistory {
    samples: VecDeque<f32>,
    cap: usize,
}

impl RollingHistory {
    fn new(cap: usize) -> Self {
        Self { samples: VecDeque::with_capacity(cap), cap }
    }

    fn push(&mut self, x: f32) {
        if self.samples.len() == self.cap {
            self.samples.pop_front();
        }
        self.samples.push_back(x);
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    /// `norm(x, H) = (x - (median(H) + k*MAD(H))) / MAD(H)`, or `None` if the
    /// history is too short or degenerate (MAD == 0).
    fn robust_norm(&self, x: f32, k: f32) -> Option<f32> {
        if self.samples.len() < MIN_HISTORY_FOR_ROBUST_NORM {
            return None;
        }
        let median = percentile(&self.samples, 0.5);
        let abs_devs: Vec<f32> = self.samples.iter().map(|&v| (v - median).abs()).collect();
        let mad = percentile(&abs_devs, 0.5);
        if mad <= f32::EPSILON {
            return None;
        }
        Some((x - (median + k * mad)) / mad)
    }

    fn recent_mean(&self, n: usize) -> f32 {
        let take = self.samples.len().min(n);
        if take == 0 {
            return 0.0;
        }
        self.samples.iter().rev().take(take).sum::<f32>() / take as f32
    }
}

fn percentile(values: impl IntoIterator<Item = f32>, p: f32) -> f32 {
    let mut sorted: Vec<f32> = values.into_iter().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f32 * p).round() as usize;
    sorted[idx]
}

/// A detected kick onset, with the diagnostic scores that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickResult {
    pub kick: bool,
    pub env: f32,
    pub combined: f32,
}

pub struct KickDetector {
    config: KickConfig,
    filter: LowPassFilter,
    env_history: RollingHistory,
    flux_history: RollingHistory,
    prev_spectrum: Option<Vec<f32>>,
    last_kick: Option<Instant>,
}

impl KickDetector {
    pub fn new(sample_rate: f32, config: KickConfig) -> Self {
        Self {
            filter: LowPassFilter::new(config.high_hz, sample_rate),
            env_history: RollingHistory::new(HISTORY_LEN),
            flux_history: RollingHistory::new(HISTORY_LEN),
            prev_spectrum: None,
            last_kick: None,
            config,
        }
    }

    /// Raise or lower sensitivity in `[0,1]`. Matches the source's calibration:
    /// higher sensitivity raises `threshold` and `min_energy` together rather
    /// than lowering the gate, which keeps dense low-end material from
    /// chattering at high sensitivity.
    pub fn adjust_sensitivity(&mut self, sensitivity: f32) {
        let s = sensitivity.clamp(0.0, 1.0);
        self.config.threshold = 0.5 + s * 0.5;
        self.config.min_energy = 0.008 + s * 0.012;
    }

    pub fn process_block(&mut self, block: &[f32], now: Instant) -> KickResult {
        let mut filtered: Vec<f32> = block.iter().map(|&x| if x.is_finite() { x } else { 0.0 }).collect();
        self.filter.process_block(&mut filtered);

        let env = rms(&filtered);
        self.env_history.push(env);

        let flux = self.spectral_flux(&filtered);
        self.flux_history.push(flux);

        let env_norm = self.env_history.robust_norm(env, self.config.threshold_k).unwrap_or(0.0).max(0.0);
        let flux_norm = self.flux_history.robust_norm(flux, self.config.threshold_k).unwrap_or(0.0).max(0.0);
        let onset = self.onset_strength();

        let combined = if onset.is_some() {
            0.6 * onset.unwrap() + 0.4 * (0.6 * env_norm + 0.4 * flux_norm).min(2.0)
        } else {
            (0.6 * env_norm + 0.4 * flux_norm).min(2.0)
        };

        let energy_ok = env > self.config.min_energy;
        let time_ok = self.last_kick.is_none_or(|t| now.duration_since(t) >= self.config.refractory);
        let threshold_ok = combined > self.config.threshold;

        let kick = energy_ok && time_ok && threshold_ok;
        if kick {
            self.last_kick = Some(now);
        }

        KickResult { kick, env, combined }
    }

    /// Local-max onset-strength proxy over the recent RMS envelope, standing
    /// in for the source's librosa onset-detection cross-check (§4.7).
    fn onset_strength(&self) -> Option<f32> {
        if self.env_history.len() < ONSET_WINDOW {
            return None;
        }
        let recent_mean = self.env_history.recent_mean(ONSET_WINDOW - 1);
        let latest = *self.env_history.samples.back()?;
        let increase = latest / (recent_mean + 1e-6);
        Some((increase - 1.0).max(0.0).min(1.0))
    }

    fn spectral_flux(&mut self, filtered: &[f32]) -> f32 {
        if filtered.len() < 256 {
            return 0.0;
        }
        let window_len = filtered.len().min(FLUX_FFT_LEN);
        let mut spec = crate::fft::MagnitudeSpectrum::new(window_len);
        let mag: Vec<f32> = spec.compute(&filtered[..window_len]).iter().map(|c| c.norm()).collect();
        let n_low = mag.len() / 8;
        let low_mag = &mag[..n_low.max(1)];

        let flux = match &self.prev_spectrum {
            Some(prev) if prev.len() == low_mag.len() => {
                let sum_pos: f32 = low_mag.iter().zip(prev.iter()).map(|(a, b)| (a - b).max(0.0)).sum();
                sum_pos / low_mag.len() as f32
            }
            _ => 0.0,
        };
        self.prev_spectrum = Some(low_mag.to_vec());
        if flux.is_finite() { flux } else { 0.0 }
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_block(len: usize, amplitude: f32) -> Vec<f32> {
        (0..len).map(|n| if n < len / 4 { amplitude } else { 0.0 }).collect()
    }

    #[test]
    fn silence_never_triggers() {
        let mut detector = KickDetector::new(48_000.0, KickConfig::default());
        let silence = vec![0.0_f32; 1024];
        let t0 = Instant::now();
        for i in 0..20 {
            let result = detector.process_block(&silence, t0 + Duration::from_millis(i * 20));
            assert!(!result.kick);
        }
    }

    #[test]
    fn refractory_suppresses_rapid_repeats() {
        let mut detector = KickDetector::new(48_000.0, KickConfig::default());
        let t0 = Instant::now();
        // warm up history with quiet noise so the first impulse reads as a genuine outlier
        for i in 0..30 {
            detector.process_block(&vec![0.001_f32; 1024], t0 + Duration::from_millis(i * 10));
        }
        let base = t0 + Duration::from_millis(400);
        let first = detector.process_block(&impulse_block(1024, 0.9), base);
        let second = detector.process_block(&impulse_block(1024, 0.9), base + Duration::from_millis(80));
        assert!(first.kick, "a strong impulse after quiet warm-up should register as a kick");
        assert!(!second.kick, "a repeat within the refractory window must not register");
    }

    #[test]
    fn sensitivity_adjustment_changes_thresholds() {
        let mut detector = KickDetector::new(48_000.0, KickConfig::default());
        detector.adjust_sensitivity(1.0);
        assert!((detector.config.threshold - 1.0).abs() < 1e-6);
        assert!((detector.config.min_energy - 0.02).abs() < 1e-6);
    }

    #[test]
    fn never_emits_nan_or_inf_energy() {
        let mut detector = KickDetector::new(48_000.0, KickConfig::default());
        let garbage = vec![f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0];
        let mut garbage_block = Vec::new();
        for _ in 0..256 {
            garbage_block.extend_from_slice(&garbage);
        }
        let result = detector.process_block(&garbage_block, Instant::now());
        assert!(result.env.is_finite());
        assert!(result.combined.is_finite());
    }
}
