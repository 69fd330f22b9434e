//! Band Analyzer (C6): windowed FFT, bin-to-band energy reduction, rolling-peak
//! normalization, and exponential smoothing. Grounded on the source's
//! `BandAnalyzer.analyze_spectrum` / `normalize_levels`.

use crate::fft::MagnitudeSpectrum;
use lumen_core::Band;
use std::collections::VecDeque;

const RAW_GAIN: f32 = 10.0;
const PEAK_HISTORY: usize = 100;
const MIN_PEAK: f32 = 1e-3;
const DEFAULT_SMOOTHING_ALPHA: f32 = 0.4;

struct BandHistory {
    history: VecDeque<f32>,
    prev_level: f32,
}

impl BandHistory {
    fn new() -> Self {
        Self { history: VecDeque::with_capacity(PEAK_HISTORY), prev_level: 0.0 }
    }

    fn push_and_normalize(&mut self, raw: f32, alpha: f32) -> f32 {
        if self.history.len() == PEAK_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(raw);

        let peak = self.history.iter().copied().fold(MIN_PEAK, f32::max);
        let norm = (raw / peak).clamp(0.0, 1.0);
        let level = alpha * self.prev_level + (1.0 - alpha) * norm;
        self.prev_level = level;
        level
    }
}

/// Extracts the four band levels from a mono audio chunk, one chunk at a time.
pub struct BandAnalyzer {
    sample_rate: f32,
    smoothing_alpha: f32,
    spectrum: MagnitudeSpectrum,
    bands: [BandHistory; 4],
}

impl BandAnalyzer {
    pub fn new(chunk_len: usize, sample_rate: f32) -> Self {
        Self::with_smoothing(chunk_len, sample_rate, DEFAULT_SMOOTHING_ALPHA)
    }

    pub fn with_smoothing(chunk_len: usize, sample_rate: f32, smoothing_alpha: f32) -> Self {
        Self {
            sample_rate,
            smoothing_alpha,
            spectrum: MagnitudeSpectrum::new(chunk_len),
            bands: [BandHistory::new(), BandHistory::new(), BandHistory::new(), BandHistory::new()],
        }
    }

    /// Process one chunk, returning the smoothed `[Bass, LowMid, HighMid, Treble]` levels.
    ///
    /// `chunk` must be exactly the configured analysis chunk length; values are
    /// clamped to `[-0.9, 0.9]` before windowing to guard against clipped input.
    pub fn process(&mut self, chunk: &[f32]) -> [f32; 4] {
        let mut clamped = vec![0.0_f32; chunk.len()];
        for (dst, &src) in clamped.iter_mut().zip(chunk.iter()) {
            let sanitized = if src.is_finite() { src } else { 0.0 };
            *dst = sanitized.clamp(-0.9, 0.9);
        }

        let bins = self.spectrum.compute(&clamped);
        let sample_rate = self.sample_rate;
        let mut out = [0.0_f32; 4];

        for band in Band::ALL {
            let (lo, hi) = band.freq_range_hz();
            let mut sum = 0.0_f32;
            let mut count = 0usize;
            for (i, c) in bins.iter().enumerate() {
                let freq = self.spectrum.bin_freq_hz(i, sample_rate);
                if freq >= lo && freq <= hi {
                    sum += c.norm();
                    count += 1;
                }
            }
            let raw = if count > 0 { (sum / count as f32) * RAW_GAIN } else { 0.0 };
            out[band.index()] = self.bands[band.index()].push_and_normalize(raw, self.smoothing_alpha);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_produces_zero_levels() {
        let mut analyzer = BandAnalyzer::new(512, 48_000.0);
        let silence = vec![0.0_f32; 512];
        let levels = analyzer.process(&silence);
        assert_eq!(levels, [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn bass_tone_excites_bass_band_more_than_treble() {
        let mut analyzer = BandAnalyzer::new(1024, 48_000.0);
        let mut last = [0.0_f32; 4];
        for _ in 0..8 {
            let chunk: Vec<f32> = (0..1024)
                .map(|n| 0.5 * (2.0 * std::f32::consts::PI * 80.0 * n as f32 / 48_000.0).sin())
                .collect();
            last = analyzer.process(&chunk);
        }
        assert!(last[Band::Bass.index()] > last[Band::Treble.index()]);
    }

    #[test]
    fn levels_are_never_outside_unit_range() {
        let mut analyzer = BandAnalyzer::new(256, 48_000.0);
        for i in 0..50 {
            let chunk: Vec<f32> = (0..256).map(|n| ((i * n) as f32 * 0.01).sin() * 5.0).collect();
            let levels = analyzer.process(&chunk);
            for l in levels {
                assert!((0.0..=1.0).contains(&l));
            }
        }
    }

    #[test]
    fn sanitizes_non_finite_input() {
        let mut analyzer = BandAnalyzer::new(64, 48_000.0);
        let chunk = vec![f32::NAN; 64];
        let levels = analyzer.process(&chunk);
        for l in levels {
            assert!(l.is_finite());
        }
    }
}
