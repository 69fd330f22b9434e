//! Windowed real-FFT magnitude spectrum, shared by the band analyzer (§4.6)
//! and the kick detector's spectral-flux fallback (§4.7).

use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// A Hann window of a fixed length, computed once and reused every chunk.
pub fn hann_window(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|n| {
            let x = std::f32::consts::PI * n as f32 / (len - 1) as f32;
            x.sin() * x.sin()
        })
        .collect()
}

/// A reusable real-to-complex FFT of a fixed length, producing a magnitude
/// spectrum. Owns its scratch buffers so the hot path never allocates after
/// construction.
pub struct MagnitudeSpectrum {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    windowed: Vec<f32>,
    spectrum: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
}

impl MagnitudeSpectrum {
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(len);
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();
        Self { fft, window: hann_window(len), windowed: vec![0.0; len], spectrum, scratch }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Window `samples` (must match `self.len()`) and compute the magnitude
    /// spectrum, returning the positive-frequency bins (`len/2 + 1` of them).
    pub fn compute(&mut self, samples: &[f32]) -> &[realfft::num_complex::Complex<f32>] {
        debug_assert_eq!(samples.len(), self.windowed.len());
        for (dst, (&src, &w)) in self.windowed.iter_mut().zip(samples.iter().zip(self.window.iter())) {
            *dst = src * w;
        }
        let _ = self.fft.process_with_scratch(&mut self.windowed, &mut self.spectrum, &mut self.scratch);
        &self.spectrum
    }

    /// Frequency in Hz represented by FFT bin `i`.
    pub fn bin_freq_hz(&self, i: usize, sample_rate: f32) -> f32 {
        i as f32 * sample_rate / self.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_window_is_zero_at_edges_and_one_at_center() {
        let w = hann_window(9);
        assert!(w[0].abs() < 1e-6);
        assert!(w[8].abs() < 1e-6);
        assert!((w[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pure_tone_peaks_at_expected_bin() {
        let len = 1024;
        let sample_rate = 48_000.0_f32;
        let freq = 1000.0_f32;
        let samples: Vec<f32> =
            (0..len).map(|n| (2.0 * std::f32::consts::PI * freq * n as f32 / sample_rate).sin()).collect();

        let mut spec = MagnitudeSpectrum::new(len);
        let bins = spec.compute(&samples).to_vec();

        let (peak_bin, _) = bins
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();
        let peak_freq = spec.bin_freq_hz(peak_bin, sample_rate);
        assert!((peak_freq - freq).abs() < sample_rate / len as f32 * 2.0);
    }
}
