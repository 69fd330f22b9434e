//! Fourth-order Butterworth low-pass, realized as two cascaded biquad sections.
//!
//! Grounded on the source's `scipy.signal.butter(4, high_norm, btype='lowpass')`
//! with a persistent `lfilter` state (`zi`): a cascade of two second-order
//! sections with the canonical order-4 Butterworth Q factors reproduces the
//! same transfer function, and `biquad::DirectForm2Transposed` carries its own
//! state across calls the way `zi` does.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type};

/// Q factors for the two second-order sections of a 4th-order Butterworth filter.
const SECTION_Q: [f32; 2] = [0.54119610, 1.30656296];

/// A 4th-order Butterworth low-pass with persistent filter state.
///
/// If the requested cutoff can't be represented at the given sample rate
/// (cutoff at or above Nyquist), the filter degrades to pass-through rather
/// than failing the audio thread — matching the source's own fallback.
pub struct LowPassFilter {
    sections: Option<[DirectForm2Transposed<f32>; 2]>,
}

impl LowPassFilter {
    /// `cutoff_hz` is clamped to `0.99 * nyquist` before filter design, mirroring
    /// the source's `min(high_hz / nyq, 0.99)`.
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let nyquist = sample_rate / 2.0;
        let normalized_cutoff = cutoff_hz.min(0.99 * nyquist).max(1.0);

        let sections = SECTION_Q
            .into_iter()
            .map(|q| Coefficients::<f32>::from_params(Type::LowPass, sample_rate.hz(), normalized_cutoff.hz(), q))
            .collect::<Result<Vec<_>, _>>()
            .ok()
            .and_then(|coeffs| {
                let mut iter = coeffs.into_iter();
                let a = DirectForm2Transposed::<f32>::new(iter.next()?);
                let b = DirectForm2Transposed::<f32>::new(iter.next()?);
                Some([a, b])
            });

        if sections.is_none() {
            log::warn!("low-pass filter construction failed (cutoff={cutoff_hz}Hz, sr={sample_rate}Hz); degrading to pass-through");
        }

        Self { sections }
    }

    /// Unconditional pass-through filter, used in tests and as the explicit
    /// fallback the source falls back to (`self.b = [1.0]`).
    pub fn pass_through() -> Self {
        Self { sections: None }
    }

    /// Filter one sample, preserving state across calls.
    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        match &mut self.sections {
            Some([a, b]) => b.run(a.run(x)),
            None => x,
        }
    }

    /// Filter a whole block in place.
    pub fn process_block(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuates_high_frequency_more_than_low_frequency() {
        let sample_rate = 48_000.0;
        let mut low_filter = LowPassFilter::new(170.0, sample_rate);
        let mut high_filter = LowPassFilter::new(170.0, sample_rate);

        let low_tone: Vec<f32> =
            (0..2048).map(|n| (2.0 * std::f32::consts::PI * 60.0 * n as f32 / sample_rate).sin()).collect();
        let high_tone: Vec<f32> =
            (0..2048).map(|n| (2.0 * std::f32::consts::PI * 4000.0 * n as f32 / sample_rate).sin()).collect();

        let low_rms: f32 = {
            let mut block = low_tone.clone();
            low_filter.process_block(&mut block);
            (block.iter().map(|x| x * x).sum::<f32>() / block.len() as f32).sqrt()
        };
        let high_rms: f32 = {
            let mut block = high_tone.clone();
            high_filter.process_block(&mut block);
            (block.iter().map(|x| x * x).sum::<f32>() / block.len() as f32).sqrt()
        };

        assert!(low_rms > high_rms);
    }

    #[test]
    fn pass_through_is_identity() {
        let mut filter = LowPassFilter::pass_through();
        let mut block = vec![0.1, -0.2, 0.3];
        let original = block.clone();
        filter.process_block(&mut block);
        assert_eq!(block, original);
    }

    #[test]
    fn degrades_gracefully_when_cutoff_exceeds_nyquist() {
        let filter = LowPassFilter::new(100_000.0, 8_000.0);
        assert!(filter.sections.is_some(), "clamped cutoff should still construct a valid filter");
    }
}
