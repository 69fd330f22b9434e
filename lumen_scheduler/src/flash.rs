//! Flash record (§3): per-fixture priority override that decays linearly from
//! a captured start color into a captured target color.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FlashRecord {
    pub start_channels: [u8; 4],
    pub target_channels: [u8; 4],
    pub duration: Duration,
    pub started_at: Instant,
}

impl FlashRecord {
    pub fn new(start_channels: [u8; 4], target_channels: [u8; 4], duration: Duration, started_at: Instant) -> Self {
        Self { start_channels, target_channels, duration, started_at }
    }

    /// Progress `p = elapsed / duration`, not clamped to `[0,1]` by itself;
    /// callers treat `p >= 1` as "complete".
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        now.saturating_duration_since(self.started_at).as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Channel-wise linear interpolation from `start_channels` toward
    /// `target_channels` at progress `p`, clamped to `[0,1]`.
    pub fn interpolate(&self, now: Instant) -> [u8; 4] {
        let p = self.progress(now).clamp(0.0, 1.0);
        std::array::from_fn(|i| {
            let start = self.start_channels[i] as f32;
            let target = self.target_channels[i] as f32;
            (start + (target - start) * p).round().clamp(0.0, 255.0) as u8
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_toward_target_over_time() {
        let t0 = Instant::now();
        let flash = FlashRecord::new([255, 255, 255, 255], [200, 0, 0, 0], Duration::from_millis(200), t0);
        assert_eq!(flash.interpolate(t0), [255, 255, 255, 255]);
        let mid = flash.interpolate(t0 + Duration::from_millis(100));
        assert_eq!(mid, [228, 128, 128, 128]);
        assert_eq!(flash.interpolate(t0 + Duration::from_millis(200)), [200, 0, 0, 0]);
    }

    #[test]
    fn is_complete_once_duration_elapses() {
        let t0 = Instant::now();
        let flash = FlashRecord::new([255; 4], [0; 4], Duration::from_millis(50), t0);
        assert!(!flash.is_complete(t0 + Duration::from_millis(49)));
        assert!(flash.is_complete(t0 + Duration::from_millis(51)));
    }
}
