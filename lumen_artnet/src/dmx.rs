//! DMX Frame Buffer (C2): a thread-safe 512-byte universe with dirty tracking
//! and a continuous refresh pump. Grounded on the source's `DMXController`
//! (buffer + lock + refresh thread at a fixed rate, forcing a keep-alive send
//! once a second).

use crate::codec::{ArtnetSender, DMX_UNIVERSE_SIZE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Universe {
    data: [u8; DMX_UNIVERSE_SIZE],
    last_sent: [u8; DMX_UNIVERSE_SIZE],
    last_sent_at: Option<Instant>,
}

impl Universe {
    fn new() -> Self {
        Self { data: [0; DMX_UNIVERSE_SIZE], last_sent: [0; DMX_UNIVERSE_SIZE], last_sent_at: None }
    }
}

/// Shared handle to the DMX universe, cloned across the scheduler thread and
/// the refresh thread. Cheap to clone (`Arc` of a small mutex).
#[derive(Clone)]
pub struct DmxFrameBuffer {
    universe: Arc<Mutex<Universe>>,
}

impl DmxFrameBuffer {
    pub fn new() -> Self {
        Self { universe: Arc::new(Mutex::new(Universe::new())) }
    }

    /// Set a single DMX channel (`addr` in `[0,511]`), clamped to `[0,255]`.
    /// Out-of-range addresses are ignored (§7 "address-out-of-range").
    pub fn set(&self, addr: usize, value: u8, force: bool) {
        if addr >= DMX_UNIVERSE_SIZE {
            log::warn!("dropped DMX write: address {addr} out of range [0,511]");
            return;
        }
        let mut universe = self.universe.lock().expect("dmx universe mutex poisoned");
        if force || universe.data[addr] != value {
            universe.data[addr] = value;
        }
    }

    /// Write four contiguous RGBW channels starting at `base` (already
    /// resolved to an absolute DMX index), clamped and range-checked
    /// per-channel so one bad offset doesn't drop the whole fixture write.
    pub fn apply_fixture(&self, base: usize, rgbw: [u8; 4], force: bool) {
        for (i, value) in rgbw.into_iter().enumerate() {
            self.set(base + i, value, force);
        }
    }

    /// Snapshot the universe for transmission.
    pub fn snapshot(&self) -> [u8; DMX_UNIVERSE_SIZE] {
        self.universe.lock().expect("dmx universe mutex poisoned").data
    }

    fn should_emit(&self, now: Instant, keep_alive: Duration) -> Option<[u8; DMX_UNIVERSE_SIZE]> {
        let mut universe = self.universe.lock().expect("dmx universe mutex poisoned");
        let changed = universe.data != universe.last_sent;
        let stale = universe.last_sent_at.is_none_or(|t| now.duration_since(t) >= keep_alive);
        if changed || stale {
            universe.last_sent = universe.data;
            universe.last_sent_at = Some(now);
            Some(universe.last_sent)
        } else {
            None
        }
    }

    /// All channels to zero, used on `stop_sequence` and on shutdown.
    pub fn clear(&self) {
        let mut universe = self.universe.lock().expect("dmx universe mutex poisoned");
        universe.data = [0; DMX_UNIVERSE_SIZE];
    }
}

impl Default for DmxFrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the `T-dmx-refresh` loop: wake at `refresh_hz`, emit a frame if the
/// universe changed or the 1s keep-alive elapsed, and retry silently on the
/// next tick if the send fails.
pub fn run_refresh_loop(
    buffer: DmxFrameBuffer,
    sender: ArtnetSender,
    refresh_hz: u32,
    running: Arc<AtomicBool>,
) {
    let period = Duration::from_secs_f64(1.0 / refresh_hz.max(1) as f64);
    let keep_alive = Duration::from_secs(1);

    while running.load(Ordering::Relaxed) {
        let now = Instant::now();
        if let Some(frame) = buffer.should_emit(now, keep_alive) {
            if let Err(err) = sender.send(&frame) {
                log::warn!("Art-Net send failed: {err}");
            }
        }
        std::thread::sleep(period);
    }

    buffer.clear();
    if let Some(frame) = buffer.should_emit(Instant::now(), Duration::ZERO) {
        let _ = sender.send(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_out_of_range_address_without_panicking() {
        let buffer = DmxFrameBuffer::new();
        buffer.set(DMX_UNIVERSE_SIZE, 255, true);
        assert_eq!(buffer.snapshot(), [0u8; DMX_UNIVERSE_SIZE]);
    }

    #[test]
    fn apply_fixture_writes_four_contiguous_channels() {
        let buffer = DmxFrameBuffer::new();
        buffer.apply_fixture(10, [200, 0, 0, 0], true);
        let snapshot = buffer.snapshot();
        assert_eq!(&snapshot[10..14], &[200, 0, 0, 0]);
    }

    #[test]
    fn clear_zeroes_the_whole_universe() {
        let buffer = DmxFrameBuffer::new();
        buffer.apply_fixture(0, [255, 255, 255, 255], true);
        buffer.clear();
        assert_eq!(buffer.snapshot(), [0u8; DMX_UNIVERSE_SIZE]);
    }

    #[test]
    fn should_emit_only_on_change_or_keepalive() {
        let buffer = DmxFrameBuffer::new();
        let t0 = Instant::now();
        assert!(buffer.should_emit(t0, Duration::from_secs(1)).is_some(), "first emit always happens");
        assert!(buffer.should_emit(t0 + Duration::from_millis(10), Duration::from_secs(1)).is_none());
        buffer.set(0, 42, true);
        assert!(buffer.should_emit(t0 + Duration::from_millis(20), Duration::from_secs(1)).is_some());
        assert!(buffer
            .should_emit(t0 + Duration::from_millis(1100), Duration::from_secs(1))
            .is_some(), "keep-alive fires after 1s even without changes");
    }
}
