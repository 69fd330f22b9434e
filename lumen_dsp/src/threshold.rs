//! Adaptive per-band threshold (part of C8). Grounded on the spec's median +
//! 0.15·IQR proposal with a rate-limited, clamped random walk toward it.

use std::collections::VecDeque;

const HISTORY_LEN: usize = 300;
const IQR_WEIGHT: f32 = 0.15;
const MAX_STEP_PER_UPDATE: f32 = 0.03;
const MIN_THRESHOLD: f32 = 0.05;
const MAX_THRESHOLD: f32 = 0.70;
const DEFAULT_THRESHOLD: f32 = 0.2;

pub struct AdaptiveThreshold {
    history: VecDeque<f32>,
    current: f32,
    auto: bool,
}

impl AdaptiveThreshold {
    pub fn new() -> Self {
        Self { history: VecDeque::with_capacity(HISTORY_LEN), current: DEFAULT_THRESHOLD, auto: true }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// A manually-set threshold disables further automatic updates until
    /// `set_auto(true)` is called again.
    pub fn set_manual(&mut self, value: f32) {
        self.current = value.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        self.auto = false;
    }

    pub fn set_auto(&mut self, auto: bool) {
        self.auto = auto;
    }

    /// Feed one more smoothed band level and, once enough history has
    /// accumulated, nudge the threshold toward `median + 0.15*IQR`.
    pub fn update(&mut self, level: f32) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(level);

        if !self.auto || self.history.len() < HISTORY_LEN {
            return;
        }

        let (median, iqr) = median_and_iqr(&self.history);
        let proposal = (median + IQR_WEIGHT * iqr).clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        let delta = (proposal - self.current).clamp(-MAX_STEP_PER_UPDATE, MAX_STEP_PER_UPDATE);
        self.current = (self.current + delta).clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    }
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self::new()
    }
}

fn median_and_iqr(values: &VecDeque<f32>) -> (f32, f32) {
    let mut sorted: Vec<f32> = values.iter().copied().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let median = sorted[n / 2];
    let q1 = sorted[n / 4];
    let q3 = sorted[(3 * n) / 4];
    (median, q3 - q1)
}
