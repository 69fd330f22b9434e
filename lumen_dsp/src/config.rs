//! Runtime configuration for the analysis pipeline (§6 "Config knobs").

use crate::fade::FadeConfig;
use crate::kick::KickConfig;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub chunk_len: usize,
    pub sample_rate: f32,
    pub smoothing_alpha: f32,
    pub kick: KickConfig,
    pub fade: FadeConfig,
    pub sustained_stability_threshold: f32,
}

impl AnalysisConfig {
    pub fn new(chunk_len: usize, sample_rate: f32) -> Self {
        Self {
            chunk_len,
            sample_rate,
            smoothing_alpha: 0.4,
            kick: KickConfig::default(),
            fade: FadeConfig::default(),
            sustained_stability_threshold: 0.1,
        }
    }
}
