use crate::models::VibeResult;
use serde::Serialize;

/// Top of Deezer's rank scale
const MAX_DEEZER_RANK: f64 = 1_000_000.0;
const DEFAULT_ENERGY: f64 = 60.0;
const DEFAULT_TEMPO: f64 = 50.0;
// No mood signal exists in the search data
const NEUTRAL_MOOD: f64 = 75.0;

/// Four 0-100 values summarising a result for the vibe chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VibeMetrics {
    pub energy: f64,
    pub popularity: f64,
    pub tempo: f64,
    pub mood: f64,
}

impl VibeMetrics {
    pub fn from_result(result: &VibeResult) -> Self {
        let bpm_min = result.params.bpm_min.map(f64::from);

        VibeMetrics {
            energy: bpm_min.map_or(DEFAULT_ENERGY, |bpm| scale(bpm, 180.0)),
            popularity: Self::popularity(result),
            tempo: bpm_min.map_or(DEFAULT_TEMPO, |bpm| scale(bpm, 200.0)),
            mood: NEUTRAL_MOOD,
        }
    }

    /// Mean rank as a percentage of the maximum rank; 0 when there are no tracks
    fn popularity(result: &VibeResult) -> f64 {
        if result.tracks.is_empty() {
            return 0.0;
        }
        let total: f64 = result.tracks.iter().map(|t| t.rank as f64).sum();
        let mean = total / result.tracks.len() as f64;
        scale(mean, MAX_DEEZER_RANK)
    }
}

fn scale(value: f64, full: f64) -> f64 {
    (value / full * 100.0).clamp(0.0, 100.0)
}
