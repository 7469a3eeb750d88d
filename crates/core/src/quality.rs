//! Composite signal-quality scoring.
//!
//! Pure function of the sample buffer. Quality never fails an analysis; it
//! only scales the confidence of the scoring stage.

use serde::{Deserialize, Serialize};

use crate::prosody::{rms, zero_crossing_rate};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AudioQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl AudioQuality {
    /// Reliability multiplier applied to the acoustic confidence.
    pub fn confidence_multiplier(self) -> f64 {
        match self {
            AudioQuality::Poor => 0.5,
            AudioQuality::Fair => 0.7,
            AudioQuality::Good => 0.85,
            AudioQuality::Excellent => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct QualityAssessor;

impl QualityAssessor {
    pub fn new() -> Self {
        Self
    }

    /// Point-based quality score over RMS, peak, SNR approximation and ZCR
    /// plausibility, mapped onto the four ordinal levels.
    pub fn assess(&self, samples: &[f32]) -> AudioQuality {
        let rms_level = rms(samples);
        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        let snr = snr_approximation(samples);
        let zcr = zero_crossing_rate(samples);

        let mut points = 0u8;
        points += match rms_level {
            r if r > 0.1 => 3,
            r if r > 0.05 => 2,
            r if r > 0.02 => 1,
            _ => 0,
        };
        points += match peak {
            p if p > 0.3 => 2,
            p if p > 0.2 => 1,
            _ => 0,
        };
        points += match snr {
            s if s > 10.0 => 2,
            s if s > 5.0 => 1,
            _ => 0,
        };
        if (0.1..=0.3).contains(&zcr) {
            points += 1;
        }

        match points {
            0..=2 => AudioQuality::Poor,
            3..=4 => AudioQuality::Fair,
            5..=6 => AudioQuality::Good,
            _ => AudioQuality::Excellent,
        }
    }
}

/// Ratio of the mean amplitude in the loudest 10% of samples to the mean
/// amplitude in the quietest 10%.
fn snr_approximation(samples: &[f32]) -> f32 {
    if samples.len() < 10 {
        return 0.0;
    }
    let mut magnitudes: Vec<f32> = samples.iter().map(|s| s.abs()).collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));

    let decile = magnitudes.len() / 10;
    let quiet: f32 = magnitudes[..decile].iter().sum::<f32>() / decile as f32;
    let loud: f32 = magnitudes[magnitudes.len() - decile..].iter().sum::<f32>() / decile as f32;

    if quiet > 0.0 {
        loud / quiet
    } else if loud > 0.0 {
        // Perfectly quiet floor under a real signal; treat as high SNR.
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn silent_buffer_is_poor() {
        let assessor = QualityAssessor::new();
        assert_eq!(assessor.assess(&vec![0.0; 16_000]), AudioQuality::Poor);
    }

    #[test]
    fn loud_clean_speechlike_signal_scores_high() {
        // 200 Hz carrier with amplitude 0.6: strong RMS, strong peak.
        let samples: Vec<f32> = (0..16_000)
            .map(|i| 0.6 * (2.0 * PI * 200.0 * i as f32 / 16_000.0).sin())
            .collect();
        let assessor = QualityAssessor::new();
        assert!(assessor.assess(&samples) >= AudioQuality::Fair);
    }

    #[test]
    fn quality_ordering_matches_multiplier_ordering() {
        let levels = [
            AudioQuality::Poor,
            AudioQuality::Fair,
            AudioQuality::Good,
            AudioQuality::Excellent,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].confidence_multiplier() < pair[1].confidence_multiplier());
        }
    }

    #[test]
    fn assessment_is_deterministic() {
        let samples: Vec<f32> = (0..8_000)
            .map(|i| 0.3 * (2.0 * PI * 150.0 * i as f32 / 16_000.0).sin())
            .collect();
        let assessor = QualityAssessor::new();
        assert_eq!(assessor.assess(&samples), assessor.assess(&samples));
    }
}
