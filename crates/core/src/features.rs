//! Fixed-dimension feature vector fed to the scoring stage.
//!
//! Layout: 13 MFCC coefficients, 7 importance-weighted prosodic scalars, then
//! the 2 strongest formants (weighted). HNR and voice-onset time stay out of
//! the vector; they feed the heuristic thresholds only. Construction
//! validates dimension and finiteness; a vector that fails either check
//! aborts the analysis.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::mfcc::NUM_COEFFICIENTS;
use crate::prosody::AcousticFeatures;

/// Expected feature vector dimension: 13 MFCC + 7 prosodic + 2 formants.
pub const FEATURE_VECTOR_LEN: usize = NUM_COEFFICIENTS + 7 + 2;

/// Importance weights for the 7 prosodic scalars, in vector order:
/// pitch, energy, centroid, ZCR, rolloff, jitter, shimmer.
/// Weights also rescale raw units into comparable ranges.
pub const PROSODIC_WEIGHTS: [f32; 7] = [0.01, 1.0, 0.001, 1.0, 0.0005, 2.0, 2.0];

/// Importance weight applied to each of the two retained formants.
pub const FORMANT_WEIGHT: f32 = 0.001;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// Build the vector from pooled MFCCs and prosodic features.
    pub fn from_parts(mfcc: &[f32], features: &AcousticFeatures) -> Result<Self, AnalysisError> {
        let prosodic = [
            features.pitch_hz,
            features.energy,
            features.spectral_centroid_hz,
            features.zero_crossing_rate,
            features.spectral_rolloff_hz,
            features.jitter,
            features.shimmer,
        ];

        let mut values = Vec::with_capacity(FEATURE_VECTOR_LEN);
        values.extend_from_slice(mfcc);
        values.extend(prosodic.iter().zip(PROSODIC_WEIGHTS).map(|(&v, w)| v * w));
        values.push(features.formant_frequencies[0] * FORMANT_WEIGHT);
        values.push(features.formant_frequencies[1] * FORMANT_WEIGHT);

        Self::from_values(values)
    }

    /// Validate an already-assembled vector.
    pub fn from_values(values: Vec<f32>) -> Result<Self, AnalysisError> {
        if values.len() != FEATURE_VECTOR_LEN {
            return Err(AnalysisError::InvalidFeatureVector {
                expected: FEATURE_VECTOR_LEN,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidFeatureValues);
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> AcousticFeatures {
        AcousticFeatures {
            pitch_hz: 180.0,
            energy: 0.4,
            spectral_centroid_hz: 1500.0,
            zero_crossing_rate: 0.12,
            spectral_rolloff_hz: 3200.0,
            jitter: 0.02,
            shimmer: 0.04,
            formant_frequencies: [620.0, 1700.0, 0.0],
            harmonic_to_noise_ratio_db: 12.0,
            voice_onset_time_secs: 0.05,
        }
    }

    #[test]
    fn from_parts_yields_expected_dimension() {
        let mfcc = vec![0.5f32; NUM_COEFFICIENTS];
        let vector = FeatureVector::from_parts(&mfcc, &features()).unwrap();
        assert_eq!(vector.len(), FEATURE_VECTOR_LEN);
    }

    #[test]
    fn wrong_length_is_rejected_with_dimensions() {
        let err = FeatureVector::from_values(vec![0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidFeatureVector {
                expected: FEATURE_VECTOR_LEN,
                actual: 7
            }
        );
    }

    #[test]
    fn nan_element_is_rejected() {
        let mut values = vec![0.0f32; FEATURE_VECTOR_LEN];
        values[3] = f32::NAN;
        let err = FeatureVector::from_values(values).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidFeatureValues);
    }

    #[test]
    fn infinite_element_is_rejected() {
        let mut values = vec![0.0f32; FEATURE_VECTOR_LEN];
        values[FEATURE_VECTOR_LEN - 1] = f32::INFINITY;
        let err = FeatureVector::from_values(values).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidFeatureValues);
    }
}
