//! Pretrained-model boundary.
//!
//! The scoring stage is polymorphic over `ScoreFeatures`: the heuristic
//! scorer and an optional pretrained model are interchangeable at pipeline
//! construction time. A model that cannot be loaded degrades to the heuristic
//! path; it is never surfaced to the caller as an analysis failure.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::features::{FeatureVector, FEATURE_VECTOR_LEN};
use crate::prosody::AcousticFeatures;
use crate::scoring::{AcousticScore, Emotion, EmotionScores};

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model dimension mismatch: expected {expected} weights per category, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model is missing weights for {0:?}")]
    MissingCategory(Emotion),
}

/// Capability the pipeline needs from any scoring backend.
///
/// The heuristic path reads the raw acoustic features; model-backed
/// implementations predict over the fixed-dimension feature vector.
pub trait ScoreFeatures: Send + Sync {
    fn score_features(
        &self,
        features: &AcousticFeatures,
        vector: &FeatureVector,
    ) -> Result<AcousticScore, AnalysisError>;
}

/// One affine row of the linear model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryWeights {
    pub emotion: Emotion,
    pub weights: Vec<f32>,
    pub bias: f32,
}

/// Serialized form of a pretrained linear classifier over the feature vector.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinearModelSpec {
    pub version: u32,
    pub categories: Vec<CategoryWeights>,
}

/// Linear softmax classifier over the 22-dimension feature vector.
///
/// Loaded once at startup and read-only afterwards; safe to share across
/// concurrent analyses.
#[derive(Clone, Debug)]
pub struct LinearModel {
    spec: LinearModelSpec,
}

impl LinearModel {
    pub fn from_spec(spec: LinearModelSpec) -> Result<Self, ModelError> {
        for &emotion in &Emotion::ALL {
            let row = spec
                .categories
                .iter()
                .find(|c| c.emotion == emotion)
                .ok_or(ModelError::MissingCategory(emotion))?;
            if row.weights.len() != FEATURE_VECTOR_LEN {
                return Err(ModelError::DimensionMismatch {
                    expected: FEATURE_VECTOR_LEN,
                    actual: row.weights.len(),
                });
            }
        }
        Ok(Self { spec })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let spec: LinearModelSpec = serde_json::from_reader(reader)?;
        Self::from_spec(spec)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn version(&self) -> u32 {
        self.spec.version
    }

    fn logits(&self, vector: &FeatureVector) -> Vec<(Emotion, f64)> {
        self.spec
            .categories
            .iter()
            .map(|row| {
                let dot: f32 = row
                    .weights
                    .iter()
                    .zip(vector.as_slice())
                    .map(|(w, v)| w * v)
                    .sum();
                (row.emotion, f64::from(dot + row.bias))
            })
            .collect()
    }
}

impl ScoreFeatures for LinearModel {
    fn score_features(
        &self,
        _features: &AcousticFeatures,
        vector: &FeatureVector,
    ) -> Result<AcousticScore, AnalysisError> {
        let logits = self.logits(vector);
        if logits.iter().any(|(_, l)| !l.is_finite()) {
            return Err(AnalysisError::InvalidModelOutput(
                "non-finite logit".to_owned(),
            ));
        }

        // Stabilized softmax.
        let max_logit = logits
            .iter()
            .map(|&(_, l)| l)
            .fold(f64::NEG_INFINITY, f64::max);
        let mut scores = EmotionScores::zeros();
        for &(emotion, logit) in &logits {
            scores.set(emotion, (logit - max_logit).exp());
        }
        let raw_sum = scores.total();
        if raw_sum <= 0.0 || !raw_sum.is_finite() {
            return Err(AnalysisError::InvalidModelOutput(
                "degenerate softmax denominator".to_owned(),
            ));
        }
        scores.normalize();

        let pre_override_max = scores.primary().1;
        Ok(AcousticScore {
            scores,
            // Softmax mass is already normalized; report full evidence so the
            // weak-evidence penalty of the confidence formula stays off.
            raw_sum: 1.0,
            pre_override_max,
            degenerate: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SCORE_SUM_TOLERANCE;

    fn features() -> AcousticFeatures {
        AcousticFeatures {
            pitch_hz: 200.0,
            energy: 0.5,
            spectral_centroid_hz: 1800.0,
            zero_crossing_rate: 0.15,
            spectral_rolloff_hz: 3000.0,
            jitter: 0.1,
            shimmer: 0.1,
            formant_frequencies: [600.0, 1200.0, 0.0],
            harmonic_to_noise_ratio_db: 12.0,
            voice_onset_time_secs: 0.05,
        }
    }

    fn spec_with(joy_bias: f32) -> LinearModelSpec {
        LinearModelSpec {
            version: 1,
            categories: Emotion::ALL
                .iter()
                .map(|&emotion| CategoryWeights {
                    emotion,
                    weights: vec![0.0; FEATURE_VECTOR_LEN],
                    bias: if emotion == Emotion::Joy { joy_bias } else { 0.0 },
                })
                .collect(),
        }
    }

    #[test]
    fn missing_category_is_rejected_at_load() {
        let mut spec = spec_with(0.0);
        spec.categories.retain(|c| c.emotion != Emotion::Disgust);
        assert!(matches!(
            LinearModel::from_spec(spec),
            Err(ModelError::MissingCategory(Emotion::Disgust))
        ));
    }

    #[test]
    fn wrong_dimension_is_rejected_at_load() {
        let mut spec = spec_with(0.0);
        spec.categories[0].weights.truncate(5);
        assert!(matches!(
            LinearModel::from_spec(spec),
            Err(ModelError::DimensionMismatch { expected: FEATURE_VECTOR_LEN, actual: 5 })
        ));
    }

    #[test]
    fn prediction_is_a_distribution_favoring_biased_category() {
        let model = LinearModel::from_spec(spec_with(2.0)).unwrap();
        let vector =
            FeatureVector::from_values(vec![0.1; FEATURE_VECTOR_LEN]).unwrap();
        let score = model.score_features(&features(), &vector).unwrap();
        assert!((score.scores.total() - 1.0).abs() < SCORE_SUM_TOLERANCE);
        assert_eq!(score.scores.primary().0, Emotion::Joy);
        assert!(!score.degenerate);
    }

    #[test]
    fn model_spec_round_trips_through_json() {
        let spec = spec_with(1.5);
        let json = serde_json::to_string(&spec).unwrap();
        let model = LinearModel::from_reader(json.as_bytes()).unwrap();
        assert_eq!(model.version(), 1);
    }
}
