//! The end-to-end analysis pipeline.
//!
//! A dependency-injected object built from `PipelineConfig`; every `analyze`
//! call is a pure, synchronous function of its input buffer and transcript.
//! The only shared state is the read-only scoring backend handle, so
//! concurrent analyses over independent buffers need no locking.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::{PipelineConfig, ConfigError, MAX_DURATION_SECS, MIN_DURATION_SECS};
use crate::error::AnalysisError;
use crate::features::FeatureVector;
use crate::fusion::{FusionEngine, FusionStrategy};
use crate::mfcc::MfccExtractor;
use crate::model::{LinearModel, ScoreFeatures};
use crate::prosody::{AcousticFeatures, ProsodicFeatureExtractor};
use crate::quality::{AudioQuality, QualityAssessor};
use crate::scoring::{
    AcousticEmotionScorer, Emotion, EmotionScores, LinguisticEmotionScorer, SubEmotion,
    SubEmotionScores,
};

/// Ordinal intensity derived from the primary score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Intensity {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 0.4 => Intensity::Low,
            s if s < 0.6 => Intensity::Moderate,
            s if s < 0.8 => Intensity::High,
            _ => Intensity::Extreme,
        }
    }
}

/// Final result of one `analyze` call. Immutable after construction;
/// downstream consumers (persistence, UI) read it as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub timestamp: SystemTime,
    pub primary_emotion: Emotion,
    pub sub_emotion: SubEmotion,
    pub intensity: Intensity,
    pub confidence: f64,
    pub scores: EmotionScores,
    pub sub_emotion_scores: SubEmotionScores,
    pub quality: AudioQuality,
    pub fusion_strategy: FusionStrategy,
    pub session_duration: Duration,
    pub features: AcousticFeatures,
}

pub struct EmotionPipeline {
    sample_rate: u32,
    prosody: ProsodicFeatureExtractor,
    mfcc: MfccExtractor,
    quality: QualityAssessor,
    heuristic: AcousticEmotionScorer,
    scorer: Arc<dyn ScoreFeatures>,
    linguistic: LinguisticEmotionScorer,
    fusion: FusionEngine,
}

impl EmotionPipeline {
    /// Pipeline over the heuristic scoring path.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let heuristic = AcousticEmotionScorer::new(config.tables.clone());
        let scorer: Arc<dyn ScoreFeatures> = Arc::new(heuristic.clone());
        Self::assemble(config, heuristic, scorer)
    }

    /// Pipeline over an explicit scoring backend (e.g. a pretrained model).
    /// The heuristic tables are still used for sub-emotion resolution and
    /// confidence calculation.
    pub fn with_model(
        config: PipelineConfig,
        model: Arc<dyn ScoreFeatures>,
    ) -> Result<Self, ConfigError> {
        let heuristic = AcousticEmotionScorer::new(config.tables.clone());
        Self::assemble(config, heuristic, model)
    }

    /// Try to load a pretrained model; fall back to the heuristic path when
    /// the model is unavailable. A missing model is degradation, not failure.
    pub fn with_model_file<P: AsRef<std::path::Path>>(
        config: PipelineConfig,
        path: P,
    ) -> Result<Self, ConfigError> {
        match LinearModel::from_json_file(&path) {
            Ok(model) => {
                tracing::info!(version = model.version(), "pretrained model loaded");
                Self::with_model(config, Arc::new(model))
            }
            Err(e) => {
                tracing::warn!(error = %e, "pretrained model unavailable, using heuristic scorer");
                Self::new(config)
            }
        }
    }

    fn assemble(
        config: PipelineConfig,
        heuristic: AcousticEmotionScorer,
        scorer: Arc<dyn ScoreFeatures>,
    ) -> Result<Self, ConfigError> {
        config.tables.validate()?;
        let sample_rate = config.sample_rate.hz();
        Ok(Self {
            sample_rate,
            prosody: ProsodicFeatureExtractor::new(sample_rate),
            mfcc: MfccExtractor::new(sample_rate),
            quality: QualityAssessor::new(),
            heuristic,
            scorer,
            linguistic: LinguisticEmotionScorer::new(),
            fusion: FusionEngine::new(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Analyze one recording.
    ///
    /// Input violations (duration bounds, malformed samples, bad feature
    /// vectors) abort the whole analysis; there are no partial results. A
    /// failed linguistic channel and low audio quality only degrade the
    /// outcome.
    pub fn analyze(
        &self,
        samples: &[f32],
        transcript: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidAudioFormat("empty sample buffer".to_owned()));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(AnalysisError::InvalidAudioFormat(
                "sample buffer contains non-finite values".to_owned(),
            ));
        }

        let duration_secs = samples.len() as f64 / f64::from(self.sample_rate);
        if duration_secs < MIN_DURATION_SECS {
            return Err(AnalysisError::AudioTooShort {
                actual_secs: duration_secs,
                min_secs: MIN_DURATION_SECS,
            });
        }
        if duration_secs > MAX_DURATION_SECS {
            return Err(AnalysisError::AudioTooLong {
                actual_secs: duration_secs,
                max_secs: MAX_DURATION_SECS,
            });
        }

        let features = self.prosody.extract(samples);
        let mfcc = self.mfcc.extract(samples)?;
        let vector = FeatureVector::from_parts(&mfcc, &features)?;
        let quality = self.quality.assess(samples);

        let acoustic = self.scorer.score_features(&features, &vector)?;
        let acoustic_confidence = self.heuristic.confidence(&acoustic, quality, duration_secs);

        let linguistic = match transcript {
            None => None,
            Some(text) => match self.linguistic.score(text) {
                Ok(score) => Some(score),
                Err(e) => {
                    tracing::warn!(error = %e, "linguistic channel failed, acoustic-only fusion");
                    None
                }
            },
        };

        let outcome = self.fusion.fuse(&acoustic.scores, acoustic_confidence, linguistic.as_ref());
        let (primary_emotion, primary_score) = outcome.scores.primary();
        let (sub_emotion, sub_emotion_scores) =
            self.heuristic.resolve_sub_emotions(&outcome.scores);

        Ok(AnalysisResult {
            timestamp: SystemTime::now(),
            primary_emotion,
            sub_emotion,
            intensity: Intensity::from_score(primary_score),
            confidence: outcome.confidence.clamp(0.1, 0.98),
            scores: outcome.scores,
            sub_emotion_scores,
            quality,
            fusion_strategy: outcome.strategy,
            session_duration: Duration::from_secs_f64(duration_secs),
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SCORE_SUM_TOLERANCE;
    use std::f32::consts::PI;

    const SAMPLE_RATE: u32 = 16_000;

    fn pipeline() -> EmotionPipeline {
        EmotionPipeline::new(PipelineConfig::default()).unwrap()
    }

    fn sine(freq: f32, secs: f64, amplitude: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f64 * secs) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    #[test]
    fn one_second_is_accepted() {
        let result = pipeline().analyze(&sine(220.0, 1.0, 0.5), None);
        assert!(result.is_ok());
    }

    #[test]
    fn just_under_one_second_is_too_short() {
        let err = pipeline().analyze(&sine(220.0, 0.99, 0.5), None).unwrap_err();
        assert!(matches!(err, AnalysisError::AudioTooShort { .. }));
    }

    #[test]
    fn over_two_minutes_is_too_long() {
        let samples = vec![0.1f32; (SAMPLE_RATE as f64 * 120.01) as usize];
        let err = pipeline().analyze(&samples, None).unwrap_err();
        assert!(matches!(err, AnalysisError::AudioTooLong { .. }));
    }

    #[test]
    fn exactly_two_minutes_is_accepted() {
        let n = SAMPLE_RATE as usize * 120;
        let samples: Vec<f32> = (0..n)
            .map(|i| 0.4 * (2.0 * PI * 200.0 * i as f32 / SAMPLE_RATE as f32).sin())
            .collect();
        assert!(pipeline().analyze(&samples, None).is_ok());
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let mut samples = sine(220.0, 1.0, 0.5);
        samples[100] = f32::NAN;
        let err = pipeline().analyze(&samples, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidAudioFormat(_)));
    }

    #[test]
    fn silent_buffer_is_poor_quality_neutral_low_confidence() {
        let samples = vec![0.0f32; SAMPLE_RATE as usize * 2];
        let result = pipeline().analyze(&samples, None).unwrap();
        assert_eq!(result.quality, AudioQuality::Poor);
        assert_eq!(result.scores, EmotionScores::degenerate_neutral());
        assert_eq!(result.primary_emotion, Emotion::Neutral);
        assert!(result.confidence <= 0.4);
    }

    #[test]
    fn scores_always_sum_to_one() {
        let result = pipeline()
            .analyze(&sine(220.0, 2.0, 0.5), Some("what a wonderful happy day this is"))
            .unwrap();
        assert!((result.scores.total() - 1.0).abs() < SCORE_SUM_TOLERANCE);
    }

    #[test]
    fn failed_linguistic_channel_matches_acoustic_only_result() {
        let samples = sine(220.0, 2.0, 0.5);
        let p = pipeline();
        // One word: the linguistic channel fails with InsufficientSpeech and
        // fusion must fall back to rule 1.
        let with_bad_transcript = p.analyze(&samples, Some("hello")).unwrap();
        let without = p.analyze(&samples, None).unwrap();
        assert_eq!(with_bad_transcript.scores, without.scores);
        assert_eq!(with_bad_transcript.fusion_strategy, FusionStrategy::AcousticOnly);
    }

    #[test]
    fn confident_transcript_steers_the_result() {
        let samples = sine(220.0, 2.0, 0.5);
        let result = pipeline()
            .analyze(
                &samples,
                Some("I am so happy and excited, this wonderful day fills me with joy and love"),
            )
            .unwrap();
        assert_eq!(result.primary_emotion, Emotion::Joy);
    }

    #[test]
    fn analysis_is_deterministic_apart_from_timestamp() {
        let samples = sine(180.0, 3.0, 0.4);
        let p = pipeline();
        let a = p.analyze(&samples, Some("an ordinary day nothing special")).unwrap();
        let b = p.analyze(&samples, Some("an ordinary day nothing special")).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.sub_emotion_scores, b.sub_emotion_scores);
        assert_eq!(a.primary_emotion, b.primary_emotion);
        assert_eq!(a.sub_emotion, b.sub_emotion);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.features, b.features);
        assert_eq!(a.quality, b.quality);
    }

    #[test]
    fn sub_emotion_belongs_to_primary_category() {
        let result = pipeline().analyze(&sine(220.0, 2.0, 0.5), None).unwrap();
        assert_eq!(result.sub_emotion.category(), result.primary_emotion);
    }

    #[test]
    fn confidence_is_always_clamped() {
        let p = pipeline();
        for transcript in [None, Some("I am so happy and thrilled and excited today")] {
            let result = p.analyze(&sine(220.0, 2.0, 0.5), transcript).unwrap();
            assert!((0.1..=0.98).contains(&result.confidence));
        }
    }

    #[test]
    fn result_serializes_to_json() {
        let result = pipeline().analyze(&sine(220.0, 1.5, 0.5), None).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("primary_emotion"));
    }
}
