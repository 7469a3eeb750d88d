//! Heuristic acoustic emotion scoring over the threshold tables.

use crate::features::FeatureVector;
use crate::prosody::AcousticFeatures;
use crate::quality::AudioQuality;
use crate::scoring::{Emotion, EmotionScores, ScoringTables, SubEmotion, SubEmotionScores};

/// Normalized primary scores below this are rejected outright and replaced by
/// the degenerate neutral map.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.4;

const SEPARATION_BONUS: f64 = 0.3;
const DURATION_BONUS_MAX: f64 = 0.15;
const DURATION_BONUS_FULL_SECS: f64 = 10.0;
const WEAK_EVIDENCE_SUM: f64 = 0.8;
const WEAK_EVIDENCE_PENALTY: f64 = 0.8;
const CONFIDENCE_MIN: f64 = 0.1;
const CONFIDENCE_MAX: f64 = 0.98;

/// Output of the acoustic channel, keeping the pre-override evidence the
/// confidence calculation needs.
#[derive(Clone, Debug, PartialEq)]
pub struct AcousticScore {
    pub scores: EmotionScores,
    /// Sum of raw per-category scores before normalization.
    pub raw_sum: f64,
    /// Highest normalized score before any low-confidence override.
    pub pre_override_max: f64,
    /// Whether the result was replaced by the degenerate neutral map.
    pub degenerate: bool,
}

#[derive(Clone, Debug)]
pub struct AcousticEmotionScorer {
    tables: ScoringTables,
}

impl AcousticEmotionScorer {
    pub fn new(tables: ScoringTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// Score the seven categories from raw acoustic features.
    ///
    /// Each category combines five range-membership contributions under its
    /// importance weights; the formant rule reads the strongest formant.
    pub fn score(&self, features: &AcousticFeatures) -> AcousticScore {
        let mut scores = EmotionScores::zeros();
        for &emotion in &Emotion::ALL {
            let profile = self.tables.profiles.get(emotion);
            let weights = &profile.weights;
            let weighted = profile.pitch.score(features.pitch_hz) * weights.pitch
                + profile.energy.score(features.energy) * weights.energy
                + profile.centroid.score(features.spectral_centroid_hz) * weights.centroid
                + profile.jitter.score(features.jitter) * weights.jitter
                + profile.formant.score(features.formant_frequencies[0]) * weights.formant;
            scores.set(emotion, weighted / weights.total());
        }

        let raw_sum = scores.total();
        if raw_sum <= 0.0 {
            return AcousticScore {
                scores: EmotionScores::degenerate_neutral(),
                raw_sum,
                pre_override_max: 0.0,
                degenerate: true,
            };
        }

        scores.normalize();
        let pre_override_max = scores.primary().1;
        if pre_override_max < LOW_CONFIDENCE_THRESHOLD {
            tracing::debug!(
                max = pre_override_max,
                "acoustic scores below rejection threshold, reporting neutral"
            );
            return AcousticScore {
                scores: EmotionScores::degenerate_neutral(),
                raw_sum,
                pre_override_max,
                degenerate: true,
            };
        }

        AcousticScore { scores, raw_sum, pre_override_max, degenerate: false }
    }

    /// Confidence in the acoustic channel.
    ///
    /// Separation between the top two categories earns a bonus, audio quality
    /// scales the whole estimate, long recordings earn up to +0.15, and weak
    /// pre-normalization evidence is penalized. Degenerate results are capped
    /// at the rejection threshold.
    pub fn confidence(
        &self,
        score: &AcousticScore,
        quality: AudioQuality,
        duration_secs: f64,
    ) -> f64 {
        if score.degenerate {
            let confidence = score.pre_override_max * quality.confidence_multiplier();
            return confidence.clamp(CONFIDENCE_MIN, LOW_CONFIDENCE_THRESHOLD);
        }

        let (_, primary) = score.scores.primary();
        let second = score.scores.second();
        let mut confidence = primary + SEPARATION_BONUS * (primary - second);
        confidence *= quality.confidence_multiplier();
        confidence +=
            DURATION_BONUS_MAX * (duration_secs / DURATION_BONUS_FULL_SECS).clamp(0.0, 1.0);
        if score.raw_sum < WEAK_EVIDENCE_SUM {
            confidence *= WEAK_EVIDENCE_PENALTY;
        }
        confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
    }

    /// Resolve all 42 sub-emotion scores and select the strongest within the
    /// primary category.
    pub fn resolve_sub_emotions(&self, scores: &EmotionScores) -> (SubEmotion, SubEmotionScores) {
        let (primary, _) = scores.primary();

        let mut sub_scores = SubEmotionScores::default();
        let mut selected = None;
        for rule in &self.tables.sub_emotions {
            let mut value = scores.get(rule.sub.category()) * rule.multiplier;
            if let Some(other) = rule.blend_with {
                value += rule.blend_weight * scores.get(other);
            }
            sub_scores.set(rule.sub, value);

            if rule.sub.category() == primary {
                match selected {
                    Some((_, best)) if best >= value => {}
                    _ => selected = Some((rule.sub, value)),
                }
            }
        }

        // The table always carries six rules per category.
        let (sub, _) = selected.unwrap_or((SubEmotion::Calm, 0.0));
        (sub, sub_scores)
    }
}

impl crate::model::ScoreFeatures for AcousticEmotionScorer {
    fn score_features(
        &self,
        features: &AcousticFeatures,
        _vector: &FeatureVector,
    ) -> Result<AcousticScore, crate::error::AnalysisError> {
        Ok(self.score(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SCORE_SUM_TOLERANCE;

    fn scorer() -> AcousticEmotionScorer {
        AcousticEmotionScorer::new(ScoringTables::default())
    }

    fn features(pitch: f32, energy: f32, centroid: f32, jitter: f32, formant: f32) -> AcousticFeatures {
        AcousticFeatures {
            pitch_hz: pitch,
            energy,
            spectral_centroid_hz: centroid,
            zero_crossing_rate: 0.15,
            spectral_rolloff_hz: 3000.0,
            jitter,
            shimmer: 0.05,
            formant_frequencies: [formant, 0.0, 0.0],
            harmonic_to_noise_ratio_db: 10.0,
            voice_onset_time_secs: 0.1,
        }
    }

    #[test]
    fn scores_sum_to_one() {
        let score = scorer().score(&features(200.0, 0.8, 2200.0, 0.1, 650.0));
        assert!((score.scores.total() - 1.0).abs() < SCORE_SUM_TOLERANCE);
    }

    #[test]
    fn flat_evidence_is_rejected_as_neutral() {
        // Nothing matches strongly; the normalized maximum stays below the
        // rejection threshold and the result collapses to neutral.
        let score = scorer().score(&features(800.0, 0.0, 0.0, 0.0, 0.0));
        assert!(score.degenerate);
        assert_eq!(score.scores, EmotionScores::degenerate_neutral());
        assert!(score.pre_override_max < LOW_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn degenerate_confidence_is_capped_at_threshold() {
        let s = scorer();
        let score = s.score(&features(800.0, 0.0, 0.0, 0.0, 0.0));
        let confidence = s.confidence(&score, AudioQuality::Poor, 2.0);
        assert!((CONFIDENCE_MIN..=LOW_CONFIDENCE_THRESHOLD).contains(&confidence));
    }

    #[test]
    fn confidence_stays_within_bounds() {
        let s = scorer();
        let score = s.score(&features(200.0, 0.8, 2200.0, 0.1, 650.0));
        for quality in [
            AudioQuality::Poor,
            AudioQuality::Fair,
            AudioQuality::Good,
            AudioQuality::Excellent,
        ] {
            for duration in [1.0, 5.0, 10.0, 120.0] {
                let confidence = s.confidence(&score, quality, duration);
                assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&confidence));
            }
        }
    }

    #[test]
    fn longer_audio_never_lowers_confidence() {
        let s = scorer();
        let score = s.score(&features(200.0, 0.8, 2200.0, 0.1, 650.0));
        let short = s.confidence(&score, AudioQuality::Good, 2.0);
        let long = s.confidence(&score, AudioQuality::Good, 12.0);
        assert!(long >= short);
    }

    #[test]
    fn sub_emotion_selection_tracks_primary_category() {
        let s = scorer();
        let mut scores = EmotionScores::zeros();
        scores.set(Emotion::Joy, 0.6);
        scores.set(Emotion::Surprise, 0.3);
        scores.set(Emotion::Neutral, 0.1);

        let (sub, all) = s.resolve_sub_emotions(&scores);
        assert_eq!(sub.category(), Emotion::Joy);
        // Excitement = joy x 1.2 + 0.3 x surprise beats every other joy rule.
        assert_eq!(sub, SubEmotion::Excitement);
        assert_eq!(all.len(), 42);
        assert!((all.get(SubEmotion::Excitement) - (0.6 * 1.2 + 0.3 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic() {
        let s = scorer();
        let f = features(165.0, 0.45, 1900.0, 0.5, 550.0);
        assert_eq!(s.score(&f), s.score(&f));
    }
}
