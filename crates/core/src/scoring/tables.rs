//! Versioned threshold and weight tables for the heuristic acoustic scorer.
//!
//! These tables are the de-facto model of the heuristic path. They are data,
//! not code: a single serde-backed structure that can be exported, tuned and
//! reloaded, with `Default` carrying the canonical v1 literals.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::scoring::{Emotion, SubEmotion};

/// Interval membership rule: `hit` inside `[min, max]`, `miss` outside.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeatureRule {
    pub min: f32,
    pub max: f32,
    pub hit: f64,
    pub miss: f64,
}

impl FeatureRule {
    pub const fn new(min: f32, max: f32, hit: f64, miss: f64) -> Self {
        Self { min, max, hit, miss }
    }

    pub fn score(&self, value: f32) -> f64 {
        if value >= self.min && value <= self.max {
            self.hit
        } else {
            self.miss
        }
    }
}

/// Per-emotion importance weights for the five feature contributions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeights {
    pub pitch: f64,
    pub energy: f64,
    pub centroid: f64,
    pub jitter: f64,
    pub formant: f64,
}

impl FeatureWeights {
    pub const fn new(pitch: f64, energy: f64, centroid: f64, jitter: f64, formant: f64) -> Self {
        Self { pitch, energy, centroid, jitter, formant }
    }

    pub fn total(&self) -> f64 {
        self.pitch + self.energy + self.centroid + self.jitter + self.formant
    }
}

/// Scoring profile of one emotion category.
///
/// The formant rule is evaluated against `formant_frequencies[0]`, the
/// strongest resonance by spectral magnitude.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionProfile {
    pub pitch: FeatureRule,
    pub energy: FeatureRule,
    pub centroid: FeatureRule,
    pub jitter: FeatureRule,
    pub formant: FeatureRule,
    pub weights: FeatureWeights,
}

/// Sub-emotion resolution rule: `category score x multiplier`, optionally
/// blended with a fraction of a different category's score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubEmotionRule {
    pub sub: SubEmotion,
    pub multiplier: f64,
    pub blend_with: Option<Emotion>,
    pub blend_weight: f64,
}

impl SubEmotionRule {
    const fn plain(sub: SubEmotion, multiplier: f64) -> Self {
        Self { sub, multiplier, blend_with: None, blend_weight: 0.0 }
    }

    const fn blended(sub: SubEmotion, multiplier: f64, with: Emotion, weight: f64) -> Self {
        Self { sub, multiplier, blend_with: Some(with), blend_weight: weight }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionProfiles {
    pub joy: EmotionProfile,
    pub sadness: EmotionProfile,
    pub anger: EmotionProfile,
    pub fear: EmotionProfile,
    pub surprise: EmotionProfile,
    pub disgust: EmotionProfile,
    pub neutral: EmotionProfile,
}

impl EmotionProfiles {
    pub fn get(&self, emotion: Emotion) -> &EmotionProfile {
        match emotion {
            Emotion::Joy => &self.joy,
            Emotion::Sadness => &self.sadness,
            Emotion::Anger => &self.anger,
            Emotion::Fear => &self.fear,
            Emotion::Surprise => &self.surprise,
            Emotion::Disgust => &self.disgust,
            Emotion::Neutral => &self.neutral,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoringTables {
    pub version: u32,
    pub profiles: EmotionProfiles,
    pub sub_emotions: Vec<SubEmotionRule>,
}

impl ScoringTables {
    /// Structural validation for tables loaded from external data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidTables("version must be >= 1".to_owned()));
        }
        for &emotion in &Emotion::ALL {
            if self.profiles.get(emotion).weights.total() <= 0.0 {
                return Err(ConfigError::InvalidTables(format!(
                    "weights for {emotion:?} must sum above zero"
                )));
            }
        }
        for &emotion in &Emotion::ALL {
            let count = self
                .sub_emotions
                .iter()
                .filter(|r| r.sub.category() == emotion)
                .count();
            if count != 6 {
                return Err(ConfigError::InvalidTables(format!(
                    "expected 6 sub-emotion rules for {emotion:?}, found {count}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoringTables {
    fn default() -> Self {
        use Emotion::*;
        use SubEmotion::*;

        Self {
            version: 1,
            profiles: EmotionProfiles {
                joy: EmotionProfile {
                    pitch: FeatureRule::new(180.0, 280.0, 0.8, 0.3),
                    energy: FeatureRule::new(0.5, 1.0, 0.8, 0.3),
                    centroid: FeatureRule::new(1500.0, 3000.0, 0.7, 0.3),
                    jitter: FeatureRule::new(0.0, 0.3, 0.7, 0.4),
                    formant: FeatureRule::new(400.0, 800.0, 0.6, 0.4),
                    weights: FeatureWeights::new(1.2, 1.0, 0.8, 0.5, 0.5),
                },
                sadness: EmotionProfile {
                    pitch: FeatureRule::new(80.0, 150.0, 0.8, 0.3),
                    energy: FeatureRule::new(0.0, 0.35, 0.8, 0.3),
                    centroid: FeatureRule::new(200.0, 1200.0, 0.7, 0.3),
                    jitter: FeatureRule::new(0.0, 0.25, 0.6, 0.4),
                    formant: FeatureRule::new(250.0, 600.0, 0.6, 0.4),
                    weights: FeatureWeights::new(1.2, 1.1, 0.7, 0.4, 0.5),
                },
                anger: EmotionProfile {
                    pitch: FeatureRule::new(150.0, 300.0, 0.7, 0.3),
                    energy: FeatureRule::new(0.7, 1.0, 0.9, 0.3),
                    centroid: FeatureRule::new(2000.0, 4000.0, 0.8, 0.3),
                    jitter: FeatureRule::new(0.3, 0.8, 0.7, 0.3),
                    formant: FeatureRule::new(600.0, 1200.0, 0.6, 0.4),
                    weights: FeatureWeights::new(1.0, 1.3, 0.9, 0.7, 0.5),
                },
                fear: EmotionProfile {
                    pitch: FeatureRule::new(140.0, 200.0, 0.8, 0.3),
                    energy: FeatureRule::new(0.3, 0.6, 0.6, 0.3),
                    centroid: FeatureRule::new(1800.0, 3500.0, 0.7, 0.3),
                    jitter: FeatureRule::new(0.4, 1.0, 0.8, 0.3),
                    formant: FeatureRule::new(300.0, 700.0, 0.5, 0.4),
                    weights: FeatureWeights::new(1.1, 0.8, 0.8, 1.0, 0.4),
                },
                surprise: EmotionProfile {
                    pitch: FeatureRule::new(220.0, 400.0, 0.8, 0.3),
                    energy: FeatureRule::new(0.4, 0.9, 0.7, 0.3),
                    centroid: FeatureRule::new(2000.0, 4500.0, 0.7, 0.3),
                    jitter: FeatureRule::new(0.2, 0.6, 0.5, 0.4),
                    formant: FeatureRule::new(500.0, 1000.0, 0.5, 0.4),
                    weights: FeatureWeights::new(1.2, 0.9, 0.8, 0.5, 0.4),
                },
                disgust: EmotionProfile {
                    pitch: FeatureRule::new(100.0, 180.0, 0.6, 0.3),
                    energy: FeatureRule::new(0.2, 0.5, 0.6, 0.3),
                    centroid: FeatureRule::new(800.0, 2000.0, 0.6, 0.3),
                    jitter: FeatureRule::new(0.3, 0.7, 0.6, 0.4),
                    formant: FeatureRule::new(400.0, 900.0, 0.5, 0.4),
                    weights: FeatureWeights::new(0.9, 0.8, 0.8, 0.7, 0.5),
                },
                neutral: EmotionProfile {
                    pitch: FeatureRule::new(100.0, 180.0, 0.7, 0.3),
                    energy: FeatureRule::new(0.2, 0.5, 0.7, 0.3),
                    centroid: FeatureRule::new(800.0, 1800.0, 0.7, 0.3),
                    jitter: FeatureRule::new(0.0, 0.2, 0.7, 0.3),
                    formant: FeatureRule::new(300.0, 800.0, 0.6, 0.4),
                    weights: FeatureWeights::new(1.0, 1.0, 0.8, 0.6, 0.5),
                },
            },
            sub_emotions: vec![
                // Joy
                SubEmotionRule::blended(Excitement, 1.2, Surprise, 0.3),
                SubEmotionRule::plain(Contentment, 1.0),
                SubEmotionRule::blended(Amusement, 1.1, Surprise, 0.15),
                SubEmotionRule::plain(Pride, 0.95),
                SubEmotionRule::blended(Relief, 0.9, Sadness, 0.1),
                SubEmotionRule::plain(Affection, 0.85),
                // Sadness
                SubEmotionRule::blended(Grief, 1.15, Fear, 0.15),
                SubEmotionRule::plain(Disappointment, 1.05),
                SubEmotionRule::plain(Loneliness, 1.0),
                SubEmotionRule::plain(Melancholy, 0.95),
                SubEmotionRule::blended(Despair, 1.1, Fear, 0.25),
                SubEmotionRule::blended(Regret, 0.9, Disgust, 0.1),
                // Anger
                SubEmotionRule::blended(Rage, 1.2, Fear, 0.1),
                SubEmotionRule::plain(Frustration, 1.1),
                SubEmotionRule::plain(Irritation, 1.0),
                SubEmotionRule::blended(Resentment, 0.95, Disgust, 0.2),
                SubEmotionRule::blended(Contempt, 0.9, Disgust, 0.3),
                SubEmotionRule::plain(Indignation, 0.85),
                // Fear
                SubEmotionRule::plain(Anxiety, 1.15),
                SubEmotionRule::blended(Panic, 1.2, Surprise, 0.2),
                SubEmotionRule::plain(Worry, 1.0),
                SubEmotionRule::blended(Dread, 0.95, Sadness, 0.15),
                SubEmotionRule::plain(Nervousness, 1.05),
                SubEmotionRule::blended(Terror, 1.1, Surprise, 0.3),
                // Surprise
                SubEmotionRule::blended(Amazement, 1.15, Joy, 0.2),
                SubEmotionRule::plain(Astonishment, 1.1),
                SubEmotionRule::blended(Confusion, 0.95, Fear, 0.15),
                SubEmotionRule::blended(Wonder, 1.0, Joy, 0.3),
                SubEmotionRule::blended(Shock, 1.05, Fear, 0.25),
                SubEmotionRule::plain(Startle, 0.9),
                // Disgust
                SubEmotionRule::plain(Revulsion, 1.15),
                SubEmotionRule::blended(Disdain, 1.0, Anger, 0.2),
                SubEmotionRule::plain(Aversion, 1.05),
                SubEmotionRule::plain(Distaste, 0.95),
                SubEmotionRule::blended(Loathing, 1.1, Anger, 0.3),
                SubEmotionRule::blended(Scorn, 0.9, Anger, 0.15),
                // Neutral
                SubEmotionRule::plain(Calm, 1.1),
                SubEmotionRule::plain(Composed, 1.05),
                SubEmotionRule::plain(Indifferent, 0.95),
                SubEmotionRule::blended(Attentive, 1.0, Surprise, 0.1),
                SubEmotionRule::plain(Contemplative, 0.9),
                SubEmotionRule::blended(Detached, 0.85, Sadness, 0.1),
            ],
        }
    }
}
