//! Emotion categories, sub-emotions and score maps shared by the acoustic and
//! linguistic channels.

mod acoustic;
mod lexicon;
mod linguistic;
mod tables;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use acoustic::{AcousticEmotionScorer, AcousticScore, LOW_CONFIDENCE_THRESHOLD};
pub use linguistic::{LinguisticEmotionScorer, LinguisticScore, SentimentPolarity};
pub use tables::{
    EmotionProfile, EmotionProfiles, FeatureRule, FeatureWeights, ScoringTables, SubEmotionRule,
};

pub const SCORE_SUM_TOLERANCE: f64 = 1e-6;

/// The seven emotion categories.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];
}

/// Closed set of sub-emotions, six per category.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubEmotion {
    // Joy
    Excitement,
    Contentment,
    Amusement,
    Pride,
    Relief,
    Affection,
    // Sadness
    Grief,
    Disappointment,
    Loneliness,
    Melancholy,
    Despair,
    Regret,
    // Anger
    Rage,
    Frustration,
    Irritation,
    Resentment,
    Contempt,
    Indignation,
    // Fear
    Anxiety,
    Panic,
    Worry,
    Dread,
    Nervousness,
    Terror,
    // Surprise
    Amazement,
    Astonishment,
    Confusion,
    Wonder,
    Shock,
    Startle,
    // Disgust
    Revulsion,
    Disdain,
    Aversion,
    Distaste,
    Loathing,
    Scorn,
    // Neutral
    Calm,
    Composed,
    Indifferent,
    Attentive,
    Contemplative,
    Detached,
}

impl SubEmotion {
    /// Parent category of this sub-emotion.
    pub fn category(self) -> Emotion {
        use SubEmotion::*;
        match self {
            Excitement | Contentment | Amusement | Pride | Relief | Affection => Emotion::Joy,
            Grief | Disappointment | Loneliness | Melancholy | Despair | Regret => Emotion::Sadness,
            Rage | Frustration | Irritation | Resentment | Contempt | Indignation => Emotion::Anger,
            Anxiety | Panic | Worry | Dread | Nervousness | Terror => Emotion::Fear,
            Amazement | Astonishment | Confusion | Wonder | Shock | Startle => Emotion::Surprise,
            Revulsion | Disdain | Aversion | Distaste | Loathing | Scorn => Emotion::Disgust,
            Calm | Composed | Indifferent | Attentive | Contemplative | Detached => Emotion::Neutral,
        }
    }
}

/// Score per emotion category. Values sum to 1.0 within tolerance, or are the
/// degenerate `{Neutral: 1.0}` map after failure or low-confidence rejection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionScores(BTreeMap<Emotion, f64>);

impl EmotionScores {
    pub fn zeros() -> Self {
        Self(Emotion::ALL.iter().map(|&e| (e, 0.0)).collect())
    }

    /// The failure/low-confidence fallback: all mass on Neutral.
    pub fn degenerate_neutral() -> Self {
        let mut scores = Self::zeros();
        scores.set(Emotion::Neutral, 1.0);
        scores
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0.get(&emotion).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, emotion: Emotion, score: f64) {
        self.0.insert(emotion, score);
    }

    pub fn add(&mut self, emotion: Emotion, delta: f64) {
        *self.0.entry(emotion).or_insert(0.0) += delta;
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Divide every score by the total. No-op when the total is zero.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for score in self.0.values_mut() {
                *score /= total;
            }
        }
    }

    /// Highest-scoring category; ties resolve in `Emotion::ALL` order.
    pub fn primary(&self) -> (Emotion, f64) {
        let mut best = (Emotion::Neutral, f64::MIN);
        for &emotion in &Emotion::ALL {
            let score = self.get(emotion);
            if score > best.1 {
                best = (emotion, score);
            }
        }
        best
    }

    /// Score of the runner-up category.
    pub fn second(&self) -> f64 {
        let (primary, _) = self.primary();
        let mut best = 0.0f64;
        for &emotion in &Emotion::ALL {
            if emotion != primary {
                best = best.max(self.get(emotion));
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        self.0.iter().map(|(&e, &s)| (e, s))
    }
}

/// Score per sub-emotion, derived from the category scores.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SubEmotionScores(BTreeMap<SubEmotion, f64>);

impl SubEmotionScores {
    pub fn get(&self, sub: SubEmotion) -> f64 {
        self.0.get(&sub).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, sub: SubEmotion, score: f64) {
        self.0.insert(sub, score);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubEmotion, f64)> + '_ {
        self.0.iter().map(|(&s, &v)| (s, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_six_sub_emotions() {
        let rules = ScoringTables::default().sub_emotions;
        for &emotion in &Emotion::ALL {
            let count = rules.iter().filter(|r| r.sub.category() == emotion).count();
            assert_eq!(count, 6, "{emotion:?}");
        }
        assert_eq!(rules.len(), 42);
    }

    #[test]
    fn degenerate_neutral_sums_to_one() {
        let scores = EmotionScores::degenerate_neutral();
        assert!((scores.total() - 1.0).abs() < SCORE_SUM_TOLERANCE);
        assert_eq!(scores.primary(), (Emotion::Neutral, 1.0));
    }

    #[test]
    fn normalize_scales_to_unit_sum() {
        let mut scores = EmotionScores::zeros();
        scores.set(Emotion::Joy, 2.0);
        scores.set(Emotion::Anger, 2.0);
        scores.normalize();
        assert!((scores.total() - 1.0).abs() < SCORE_SUM_TOLERANCE);
        assert_eq!(scores.get(Emotion::Joy), 0.5);
    }

    #[test]
    fn primary_ties_resolve_in_declaration_order() {
        let mut scores = EmotionScores::zeros();
        scores.set(Emotion::Sadness, 0.5);
        scores.set(Emotion::Fear, 0.5);
        assert_eq!(scores.primary().0, Emotion::Sadness);
    }
}
