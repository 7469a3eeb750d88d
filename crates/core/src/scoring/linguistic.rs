//! Linguistic emotion scoring over a transcript supplied by an external
//! speech-to-text collaborator.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::scoring::lexicon;
use crate::scoring::{Emotion, EmotionScores};

pub const MIN_WORDS: usize = 3;

const KEYWORD_CONTRIBUTION: f64 = 0.4;
const POLARITY_THRESHOLD: f64 = 0.1;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SentimentPolarity {
    Positive,
    Negative,
    Neutral,
}

/// Result of the linguistic channel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinguisticScore {
    pub scores: EmotionScores,
    pub confidence: f64,
    pub polarity: SentimentPolarity,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LinguisticEmotionScorer;

impl LinguisticEmotionScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a transcript: sentiment polarity seeds category baselines, then
    /// weighted keyword matches add onto them, and the result is normalized.
    pub fn score(&self, transcript: &str) -> Result<LinguisticScore, AnalysisError> {
        let trimmed = transcript.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::NoSpeechDetected);
        }
        let lowered = trimmed.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        if words.len() < MIN_WORDS {
            return Err(AnalysisError::InsufficientSpeech {
                words: words.len(),
                min_words: MIN_WORDS,
            });
        }

        let (polarity, sentiment_confidence) = sentiment(&words);

        let mut scores = EmotionScores::zeros();
        match polarity {
            SentimentPolarity::Positive => {
                scores.add(Emotion::Joy, 0.3 + 0.4 * sentiment_confidence);
            }
            SentimentPolarity::Negative => {
                scores.add(Emotion::Sadness, 0.2 + 0.3 * sentiment_confidence);
                scores.add(Emotion::Anger, 0.1 + 0.2 * sentiment_confidence);
            }
            SentimentPolarity::Neutral => {
                scores.add(Emotion::Neutral, 0.3);
            }
        }

        let mut matched_weights = Vec::new();
        for &emotion in &Emotion::ALL {
            for &(keyword, weight) in lexicon::keywords(emotion) {
                if lowered.contains(keyword) {
                    scores.add(emotion, weight * KEYWORD_CONTRIBUTION);
                    matched_weights.push(weight);
                }
            }
        }
        scores.normalize();

        let keyword_confidence = if matched_weights.is_empty() {
            0.0
        } else {
            matched_weights.iter().sum::<f64>() / matched_weights.len() as f64
        };
        let confidence = (sentiment_confidence + keyword_confidence) / 2.0;

        Ok(LinguisticScore { scores, confidence, polarity })
    }
}

/// Paragraph-level sentiment from positive/negative word counts; the
/// magnitude of the normalized balance doubles as the confidence.
fn sentiment(words: &[&str]) -> (SentimentPolarity, f64) {
    let positives = words
        .iter()
        .filter(|w| lexicon::POSITIVE_WORDS.iter().any(|p| w.contains(p)))
        .count() as f64;
    let negatives = words
        .iter()
        .filter(|w| lexicon::NEGATIVE_WORDS.iter().any(|n| w.contains(n)))
        .count() as f64;

    let balance = (positives - negatives) / (words.len() as f64).sqrt();
    let polarity = if balance > POLARITY_THRESHOLD {
        SentimentPolarity::Positive
    } else if balance < -POLARITY_THRESHOLD {
        SentimentPolarity::Negative
    } else {
        SentimentPolarity::Neutral
    };
    (polarity, balance.abs().clamp(0.0, 1.0))
}
