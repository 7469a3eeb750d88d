//! Confidence-weighted fusion of the acoustic and linguistic channels.
//!
//! The policy is an ordered rule list; the first matching case wins. A failed
//! linguistic channel never aborts the analysis, it only restricts the policy
//! to the acoustic result.

use serde::{Deserialize, Serialize};

use crate::scoring::{EmotionScores, LinguisticScore};

const LINGUISTIC_DOMINANT_MIN: f64 = 0.6;
const ACOUSTIC_DOMINANT_MIN: f64 = 0.5;
const LINGUISTIC_WEAK_MAX: f64 = 0.4;
const BALANCED_MIN: f64 = 0.4;

const LINGUISTIC_DOMINANT_WEIGHTS: (f64, f64) = (0.2, 0.8);
const ACOUSTIC_DOMINANT_WEIGHTS: (f64, f64) = (0.7, 0.3);

/// Which fusion rule produced the final result.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FusionStrategy {
    AcousticOnly,
    LinguisticDominant,
    AcousticDominant,
    Balanced,
    LowConfidenceFallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FusionOutcome {
    pub scores: EmotionScores,
    pub confidence: f64,
    pub strategy: FusionStrategy,
    pub low_confidence: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FusionEngine;

impl FusionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply the ordered fusion policy.
    ///
    /// Rule 1 (no linguistic result) passes the acoustic scores through
    /// unchanged, bit for bit.
    pub fn fuse(
        &self,
        acoustic: &EmotionScores,
        acoustic_confidence: f64,
        linguistic: Option<&LinguisticScore>,
    ) -> FusionOutcome {
        let Some(linguistic) = linguistic else {
            return FusionOutcome {
                scores: acoustic.clone(),
                confidence: acoustic_confidence,
                strategy: FusionStrategy::AcousticOnly,
                low_confidence: false,
            };
        };

        if linguistic.confidence >= LINGUISTIC_DOMINANT_MIN {
            let (wa, wl) = LINGUISTIC_DOMINANT_WEIGHTS;
            return FusionOutcome {
                scores: combine(acoustic, &linguistic.scores, wa, wl),
                confidence: wa * acoustic_confidence + wl * linguistic.confidence,
                strategy: FusionStrategy::LinguisticDominant,
                low_confidence: false,
            };
        }

        if acoustic_confidence >= ACOUSTIC_DOMINANT_MIN
            && linguistic.confidence < LINGUISTIC_WEAK_MAX
        {
            let (wa, wl) = ACOUSTIC_DOMINANT_WEIGHTS;
            return FusionOutcome {
                scores: combine(acoustic, &linguistic.scores, wa, wl),
                confidence: wa * acoustic_confidence + wl * linguistic.confidence,
                strategy: FusionStrategy::AcousticDominant,
                low_confidence: false,
            };
        }

        if acoustic_confidence >= BALANCED_MIN && linguistic.confidence >= BALANCED_MIN {
            let sum = acoustic_confidence + linguistic.confidence;
            let (wa, wl) = (acoustic_confidence / sum, linguistic.confidence / sum);
            return FusionOutcome {
                scores: combine(acoustic, &linguistic.scores, wa, wl),
                confidence: wa * acoustic_confidence + wl * linguistic.confidence,
                strategy: FusionStrategy::Balanced,
                low_confidence: false,
            };
        }

        tracing::debug!(
            acoustic = acoustic_confidence,
            linguistic = linguistic.confidence,
            "both channels weak, falling back to acoustic scores"
        );
        FusionOutcome {
            scores: acoustic.clone(),
            confidence: acoustic_confidence.min(LINGUISTIC_WEAK_MAX),
            strategy: FusionStrategy::LowConfidenceFallback,
            low_confidence: true,
        }
    }
}

/// Per-category weighted sum of two score maps, renormalized to sum to 1.
fn combine(acoustic: &EmotionScores, linguistic: &EmotionScores, wa: f64, wl: f64) -> EmotionScores {
    let mut combined = EmotionScores::zeros();
    for (emotion, score) in acoustic.iter() {
        combined.add(emotion, wa * score);
    }
    for (emotion, score) in linguistic.iter() {
        combined.add(emotion, wl * score);
    }
    combined.normalize();
    combined
}
