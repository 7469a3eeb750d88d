//! Keyword and sentiment lexicons for the linguistic channel.
//!
//! Keyword weights are 0-1; each match contributes `weight x 0.4` to its
//! category. Matching is substring-based over the lowercased transcript, so
//! entries cover inflected forms ("terrif" matches terrified/terrifying).

use crate::scoring::Emotion;

pub fn keywords(emotion: Emotion) -> &'static [(&'static str, f64)] {
    match emotion {
        Emotion::Joy => JOY,
        Emotion::Sadness => SADNESS,
        Emotion::Anger => ANGER,
        Emotion::Fear => FEAR,
        Emotion::Surprise => SURPRISE,
        Emotion::Disgust => DISGUST,
        Emotion::Neutral => NEUTRAL,
    }
}

static JOY: &[(&str, f64)] = &[
    ("happy", 0.9),
    ("joy", 0.9),
    ("delight", 0.85),
    ("wonderful", 0.8),
    ("great", 0.6),
    ("love", 0.8),
    ("excited", 0.85),
    ("thrilled", 0.9),
    ("glad", 0.7),
    ("awesome", 0.75),
    ("fantastic", 0.8),
    ("amazing", 0.7),
    ("cheerful", 0.8),
    ("grateful", 0.7),
    ("proud", 0.65),
    ("fun", 0.6),
    ("smile", 0.6),
    ("laugh", 0.65),
];

static SADNESS: &[(&str, f64)] = &[
    ("sad", 0.9),
    ("unhappy", 0.85),
    ("depress", 0.9),
    ("miserable", 0.85),
    ("cry", 0.8),
    ("tear", 0.6),
    ("lonely", 0.8),
    ("grief", 0.9),
    ("heartbroken", 0.9),
    ("hopeless", 0.85),
    ("miss", 0.5),
    ("lost", 0.55),
    ("gloomy", 0.75),
    ("down", 0.5),
    ("hurt", 0.6),
    ("empty", 0.6),
    ("regret", 0.7),
];

static ANGER: &[(&str, f64)] = &[
    ("angry", 0.9),
    ("furious", 0.95),
    ("mad", 0.8),
    ("rage", 0.9),
    ("hate", 0.85),
    ("annoy", 0.7),
    ("irritat", 0.7),
    ("frustrat", 0.75),
    ("outrage", 0.9),
    ("unfair", 0.6),
    ("fed up", 0.7),
    ("sick of", 0.7),
    ("yell", 0.6),
    ("hostile", 0.75),
    ("resent", 0.7),
    ("livid", 0.9),
];

static FEAR: &[(&str, f64)] = &[
    ("afraid", 0.9),
    ("scared", 0.9),
    ("terrif", 0.95),
    ("fear", 0.85),
    ("anxious", 0.8),
    ("anxiety", 0.8),
    ("panic", 0.9),
    ("worried", 0.75),
    ("worry", 0.7),
    ("nervous", 0.75),
    ("dread", 0.85),
    ("frighten", 0.85),
    ("threat", 0.6),
    ("danger", 0.6),
    ("helpless", 0.65),
    ("trembl", 0.7),
];

static SURPRISE: &[(&str, f64)] = &[
    ("surpris", 0.9),
    ("shock", 0.85),
    ("wow", 0.8),
    ("unbelievable", 0.8),
    ("unexpected", 0.75),
    ("astonish", 0.9),
    ("stunned", 0.8),
    ("incredible", 0.7),
    ("no way", 0.7),
    ("suddenly", 0.5),
    ("can't believe", 0.8),
    ("cannot believe", 0.8),
    ("out of nowhere", 0.65),
    ("speechless", 0.7),
];

static DISGUST: &[(&str, f64)] = &[
    ("disgust", 0.95),
    ("gross", 0.85),
    ("revolting", 0.9),
    ("nasty", 0.75),
    ("awful", 0.6),
    ("horrible", 0.6),
    ("sicken", 0.85),
    ("repuls", 0.9),
    ("vile", 0.85),
    ("foul", 0.7),
    ("creep", 0.6),
    ("yuck", 0.8),
    ("ew", 0.7),
    ("can't stand", 0.7),
];

static NEUTRAL: &[(&str, f64)] = &[
    ("okay", 0.5),
    ("fine", 0.5),
    ("alright", 0.5),
    ("normal", 0.55),
    ("usual", 0.5),
    ("regular", 0.45),
    ("nothing much", 0.6),
    ("as always", 0.5),
    ("so-so", 0.6),
    ("average", 0.5),
    ("whatever", 0.45),
    ("calm", 0.6),
];

/// Word lists for the paragraph-level sentiment polarity estimate.
pub static POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "love", "wonderful", "excellent", "nice", "best",
    "beautiful", "enjoy", "amazing", "fantastic", "glad", "fun", "awesome",
    "excited", "perfect", "better", "thank", "hope",
];

pub static NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "sad", "hate", "awful", "worst", "horrible", "angry",
    "afraid", "scared", "ugly", "pain", "hurt", "cry", "fail", "wrong",
    "never", "alone", "tired", "sick",
];
