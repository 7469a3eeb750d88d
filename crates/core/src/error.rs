//! Error taxonomy for the analysis pipeline.
//!
//! Malformed input (duration bounds, dimension mismatches, non-finite values)
//! aborts the whole analysis. Low audio quality and linguistic-channel failures
//! never abort; they only degrade confidence or restrict the fusion policy.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("audio too short: {actual_secs:.2}s (minimum {min_secs:.2}s)")]
    AudioTooShort { actual_secs: f64, min_secs: f64 },

    #[error("audio too long: {actual_secs:.2}s (maximum {max_secs:.2}s)")]
    AudioTooLong { actual_secs: f64, max_secs: f64 },

    #[error("invalid audio format: {0}")]
    InvalidAudioFormat(String),

    #[error("audio processing failed: {0}")]
    AudioProcessingFailed(String),

    #[error("invalid feature vector: expected {expected} values, got {actual}")]
    InvalidFeatureVector { expected: usize, actual: usize },

    #[error("feature vector contains non-finite values")]
    InvalidFeatureValues,

    #[error("no speech detected in transcript")]
    NoSpeechDetected,

    #[error("insufficient speech: {words} words (minimum {min_words})")]
    InsufficientSpeech { words: usize, min_words: usize },

    #[error("pretrained model not loaded")]
    ModelNotLoaded,

    #[error("invalid model output: {0}")]
    InvalidModelOutput(String),

    #[error("analysis service unavailable: {0}")]
    ServiceUnavailable(String),
}
