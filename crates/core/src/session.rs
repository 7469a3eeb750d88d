//! Interfaces to the external collaborators: audio capture and
//! speech-to-text. The pipeline itself never records audio or manages
//! permissions; it consumes what these sources supply.
//!
//! `SessionAnalyzer` drives both sources and runs the CPU-bound pipeline on a
//! blocking worker. Cancellation is caller-level: drop the future and the
//! in-flight result is discarded.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::AnalysisError;
use crate::pipeline::{AnalysisResult, EmotionPipeline};

/// Raw capture output handed over by the recording collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("audio capture failed: {0}")]
    Capture(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Supplies one recorded buffer per session.
pub trait AudioSource: Send + Sync {
    fn record(&self) -> BoxFuture<'_, Result<RecordedAudio, SourceError>>;
}

/// Supplies a transcript for a recorded buffer.
pub trait TranscriptSource: Send + Sync {
    fn transcribe<'a>(
        &'a self,
        audio: &'a RecordedAudio,
    ) -> BoxFuture<'a, Result<String, SourceError>>;
}

pub struct SessionAnalyzer {
    pipeline: Arc<EmotionPipeline>,
}

impl SessionAnalyzer {
    pub fn new(pipeline: Arc<EmotionPipeline>) -> Self {
        Self { pipeline }
    }

    /// Record, optionally transcribe, and analyze one session.
    ///
    /// A failing transcript source degrades to acoustic-only fusion; a
    /// failing audio source aborts with `ServiceUnavailable`.
    pub async fn analyze_session(
        &self,
        audio: &dyn AudioSource,
        transcript: Option<&dyn TranscriptSource>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let recorded = audio
            .record()
            .await
            .map_err(|e| AnalysisError::ServiceUnavailable(e.to_string()))?;

        if recorded.sample_rate != self.pipeline.sample_rate() {
            return Err(AnalysisError::InvalidAudioFormat(format!(
                "source sample rate {} does not match pipeline rate {}",
                recorded.sample_rate,
                self.pipeline.sample_rate()
            )));
        }

        let text = match transcript {
            None => None,
            Some(source) => match source.transcribe(&recorded).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "transcript source failed, continuing without");
                    None
                }
            },
        };

        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.analyze(&recorded.samples, text.as_deref()))
            .await
            .map_err(|e| AnalysisError::AudioProcessingFailed(format!("worker task failed: {e}")))?
    }
}
