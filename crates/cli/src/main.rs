#![deny(warnings)]

use anyhow::Context;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use voice_emotion_core::config::{PipelineConfig, SampleRate};
use voice_emotion_core::pipeline::EmotionPipeline;

#[derive(Parser, Debug)]
#[command(name = "voice-emotion")]
#[command(about = "Emotion classification for short voice recordings")]
#[command(group(
    ArgGroup::new("text")
        .required(false)
        .multiple(false)
        .args(["transcript", "transcript_file"])
))]
struct Args {
    /// Input WAV file (any channel count; downmixed to mono).
    #[arg(long)]
    wav: PathBuf,

    /// Transcript of the recording, for the linguistic channel.
    #[arg(long)]
    transcript: Option<String>,

    /// Read the transcript from a file instead.
    #[arg(long)]
    transcript_file: Option<PathBuf>,

    /// Scoring tables JSON; defaults to the built-in v1 tables.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Pretrained model JSON; the heuristic scorer is used when absent or
    /// unreadable.
    #[arg(long)]
    model: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the JSON result.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let (samples, sample_rate) = read_wav_mono(&args.wav)
        .with_context(|| format!("failed to read {}", args.wav.display()))?;
    tracing::info!(
        sample_rate,
        samples = samples.len(),
        "audio loaded"
    );

    let transcript = match (&args.transcript, &args.transcript_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let config = match &args.tables {
        Some(path) => PipelineConfig::with_tables_file(SampleRate::new(sample_rate)?, path)?,
        None => PipelineConfig::new(SampleRate::new(sample_rate)?, Default::default())?,
    };

    let pipeline = match &args.model {
        Some(path) => EmotionPipeline::with_model_file(config, path)?,
        None => EmotionPipeline::new(config)?,
    };

    let pipeline = Arc::new(pipeline);
    let worker = Arc::clone(&pipeline);
    let result = tokio::task::spawn_blocking(move || {
        worker.analyze(&samples, transcript.as_deref())
    })
    .await
    .context("analysis worker failed")??;

    tracing::info!(
        emotion = ?result.primary_emotion,
        confidence = result.confidence,
        "analysis complete"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Read a WAV file as mono f32 samples, averaging channels.
fn read_wav_mono(path: &PathBuf) -> anyhow::Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}
