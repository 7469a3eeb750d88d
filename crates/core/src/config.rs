//! Pipeline configuration.
//!
//! Constructed explicitly and injected into the pipeline; there is no
//! process-wide mutable state.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoringTables;

/// Minimum accepted source duration, inclusive.
pub const MIN_DURATION_SECS: f64 = 1.0;
/// Maximum accepted source duration, inclusive.
pub const MAX_DURATION_SECS: f64 = 120.0;
/// Sample rate the classification path is tuned for. Raw feature extraction
/// accepts any rate.
pub const CLASSIFICATION_SAMPLE_RATE: u32 = 16_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample rate must be > 0")]
    ZeroSampleRate,
    #[error("invalid scoring tables: {0}")]
    InvalidTables(String),
    #[error("failed to load scoring tables: {0}")]
    TablesUnreadable(String),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleRate(u32);

impl SampleRate {
    pub fn new(hz: u32) -> Result<Self, ConfigError> {
        if hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        Ok(Self(hz))
    }

    pub fn hz(&self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self(CLASSIFICATION_SAMPLE_RATE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub sample_rate: SampleRate,
    pub tables: ScoringTables,
}

impl PipelineConfig {
    pub fn new(sample_rate: SampleRate, tables: ScoringTables) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { sample_rate, tables })
    }

    /// Load scoring tables from a JSON file, keeping the given sample rate.
    pub fn with_tables_file<P: AsRef<Path>>(
        sample_rate: SampleRate,
        path: P,
    ) -> Result<Self, ConfigError> {
        let file = File::open(&path)
            .map_err(|e| ConfigError::TablesUnreadable(e.to_string()))?;
        let tables: ScoringTables = serde_json::from_reader(file)
            .map_err(|e| ConfigError::TablesUnreadable(e.to_string()))?;
        Self::new(sample_rate, tables)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::default(),
            tables: ScoringTables::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sample_rate_is_rejected() {
        assert_eq!(SampleRate::new(0), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_rate.hz(), CLASSIFICATION_SAMPLE_RATE);
        assert!(config.tables.validate().is_ok());
    }

    #[test]
    fn invalid_tables_fail_construction() {
        let mut tables = ScoringTables::default();
        tables.version = 0;
        assert!(PipelineConfig::new(SampleRate::default(), tables).is_err());
    }
}
