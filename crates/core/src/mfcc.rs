//! Mel-frequency cepstral coefficient extraction.
//!
//! 1024-sample frames with a 512 hop, Hamming window, 26 triangular mel
//! filters spanning 0 Hz to Nyquist, log filter energies, DCT-II keeping the
//! first 13 coefficients. Coefficients are averaged across frames; the
//! temporal pooling discards intra-utterance dynamics, which is a deliberate
//! trade-off of this pipeline rather than a bug.

use std::f32::consts::PI;

use crate::error::AnalysisError;
use crate::spectral;

pub const FRAME_LEN: usize = 1024;
pub const HOP_LEN: usize = 512;
pub const NUM_FILTERS: usize = 26;
pub const NUM_COEFFICIENTS: usize = 13;

const LOG_FLOOR: f32 = 1e-10;

#[derive(Clone, Debug)]
pub struct MfccExtractor {
    sample_rate: u32,
    filterbank: Vec<Vec<(usize, f32)>>,
}

impl MfccExtractor {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            filterbank: build_filterbank(sample_rate, FRAME_LEN, NUM_FILTERS),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Mean MFCC vector (13 coefficients) over all frames of the buffer.
    ///
    /// Fails with `AudioTooShort` when the buffer holds less than one frame.
    pub fn extract(&self, samples: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if samples.len() < FRAME_LEN {
            return Err(AnalysisError::AudioTooShort {
                actual_secs: samples.len() as f64 / self.sample_rate as f64,
                min_secs: FRAME_LEN as f64 / self.sample_rate as f64,
            });
        }

        let mut pooled = vec![0.0f32; NUM_COEFFICIENTS];
        let mut frames = 0usize;
        let mut windowed = vec![0.0f32; FRAME_LEN];

        let mut start = 0;
        while start + FRAME_LEN <= samples.len() {
            let frame = &samples[start..start + FRAME_LEN];
            for (i, (out, &s)) in windowed.iter_mut().zip(frame.iter()).enumerate() {
                *out = s * hamming(i, FRAME_LEN);
            }

            let spectrum = spectral::magnitude_spectrum_db(&windowed);
            let coefficients = self.cepstrum(&spectrum);
            for (acc, c) in pooled.iter_mut().zip(coefficients.iter()) {
                *acc += c;
            }

            frames += 1;
            start += HOP_LEN;
        }

        for acc in pooled.iter_mut() {
            *acc /= frames as f32;
        }
        Ok(pooled)
    }

    fn cepstrum(&self, spectrum: &[f32]) -> Vec<f32> {
        let mut log_energies = vec![0.0f32; NUM_FILTERS];
        for (filter, log_energy) in self.filterbank.iter().zip(log_energies.iter_mut()) {
            let energy: f32 = filter
                .iter()
                .map(|&(bin, weight)| spectrum.get(bin).copied().unwrap_or(0.0) * weight)
                .sum();
            *log_energy = energy.max(LOG_FLOOR).ln();
        }
        dct_ii(&log_energies, NUM_COEFFICIENTS)
    }
}

/// Type-II DCT of `input`, keeping the first `count` coefficients.
fn dct_ii(input: &[f32], count: usize) -> Vec<f32> {
    let m = input.len() as f32;
    (0..count)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(n, &v)| v * (PI * k as f32 * (n as f32 + 0.5) / m).cos())
                .sum()
        })
        .collect()
}

fn hamming(i: usize, len: usize) -> f32 {
    0.54 - 0.46 * (2.0 * PI * i as f32 / (len - 1) as f32).cos()
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank as per-filter `(bin, weight)` lists over the
/// magnitude spectrum of a `frame_len`-point FFT.
fn build_filterbank(sample_rate: u32, frame_len: usize, num_filters: usize) -> Vec<Vec<(usize, f32)>> {
    let nyquist = sample_rate as f32 / 2.0;
    let bin_width = sample_rate as f32 / frame_len as f32;
    let num_bins = frame_len / 2;

    let mel_high = hz_to_mel(nyquist);
    let points: Vec<f32> = (0..num_filters + 2)
        .map(|i| mel_to_hz(mel_high * i as f32 / (num_filters + 1) as f32))
        .collect();

    let mut filterbank = Vec::with_capacity(num_filters);
    for f in 0..num_filters {
        let (start, center, end) = (points[f], points[f + 1], points[f + 2]);
        let mut filter = Vec::new();
        for bin in 0..num_bins {
            let freq = bin as f32 * bin_width;
            if freq < start || freq > end {
                continue;
            }
            let weight = if freq <= center {
                if center > start { (freq - start) / (center - start) } else { 1.0 }
            } else if end > center {
                (end - freq) / (end - center)
            } else {
                1.0
            };
            if weight > 0.0 {
                filter.push((bin, weight));
            }
        }
        filterbank.push(filter);
    }
    filterbank
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI as PI32;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI32 * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn rejects_buffer_shorter_than_one_frame() {
        let extractor = MfccExtractor::new(16_000);
        let err = extractor.extract(&vec![0.0; FRAME_LEN - 1]).unwrap_err();
        assert!(matches!(err, AnalysisError::AudioTooShort { .. }));
    }

    #[test]
    fn yields_thirteen_finite_coefficients() {
        let extractor = MfccExtractor::new(16_000);
        let mfcc = extractor.extract(&sine(220.0, 16_000, 1.0)).unwrap();
        assert_eq!(mfcc.len(), NUM_COEFFICIENTS);
        assert!(mfcc.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn mel_conversion_round_trips() {
        for hz in [100.0f32, 440.0, 1000.0, 4000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 0.5);
        }
    }

    #[test]
    fn filterbank_covers_filters_with_nonempty_support() {
        let bank = build_filterbank(16_000, FRAME_LEN, NUM_FILTERS);
        assert_eq!(bank.len(), NUM_FILTERS);
        // Higher filters are wider; none past the first few may be empty.
        assert!(bank.iter().skip(2).all(|f| !f.is_empty()));
    }

    #[test]
    fn pooling_is_deterministic() {
        let extractor = MfccExtractor::new(16_000);
        let samples = sine(330.0, 16_000, 1.2);
        assert_eq!(
            extractor.extract(&samples).unwrap(),
            extractor.extract(&samples).unwrap()
        );
    }
}
