//! Prosodic feature extraction: pitch, energy, voice-quality and spectral
//! shape descriptors for a single utterance buffer.

use serde::{Deserialize, Serialize};

use crate::spectral;

/// Lower bound of the pitch search range in Hz.
pub const PITCH_MIN_HZ: f32 = 80.0;
/// Upper bound of the pitch search range in Hz.
pub const PITCH_MAX_HZ: f32 = 800.0;
/// Speech band considered for formant candidates, in Hz.
pub const FORMANT_BAND_HZ: (f32, f32) = (80.0, 4000.0);

const ANALYSIS_FRAME_LEN: usize = 2048;
const PITCH_WINDOW_LEN: usize = 8192;
const FORMANT_SMOOTHING_WINDOW: usize = 5;
const FORMANT_PEAK_THRESHOLD: f32 = 0.3;
const HNR_HARMONICS: usize = 6;
const HNR_BIN_SPREAD: usize = 2;
const VOT_WINDOW_SECS: f32 = 0.025;
const VOT_ENERGY_THRESHOLD: f32 = 0.02;
const VOT_PERIODICITY_THRESHOLD: f32 = 0.3;
const MIN_PERIODS_FOR_PERTURBATION: usize = 3;

/// Acoustic features of one analyzed buffer. Immutable once computed.
///
/// `formant_frequencies` always holds exactly three values, zero-padded and
/// ordered by descending spectral magnitude (not ascending frequency).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AcousticFeatures {
    pub pitch_hz: f32,
    pub energy: f32,
    pub spectral_centroid_hz: f32,
    pub zero_crossing_rate: f32,
    pub spectral_rolloff_hz: f32,
    pub jitter: f32,
    pub shimmer: f32,
    pub formant_frequencies: [f32; 3],
    pub harmonic_to_noise_ratio_db: f32,
    pub voice_onset_time_secs: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ProsodicFeatureExtractor {
    sample_rate: u32,
}

impl ProsodicFeatureExtractor {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Extract the full prosodic feature set from a mono sample buffer.
    pub fn extract(&self, samples: &[f32]) -> AcousticFeatures {
        let pitch = self.pitch(samples);
        let frame = self.analysis_frame(samples);
        let spectrum = spectral::magnitude_spectrum(&frame);
        let (jitter, shimmer) = self.perturbation(samples, pitch);

        AcousticFeatures {
            pitch_hz: pitch,
            energy: self.energy(samples),
            spectral_centroid_hz: self.spectral_centroid(&spectrum),
            zero_crossing_rate: zero_crossing_rate(samples),
            spectral_rolloff_hz: self.spectral_rolloff(&spectrum),
            jitter,
            shimmer,
            formant_frequencies: self.formants(&spectrum),
            harmonic_to_noise_ratio_db: self.harmonic_to_noise_ratio(&spectrum, pitch),
            voice_onset_time_secs: self.voice_onset_time(samples),
        }
    }

    /// Fundamental frequency estimate via normalized autocorrelation over the
    /// 80-800 Hz lag range.
    ///
    /// When no lag yields a positive correlation (silence, unvoiced frames)
    /// this falls through to the minimum lag, i.e. the upper pitch bound.
    /// There is no explicit "unvoiced" signal.
    pub fn pitch(&self, samples: &[f32]) -> f32 {
        self.pitch_with_periodicity(samples).0
    }

    fn pitch_with_periodicity(&self, samples: &[f32]) -> (f32, f32) {
        let window = &samples[..samples.len().min(PITCH_WINDOW_LEN)];
        let min_lag = ((self.sample_rate as f32 / PITCH_MAX_HZ) as usize).max(1);
        let max_lag = ((self.sample_rate as f32 / PITCH_MIN_HZ) as usize)
            .min(window.len().saturating_sub(1));

        let mut best_lag = min_lag;
        let mut best_corr = 0.0f32;
        for lag in min_lag..=max_lag {
            let mut corr = 0.0f32;
            let mut norm = 0.0f32;
            for i in 0..window.len() - lag {
                corr += window[i] * window[i + lag];
                norm += window[i] * window[i];
            }
            let normalized = if norm > 0.0 { corr / norm } else { 0.0 };
            if normalized > best_corr {
                best_corr = normalized;
                best_lag = lag;
            }
        }

        (self.sample_rate as f32 / best_lag as f32, best_corr)
    }

    /// RMS energy mapped to [0, 1] over a -60..0 dB window with a -80 dB floor.
    pub fn energy(&self, samples: &[f32]) -> f32 {
        let rms = rms(samples);
        let db = if rms > 0.0 {
            (20.0 * rms.log10()).max(-80.0)
        } else {
            -80.0
        };
        ((db + 60.0) / 60.0).clamp(0.0, 1.0)
    }

    /// Magnitude-weighted mean frequency of the spectrum.
    pub fn spectral_centroid(&self, spectrum: &[f32]) -> f32 {
        let frame_len = spectrum.len() * 2;
        let mut weighted = 0.0f32;
        let mut total = 0.0f32;
        for (i, &m) in spectrum.iter().enumerate() {
            weighted += spectral::bin_frequency(i, frame_len, self.sample_rate) * m;
            total += m;
        }
        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }

    /// Lowest frequency at which cumulative magnitude reaches 85% of total.
    pub fn spectral_rolloff(&self, spectrum: &[f32]) -> f32 {
        let frame_len = spectrum.len() * 2;
        let total: f32 = spectrum.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let target = total * 0.85;
        let mut cumulative = 0.0f32;
        for (i, &m) in spectrum.iter().enumerate() {
            cumulative += m;
            if cumulative >= target {
                return spectral::bin_frequency(i, frame_len, self.sample_rate);
            }
        }
        spectral::bin_frequency(spectrum.len() - 1, frame_len, self.sample_rate)
    }

    /// Jitter and shimmer from pitch-period segmentation.
    ///
    /// Periods are delimited by upward zero crossings within 50-150% of the
    /// period length implied by the pitch estimate. Both metrics are 0 when
    /// fewer than three periods can be segmented.
    pub fn perturbation(&self, samples: &[f32], pitch_hz: f32) -> (f32, f32) {
        if pitch_hz <= 0.0 {
            return (0.0, 0.0);
        }
        let expected = self.sample_rate as f32 / pitch_hz;

        let mut crossings = Vec::new();
        for i in 1..samples.len() {
            if samples[i - 1] < 0.0 && samples[i] >= 0.0 {
                crossings.push(i);
            }
        }

        let mut periods = Vec::new();
        let mut peaks = Vec::new();
        for pair in crossings.windows(2) {
            let length = (pair[1] - pair[0]) as f32;
            if length >= expected * 0.5 && length <= expected * 1.5 {
                periods.push(length);
                let peak = samples[pair[0]..pair[1]]
                    .iter()
                    .fold(0.0f32, |acc, &s| acc.max(s.abs()));
                peaks.push(peak);
            }
        }

        if periods.len() < MIN_PERIODS_FOR_PERTURBATION {
            return (0.0, 0.0);
        }

        (relative_variation(&periods), relative_variation(&peaks))
    }

    /// Up to three formant candidates from the smoothed magnitude spectrum,
    /// strongest first, zero-padded to exactly three.
    pub fn formants(&self, spectrum: &[f32]) -> [f32; 3] {
        let smoothed = moving_average(spectrum, FORMANT_SMOOTHING_WINDOW);
        let peak = smoothed.iter().fold(0.0f32, |acc, &m| acc.max(m));
        if peak <= 0.0 {
            return [0.0; 3];
        }

        let frame_len = spectrum.len() * 2;
        let mut candidates = Vec::new();
        for i in 1..smoothed.len().saturating_sub(1) {
            let m = smoothed[i];
            if m > smoothed[i - 1] && m > smoothed[i + 1] && m > peak * FORMANT_PEAK_THRESHOLD {
                let freq = spectral::bin_frequency(i, frame_len, self.sample_rate);
                if freq >= FORMANT_BAND_HZ.0 && freq <= FORMANT_BAND_HZ.1 {
                    candidates.push((freq, m));
                }
            }
        }
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut formants = [0.0f32; 3];
        for (slot, candidate) in formants.iter_mut().zip(candidates.iter()) {
            *slot = candidate.0;
        }
        formants
    }

    /// Harmonic-to-noise ratio in dB over the fundamental and its first five
    /// harmonics, each covering a +/-2 bin window.
    pub fn harmonic_to_noise_ratio(&self, spectrum: &[f32], pitch_hz: f32) -> f32 {
        if pitch_hz <= 0.0 || spectrum.is_empty() {
            return 0.0;
        }
        let frame_len = spectrum.len() * 2;
        let bin_width = self.sample_rate as f32 / frame_len as f32;
        let fundamental_bin = (pitch_hz / bin_width).round() as usize;

        let total: f32 = spectrum.iter().map(|&m| m * m).sum();
        let mut harmonic = 0.0f32;
        for h in 1..=HNR_HARMONICS {
            let center = fundamental_bin * h;
            let lo = center.saturating_sub(HNR_BIN_SPREAD);
            let hi = (center + HNR_BIN_SPREAD).min(spectrum.len().saturating_sub(1));
            if lo >= spectrum.len() {
                break;
            }
            for &m in &spectrum[lo..=hi] {
                harmonic += m * m;
            }
        }

        let noise = total - harmonic;
        if noise <= 0.0 || harmonic <= 0.0 {
            return 0.0;
        }
        10.0 * (harmonic / noise).log10()
    }

    /// First 25 ms window whose RMS exceeds the onset threshold and whose
    /// following window carries periodic pitch above 80 Hz; 0 when never
    /// detected.
    pub fn voice_onset_time(&self, samples: &[f32]) -> f32 {
        let window = (self.sample_rate as f32 * VOT_WINDOW_SECS) as usize;
        if window == 0 || samples.len() < window * 2 {
            return 0.0;
        }

        let windows: Vec<&[f32]> = samples.chunks_exact(window).collect();
        for i in 0..windows.len().saturating_sub(1) {
            if rms(windows[i]) > VOT_ENERGY_THRESHOLD {
                let (pitch, periodicity) = self.pitch_with_periodicity(windows[i + 1]);
                if periodicity > VOT_PERIODICITY_THRESHOLD && pitch > PITCH_MIN_HZ {
                    return (i * window) as f32 / self.sample_rate as f32;
                }
            }
        }
        0.0
    }

    fn analysis_frame(&self, samples: &[f32]) -> Vec<f32> {
        let mut frame = vec![0.0f32; ANALYSIS_FRAME_LEN];
        let n = samples.len().min(ANALYSIS_FRAME_LEN);
        frame[..n].copy_from_slice(&samples[..n]);
        frame
    }
}

/// Sign-change count divided by `N - 1`.
pub fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / (samples.len() - 1) as f32
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|&s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn relative_variation(values: &[f32]) -> f32 {
    let mean: f32 = values.iter().sum::<f32>() / values.len() as f32;
    if mean <= 0.0 {
        return 0.0;
    }
    let variation: f32 = values
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .sum::<f32>()
        / (values.len() - 1) as f32;
    variation / mean
}

fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            values[lo..hi].iter().sum::<f32>() / (hi - lo) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn sine_220hz_pitch_within_5hz() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        let samples = sine(220.0, 16_000, 1.0);
        let pitch = extractor.pitch(&samples);
        assert!((pitch - 220.0).abs() <= 5.0, "pitch estimate {pitch}");
    }

    #[test]
    fn silence_falls_back_to_upper_pitch_bound() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        let pitch = extractor.pitch(&vec![0.0; 16_000]);
        assert_eq!(pitch, 800.0);
    }

    #[test]
    fn formants_always_have_length_three() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        let silent = extractor.extract(&vec![0.0; 16_000]);
        assert_eq!(silent.formant_frequencies.len(), 3);
        assert_eq!(silent.formant_frequencies, [0.0; 3]);

        let voiced = extractor.extract(&sine(220.0, 16_000, 1.0));
        assert_eq!(voiced.formant_frequencies.len(), 3);
    }

    #[test]
    fn energy_is_zero_for_silence_and_rises_with_amplitude() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        assert_eq!(extractor.energy(&vec![0.0; 1024]), 0.0);

        let quiet: Vec<f32> = sine(220.0, 16_000, 0.25).iter().map(|s| s * 0.05).collect();
        let loud = sine(220.0, 16_000, 0.25);
        assert!(extractor.energy(&loud) > extractor.energy(&quiet));
    }

    #[test]
    fn zcr_of_alternating_signal_is_one() {
        let samples: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((zero_crossing_rate(&samples) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn steady_sine_has_low_jitter_and_shimmer() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        let samples = sine(220.0, 16_000, 1.0);
        let pitch = extractor.pitch(&samples);
        let (jitter, shimmer) = extractor.perturbation(&samples, pitch);
        assert!(jitter < 0.05, "jitter {jitter}");
        assert!(shimmer < 0.05, "shimmer {shimmer}");
    }

    #[test]
    fn perturbation_is_zero_below_three_periods() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        // A fraction of one period cannot be segmented.
        let samples = sine(220.0, 16_000, 0.002);
        assert_eq!(extractor.perturbation(&samples, 220.0), (0.0, 0.0));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = ProsodicFeatureExtractor::new(16_000);
        let samples = sine(180.0, 16_000, 1.5);
        assert_eq!(extractor.extract(&samples), extractor.extract(&samples));
    }
}
