//! Windowed FFT magnitude computation.
//!
//! Frames must have power-of-two length; callers pad or truncate. The FFT
//! scratch buffers are scoped to each call, so concurrent analyses over
//! independent buffers never share state.

use rustfft::{num_complex::Complex, FftPlanner};

/// Floor applied before log conversion to keep the dB spectrum finite.
pub const DB_FLOOR: f32 = 1e-10;

/// Magnitude spectrum of a real frame, length `frame.len() / 2`.
///
/// Linear magnitudes; this variant feeds the centroid, rolloff, formant and
/// HNR paths. Non-power-of-two input is an unchecked precondition.
pub fn magnitude_spectrum(frame: &[f32]) -> Vec<f32> {
    debug_assert!(frame.len().is_power_of_two(), "frame length must be a power of two");

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame.len());

    let mut buffer: Vec<Complex<f32>> = frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    buffer[..frame.len() / 2].iter().map(|c| c.norm()).collect()
}

/// Magnitude spectrum converted to decibels.
///
/// This variant feeds the mel-filterbank path only.
pub fn magnitude_spectrum_db(frame: &[f32]) -> Vec<f32> {
    magnitude_spectrum(frame)
        .into_iter()
        .map(|m| 20.0 * m.max(DB_FLOOR).log10())
        .collect()
}

/// Frequency in Hz of bin `index` for the given frame length and sample rate.
pub fn bin_frequency(index: usize, frame_len: usize, sample_rate: u32) -> f32 {
    index as f32 * sample_rate as f32 / frame_len as f32
}
