// src/processing/spectrum.rs
//! Magnitude spectrum and band-limited peak search
//!
//! The real signal is zero-padded to a power of two and transformed with a
//! forward FFT. Only the first half of the bins (up to Nyquist) is returned.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Dominant spectral peak inside a frequency band
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPeak {
    /// Interpolated peak frequency in Hz
    pub frequency: f64,
    /// Magnitude of the strongest bin
    pub magnitude: f64,
    /// Magnitude spectrum the peak was picked from (N/2 bins)
    pub spectrum: Vec<f64>,
}

/// Smallest power of two `>= n`; `next_power_of_two(0) == 1`
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Magnitudes of the first `N/2` bins, `N` being the padded length
pub fn fft_magnitude(signal: &[f64]) -> Vec<f64> {
    let n = next_power_of_two(signal.len());
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&re| Complex::new(re, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(n)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer[..n / 2].iter().map(|c| c.norm()).collect()
}

/// Strongest bin of `signal` between `min_hz` and `max_hz`, refined by
/// parabolic interpolation over its neighbours. DC is never a candidate.
pub fn dominant_frequency(signal: &[f64], sample_rate: f64, min_hz: f64, max_hz: f64) -> SpectralPeak {
    let spectrum = fft_magnitude(signal);
    let n = spectrum.len() * 2;

    if spectrum.len() < 2 || sample_rate <= 0.0 {
        return SpectralPeak {
            frequency: 0.0,
            magnitude: 0.0,
            spectrum,
        };
    }

    let last = spectrum.len() - 1;
    let min_bin = ((min_hz * n as f64 / sample_rate).floor().max(1.0) as usize).min(last);
    let max_bin = ((max_hz * n as f64 / sample_rate).ceil().max(0.0) as usize).min(last);

    let mut peak_bin = min_bin;
    let mut peak_magnitude = 0.0;
    for (bin, &magnitude) in spectrum.iter().enumerate().take(max_bin + 1).skip(min_bin) {
        if magnitude > peak_magnitude {
            peak_magnitude = magnitude;
            peak_bin = bin;
        }
    }

    let offset = if peak_bin > 0 && peak_bin < last {
        let alpha = spectrum[peak_bin - 1];
        let beta = spectrum[peak_bin];
        let gamma = spectrum[peak_bin + 1];
        let denominator = alpha - 2.0 * beta + gamma;
        if denominator != 0.0 {
            0.5 * (alpha - gamma) / denominator
        } else {
            0.0
        }
    } else {
        0.0
    };

    SpectralPeak {
        frequency: (peak_bin as f64 + offset) * sample_rate / n as f64,
        magnitude: peak_magnitude,
        spectrum,
    }
}

/// Frequency in Hz to beats per minute, one decimal place
pub fn frequency_to_bpm(frequency: f64) -> f64 {
    (frequency * 60.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(150), 256);
        assert_eq!(next_power_of_two(256), 256);
        assert_eq!(next_power_of_two(257), 512);
    }

    #[test]
    fn test_bin_centred_tone_magnitude() {
        // 8 cycles over 128 samples land exactly on bin 8 with magnitude N/2
        let signal: Vec<f64> = (0..128)
            .map(|i| 3.0 * (2.0 * PI * 8.0 * i as f64 / 128.0).cos())
            .collect();
        let spectrum = fft_magnitude(&signal);

        assert_eq!(spectrum.len(), 64);
        assert!((spectrum[8] - 3.0 * 64.0).abs() < 1e-9, "{}", spectrum[8]);
        for (bin, &magnitude) in spectrum.iter().enumerate().filter(|&(bin, _)| bin != 8) {
            assert!(magnitude < 1e-9, "bin {} = {}", bin, magnitude);
        }
    }

    #[test]
    fn test_zero_padding_keeps_dc() {
        // Constant input: DC bin holds the sum, padding adds nothing
        let spectrum = fft_magnitude(&[2.0; 100]);
        assert_eq!(spectrum.len(), 64);
        assert!((spectrum[0] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_frequency_recovers_tone() {
        let fs = 30.0;
        let n = 256.0;
        for &f in &[1.0, 1.5, 2.0] {
            let peak = dominant_frequency(&tone(f, fs, 256), fs, 0.7, 4.0);
            let bin_width = fs / n;
            assert!((peak.frequency - f).abs() < bin_width, "{} -> {}", f, peak.frequency);
            assert!((peak.frequency - f).abs() < 0.05, "{} -> {}", f, peak.frequency);
            assert_eq!(peak.spectrum.len(), 128);
        }
    }

    #[test]
    fn test_peak_outside_band_ignored() {
        let fs = 30.0;
        let signal: Vec<f64> = tone(0.2, fs, 256)
            .iter()
            .zip(tone(2.0, fs, 256))
            .map(|(a, b)| 2.0 * a + b)
            .collect();
        let peak = dominant_frequency(&signal, fs, 0.7, 4.0);
        assert!((peak.frequency - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = dominant_frequency(&[], 30.0, 0.7, 4.0);
        assert_eq!(empty.frequency, 0.0);
        assert!(empty.spectrum.is_empty());

        let flat = dominant_frequency(&[0.0; 64], 30.0, 0.7, 4.0);
        assert_eq!(flat.magnitude, 0.0);
        assert!(flat.frequency.is_finite());
    }

    #[test]
    fn test_frequency_to_bpm() {
        assert_eq!(frequency_to_bpm(1.2), 72.0);
        assert_eq!(frequency_to_bpm(1.18837), 71.3);
    }
}
