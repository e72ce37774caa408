// src/processing/pos.rs
//! Plane-Orthogonal-to-Skin pulse extraction
//!
//! Each sample is divided by the mean colour over a trailing temporal window,
//! projected onto two axes orthogonal to the skin tone, and the two
//! projections are combined with a per-block ratio of their spreads. Blocks
//! overlap by half and are summed (overlap-add without renormalisation), so
//! absolute amplitude is not meaningful downstream of this stage.

use crate::acquisition::RgbSample;
use crate::config::constants::pos::{
    MIN_BLOCK_LEN, MIN_CHANNEL_MEAN, MIN_PROJECTION_STD, MIN_SAMPLES, WINDOW_SECONDS,
};
use crate::utils::stats::population_std;

/// POS extractor parameterised by its temporal window length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosExtractor {
    window_seconds: f64,
}

impl Default for PosExtractor {
    fn default() -> Self {
        Self::new(WINDOW_SECONDS)
    }
}

impl PosExtractor {
    pub fn new(window_seconds: f64) -> Self {
        Self { window_seconds }
    }

    /// Temporal window in samples at `sample_rate`, at least one
    pub fn window_len(&self, sample_rate: f64) -> usize {
        let len = (self.window_seconds * sample_rate).round();
        if len.is_finite() && len >= 1.0 {
            len as usize
        } else {
            1
        }
    }

    /// Raw pulse signal, one value per input sample. Fewer than three samples
    /// yields an empty signal.
    pub fn extract(&self, samples: &[RgbSample], sample_rate: f64) -> Vec<f64> {
        let n = samples.len();
        if n < MIN_SAMPLES {
            return Vec::new();
        }

        let window_len = self.window_len(sample_rate);
        let (s1, s2) = project(samples, window_len);

        let block_len = window_len.max(MIN_BLOCK_LEN);
        let hop = (block_len / 2).max(1);
        let mut pulse = vec![0.0; n];

        let mut start = 0;
        while start < n {
            let end = (start + block_len).min(n);
            let block_s1 = &s1[start..end];
            let block_s2 = &s2[start..end];

            let std2 = population_std(block_s2);
            let alpha = if std2 > MIN_PROJECTION_STD {
                population_std(block_s1) / std2
            } else {
                1.0
            };

            for (offset, (a, b)) in block_s1.iter().zip(block_s2).enumerate() {
                pulse[start + offset] += a + alpha * b;
            }

            start += hop;
        }

        pulse
    }
}

/// Free-function form using the default 1.6 s window
pub fn pos_extract(samples: &[RgbSample], sample_rate: f64) -> Vec<f64> {
    PosExtractor::default().extract(samples, sample_rate)
}

/// Per-sample chrominance projections `(S1, S2)`. Samples whose trailing
/// window has a near-zero channel mean project to zero.
fn project(samples: &[RgbSample], window_len: usize) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len();
    let mut s1 = vec![0.0; n];
    let mut s2 = vec![0.0; n];

    // Running channel sums over the trailing window
    let (mut sum_r, mut sum_g, mut sum_b) = (0.0, 0.0, 0.0);
    for (i, sample) in samples.iter().enumerate() {
        sum_r += sample.r;
        sum_g += sample.g;
        sum_b += sample.b;
        if i >= window_len {
            let dropped = &samples[i - window_len];
            sum_r -= dropped.r;
            sum_g -= dropped.g;
            sum_b -= dropped.b;
        }

        let count = (i + 1).min(window_len) as f64;
        let (mean_r, mean_g, mean_b) = (sum_r / count, sum_g / count, sum_b / count);
        if mean_r < MIN_CHANNEL_MEAN || mean_g < MIN_CHANNEL_MEAN || mean_b < MIN_CHANNEL_MEAN {
            continue;
        }

        let cr = sample.r / mean_r;
        let cg = sample.g / mean_g;
        let cb = sample.b / mean_b;

        s1[i] = cg - cb;
        s2[i] = cg + cb - 2.0 * cr;
    }

    (s1, s2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn pulse_samples(len: usize, fs: f64, freq_hz: f64) -> Vec<RgbSample> {
        (0..len)
            .map(|i| {
                let t = i as f64 / fs;
                RgbSample::new(150.0, 150.0 + 2.0 * (2.0 * PI * freq_hz * t).sin(), 150.0, t * 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_too_few_samples() {
        let samples = pulse_samples(2, 30.0, 1.2);
        assert!(pos_extract(&samples, 30.0).is_empty());
    }

    #[test]
    fn test_output_length_matches_input() {
        for len in [3, 10, 47, 150, 451] {
            let samples = pulse_samples(len, 30.0, 1.2);
            assert_eq!(pos_extract(&samples, 30.0).len(), len);
        }
    }

    #[test]
    fn test_window_len() {
        let pos = PosExtractor::default();
        assert_eq!(pos.window_len(30.0), 48);
        assert_eq!(pos.window_len(15.0), 24);
        assert_eq!(pos.window_len(0.1), 1);
        assert_eq!(pos.window_len(f64::NAN), 1);
    }

    #[test]
    fn test_dark_frames_contribute_nothing() {
        let samples: Vec<RgbSample> = (0..40)
            .map(|i| RgbSample::new(0.0, 0.0, 0.0, i as f64))
            .collect();
        let out = pos_extract(&samples, 30.0);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_colour_is_flat() {
        let samples: Vec<RgbSample> = (0..90)
            .map(|i| RgbSample::new(120.0, 100.0, 80.0, i as f64))
            .collect();
        let out = pos_extract(&samples, 30.0);
        assert!(out.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_pulse_modulates_output() {
        let samples = pulse_samples(150, 30.0, 1.2);
        let out = pos_extract(&samples, 30.0);
        assert!(out.iter().all(|v| v.is_finite()));
        assert!(population_std(&out) > 1e-4);
    }
}
