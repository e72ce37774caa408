// src/processing/pulse.rs
//! One full rPPG pass: POS, detrend, bandpass, spectral peak and confidence

use super::detrend::{detrend, normalize};
use super::filters::{filter_signal, BiquadCoefficients};
use super::pos::PosExtractor;
use super::spectrum::{dominant_frequency, frequency_to_bpm};
use crate::acquisition::RgbSample;
use crate::config::constants::confidence::{SNR_FLOOR, SNR_SPAN};
use crate::config::PulseConfig;
use serde::{Deserialize, Serialize};

/// Outcome of a successful pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseResult {
    /// Raw estimate, one decimal place
    pub bpm: f64,
    pub confidence: f64,
    /// Normalised filtered signal, full length
    pub waveform: Vec<f64>,
    /// Detrended, bandpassed signal the spectrum was taken from
    pub raw_signal: Vec<f64>,
    pub spectrum: Vec<f64>,
    pub sample_rate: f64,
}

/// Pass parameters, taken from the `signal` and `band` config sections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseProcessor {
    pos: PosExtractor,
    min_hz: f64,
    max_hz: f64,
    min_process_seconds: f64,
}

impl Default for PulseProcessor {
    fn default() -> Self {
        Self::from_config(&PulseConfig::default())
    }
}

impl PulseProcessor {
    pub fn from_config(config: &PulseConfig) -> Self {
        Self {
            pos: PosExtractor::new(config.signal.pos_window_seconds),
            min_hz: config.band.min_hz,
            max_hz: config.band.max_hz,
            min_process_seconds: config.signal.min_process_seconds,
        }
    }

    /// Run one pass over `samples`. Returns `None` while fewer than
    /// `sample_rate × min_process_seconds` samples are available.
    pub fn process(&self, samples: &[RgbSample], sample_rate: f64) -> Option<PulseResult> {
        if (samples.len() as f64) < sample_rate * self.min_process_seconds {
            return None;
        }

        let pulse = self.pos.extract(samples, sample_rate);
        if pulse.is_empty() {
            return None;
        }

        let detrended = detrend(&pulse);
        let coeffs = BiquadCoefficients::butterworth_bandpass(self.min_hz, self.max_hz, sample_rate);
        let filtered = filter_signal(&detrended, &coeffs);
        let waveform = normalize(&filtered);

        let peak = dominant_frequency(&filtered, sample_rate, self.min_hz, self.max_hz);
        let confidence = band_confidence(
            &peak.spectrum,
            peak.magnitude,
            sample_rate,
            self.min_hz,
            self.max_hz,
        );

        Some(PulseResult {
            bpm: frequency_to_bpm(peak.frequency),
            confidence,
            waveform,
            raw_signal: filtered,
            spectrum: peak.spectrum,
            sample_rate,
        })
    }
}

/// Default-parameter pass over `samples`
pub fn process_rppg(samples: &[RgbSample], sample_rate: f64) -> Option<PulseResult> {
    PulseProcessor::default().process(samples, sample_rate)
}

/// Peak magnitude over mean in-band magnitude, mapped linearly from
/// `[1.5, 6.5]` onto `[0, 1]`.
///
/// Bins are mapped with `N = 2 × spectrum.len()`. For the padded spectra
/// produced by [`dominant_frequency`] this is the transform length.
pub fn band_confidence(
    spectrum: &[f64],
    peak_magnitude: f64,
    sample_rate: f64,
    min_hz: f64,
    max_hz: f64,
) -> f64 {
    let snr = band_snr(spectrum, peak_magnitude, sample_rate, min_hz, max_hz);
    ((snr - SNR_FLOOR) / SNR_SPAN).clamp(0.0, 1.0)
}

/// SNR-like ratio of `peak_magnitude` to the mean in-band magnitude
pub fn band_snr(
    spectrum: &[f64],
    peak_magnitude: f64,
    sample_rate: f64,
    min_hz: f64,
    max_hz: f64,
) -> f64 {
    let n = (spectrum.len() * 2) as f64;
    let min_bin = (min_hz * n / sample_rate).floor().max(1.0);
    let max_bin = (max_hz * n / sample_rate)
        .ceil()
        .min(spectrum.len() as f64 - 1.0);

    let mean_power = if max_bin >= min_bin {
        let band = &spectrum[min_bin as usize..=max_bin as usize];
        band.iter().sum::<f64>() / band.len() as f64
    } else {
        1.0
    };

    if mean_power > 0.0 {
        peak_magnitude / mean_power
    } else {
        0.0
    }
}
