// src/processing/filters/biquad.rs
//! Second-order Butterworth bandpass biquad

use super::{BiquadCoefficients, FilterState};
use std::f64::consts::{LN_2, PI};

impl BiquadCoefficients {
    /// Bandpass section centred on the geometric mean of `low_hz` and `high_hz`
    pub fn butterworth_bandpass(low_hz: f64, high_hz: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * PI * (low_hz * high_hz).sqrt() / sample_rate;
        let bw = 2.0 * PI * (high_hz - low_hz) / sample_rate;

        let sin_w0 = w0.sin();
        let cos_w0 = w0.cos();
        let alpha = sin_w0 * ((LN_2 / 2.0) * (bw / sin_w0)).sinh();

        let a0 = 1.0 + alpha;

        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Run one sample through the section, advancing `state`
    pub fn process_sample(&self, sample: f64, state: &mut FilterState) -> f64 {
        let y = self.b0 * sample + self.b1 * state.x1 + self.b2 * state.x2
            - self.a1 * state.y1
            - self.a2 * state.y2;

        state.x2 = state.x1;
        state.x1 = sample;
        state.y2 = state.y1;
        state.y1 = y;

        y
    }
}

/// Filter a whole buffer, threading a freshly zeroed state through it in order
pub fn filter_signal(signal: &[f64], coeffs: &BiquadCoefficients) -> Vec<f64> {
    let mut state = FilterState::new();
    signal
        .iter()
        .map(|&x| coeffs.process_sample(x, &mut state))
        .collect()
}

/// Streaming bandpass filter that owns its state
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    coefficients: BiquadCoefficients,
    state: FilterState,
}

impl BandpassFilter {
    pub fn new(low_hz: f64, high_hz: f64, sample_rate: f64) -> Self {
        Self {
            coefficients: BiquadCoefficients::butterworth_bandpass(low_hz, high_hz, sample_rate),
            state: FilterState::new(),
        }
    }

    pub fn process_sample(&mut self, sample: f64) -> f64 {
        self.coefficients.process_sample(sample, &mut self.state)
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.state = FilterState::new();
    }
}
