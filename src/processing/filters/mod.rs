// src/processing/filters/mod.rs
//! Digital filters for pulse signal processing

pub mod biquad;

pub use biquad::*;

/// Coefficients of a normalised biquad section (`a0` folded in)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Two-tap delay line of a biquad section, owned by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }
}
