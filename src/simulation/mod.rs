// src/simulation/mod.rs
//! Synthetic face capture for testing without a camera
//!
//! Produces the frames a face detector would report for a subject with a
//! known heart rate: skin colour modulated by the pulse, sensor noise, a
//! slow global illumination drift, small ROI jitter and occasional lost faces.

use crate::acquisition::{CaptureFrame, FaceObservation, RoiCenter, RoiColor};
use crate::error::{PulseError, RppgResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Relative pulse strength per channel; haemoglobin absorbs green most
const CHANNEL_PULSE_WEIGHTS: (f64, f64, f64) = (0.35, 1.0, 0.55);
const ILLUMINATION_DRIFT_HZ: f64 = 0.08;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticFaceConfig {
    pub heart_rate_bpm: f64,
    pub frame_rate_hz: f64,
    /// Peak pulse amplitude on the green channel, in 8-bit colour units
    pub pulse_amplitude: f64,
    pub skin_tone: (f64, f64, f64),
    /// Standard deviation of per-channel Gaussian sensor noise
    pub noise_std: f64,
    /// Relative amplitude of a slow brightness change applied to all channels
    pub illumination_drift: f64,
    pub roi_center: (f64, f64),
    pub roi_jitter_px: f64,
    /// Probability that a frame has no detected face
    pub dropout_probability: f64,
    pub seed: u64,
}

impl Default for SyntheticFaceConfig {
    fn default() -> Self {
        Self {
            heart_rate_bpm: 72.0,
            frame_rate_hz: 30.0,
            pulse_amplitude: 1.0,
            skin_tone: (170.0, 130.0, 110.0),
            noise_std: 0.1,
            illumination_drift: 0.02,
            roi_center: (320.0, 240.0),
            roi_jitter_px: 0.5,
            dropout_probability: 0.0,
            seed: 42,
        }
    }
}

/// Deterministic frame generator
pub struct SyntheticFaceSource {
    config: SyntheticFaceConfig,
    rng: StdRng,
    noise: Normal<f64>,
    jitter: Normal<f64>,
    frame_index: u64,
}

impl SyntheticFaceSource {
    pub fn new(config: SyntheticFaceConfig) -> RppgResult<Self> {
        if !(config.frame_rate_hz.is_finite() && config.frame_rate_hz > 0.0) {
            return Err(PulseError::configuration(
                "simulation",
                format!("frame_rate_hz must be positive, got {}", config.frame_rate_hz),
            ));
        }
        if !(0.0..=1.0).contains(&config.dropout_probability) {
            return Err(PulseError::configuration(
                "simulation",
                "dropout_probability must be within [0, 1]",
            ));
        }
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| PulseError::configuration("simulation", format!("noise_std: {}", e)))?;
        let jitter = Normal::new(0.0, config.roi_jitter_px)
            .map_err(|e| PulseError::configuration("simulation", format!("roi_jitter_px: {}", e)))?;

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            noise,
            jitter,
            frame_index: 0,
            config,
        })
    }

    pub fn config(&self) -> &SyntheticFaceConfig {
        &self.config
    }

    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.config.frame_rate_hz
    }

    pub fn frames_generated(&self) -> u64 {
        self.frame_index
    }

    pub fn next_frame(&mut self) -> CaptureFrame {
        let index = self.frame_index;
        self.frame_index += 1;

        let t = index as f64 / self.config.frame_rate_hz;
        let timestamp_ms = index as f64 * 1000.0 / self.config.frame_rate_hz;

        if self.config.dropout_probability > 0.0
            && self.rng.gen::<f64>() < self.config.dropout_probability
        {
            return CaptureFrame {
                timestamp_ms,
                face: None,
            };
        }

        let pulse = self.config.pulse_amplitude
            * (2.0 * PI * self.config.heart_rate_bpm / 60.0 * t).sin();
        let illumination =
            1.0 + self.config.illumination_drift * (2.0 * PI * ILLUMINATION_DRIFT_HZ * t).sin();
        let (base_r, base_g, base_b) = self.config.skin_tone;
        let (w_r, w_g, w_b) = CHANNEL_PULSE_WEIGHTS;

        let color = RoiColor {
            r: (base_r + w_r * pulse) * illumination + self.noise.sample(&mut self.rng),
            g: (base_g + w_g * pulse) * illumination + self.noise.sample(&mut self.rng),
            b: (base_b + w_b * pulse) * illumination + self.noise.sample(&mut self.rng),
        };

        let (cx, cy) = self.config.roi_center;
        let center = RoiCenter::new(
            cx + self.jitter.sample(&mut self.rng),
            cy + self.jitter.sample(&mut self.rng),
        );

        CaptureFrame {
            timestamp_ms,
            face: Some(FaceObservation {
                center,
                color: Some(color),
            }),
        }
    }

    /// The next `count` frames
    pub fn take_frames(&mut self, count: usize) -> Vec<CaptureFrame> {
        (0..count).map(|_| self.next_frame()).collect()
    }
}

impl Iterator for SyntheticFaceSource {
    type Item = CaptureFrame;

    fn next(&mut self) -> Option<CaptureFrame> {
        Some(self.next_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = SyntheticFaceSource::new(SyntheticFaceConfig::default()).expect("valid");
        let mut b = SyntheticFaceSource::new(SyntheticFaceConfig::default()).expect("valid");
        assert_eq!(a.take_frames(20), b.take_frames(20));
    }

    #[test]
    fn test_timestamps_follow_frame_rate() {
        let mut source = SyntheticFaceSource::new(SyntheticFaceConfig {
            frame_rate_hz: 25.0,
            ..Default::default()
        })
        .expect("valid");
        let frames = source.take_frames(3);
        assert_eq!(frames[0].timestamp_ms, 0.0);
        assert_eq!(frames[2].timestamp_ms, 80.0);
        assert_eq!(source.frames_generated(), 3);
    }

    #[test]
    fn test_full_dropout() {
        let mut source = SyntheticFaceSource::new(SyntheticFaceConfig {
            dropout_probability: 1.0,
            ..Default::default()
        })
        .expect("valid");
        assert!(source.take_frames(10).iter().all(|f| f.face.is_none()));
    }

    #[test]
    fn test_colour_stays_near_skin_tone() {
        let mut source = SyntheticFaceSource::new(SyntheticFaceConfig::default()).expect("valid");
        for frame in source.take_frames(300) {
            let color = frame.face.and_then(|f| f.color).expect("face with colour");
            assert!((color.g - 130.0).abs() < 10.0);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_noise = SyntheticFaceConfig {
            noise_std: -1.0,
            ..Default::default()
        };
        assert!(SyntheticFaceSource::new(bad_noise).is_err());

        let bad_rate = SyntheticFaceConfig {
            frame_rate_hz: 0.0,
            ..Default::default()
        };
        assert!(SyntheticFaceSource::new(bad_rate).is_err());
    }
}
