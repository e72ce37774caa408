// src/config/mod.rs
//! Pipeline configuration

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::ConfigLoader;

use crate::error::{PulseError, RppgResult};
use serde::{Deserialize, Serialize};

/// Complete pipeline configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PulseConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub band: BandConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Buffering and window lengths, all in seconds of signal
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SignalConfig {
    #[serde(default = "defaults::sample_rate_hz")]
    pub sample_rate_hz: f64,

    #[serde(default = "defaults::buffer_seconds")]
    pub buffer_seconds: f64,

    #[serde(default = "defaults::min_process_seconds")]
    pub min_process_seconds: f64,

    #[serde(default = "defaults::waveform_seconds")]
    pub waveform_seconds: f64,

    #[serde(default = "defaults::pos_window_seconds")]
    pub pos_window_seconds: f64,
}

/// Heart-rate band searched by the filter and the spectral estimator
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BandConfig {
    #[serde(default = "defaults::min_hz")]
    pub min_hz: f64,

    #[serde(default = "defaults::max_hz")]
    pub max_hz: f64,
}

/// Validity gate applied to raw BPM readings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GateConfig {
    #[serde(default = "defaults::min_bpm")]
    pub min_bpm: f64,

    #[serde(default = "defaults::max_bpm")]
    pub max_bpm: f64,

    #[serde(default = "defaults::min_confidence")]
    pub min_confidence: f64,
}

/// ROI motion estimation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MotionConfig {
    #[serde(default = "defaults::history_len")]
    pub history_len: usize,

    #[serde(default = "defaults::recent_samples")]
    pub recent_samples: usize,

    #[serde(default = "defaults::full_scale_px")]
    pub full_scale_px: f64,
}

/// BPM median smoothing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmoothingConfig {
    #[serde(default = "defaults::smoothing_window")]
    pub window: usize,
}

/// Worker and capture-side cadence
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkerConfig {
    #[serde(default = "defaults::process_interval_ms")]
    pub process_interval_ms: u64,

    #[serde(default = "defaults::frame_rate_window_ms")]
    pub frame_rate_window_ms: f64,

    #[serde(default = "defaults::calibration_samples")]
    pub calibration_samples: usize,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn sample_rate_hz() -> f64 { signal::DEFAULT_SAMPLE_RATE_HZ }
    pub fn buffer_seconds() -> f64 { signal::BUFFER_SECONDS }
    pub fn min_process_seconds() -> f64 { signal::MIN_PROCESS_SECONDS }
    pub fn waveform_seconds() -> f64 { signal::WAVEFORM_SECONDS }
    pub fn pos_window_seconds() -> f64 { pos::WINDOW_SECONDS }

    pub fn min_hz() -> f64 { band::MIN_HR_HZ }
    pub fn max_hz() -> f64 { band::MAX_HR_HZ }

    pub fn min_bpm() -> f64 { gate::MIN_BPM }
    pub fn max_bpm() -> f64 { gate::MAX_BPM }
    pub fn min_confidence() -> f64 { gate::MIN_CONFIDENCE }

    pub fn history_len() -> usize { motion::HISTORY_LEN }
    pub fn recent_samples() -> usize { motion::RECENT_SAMPLES }
    pub fn full_scale_px() -> f64 { motion::FULL_SCALE_PX }

    pub fn smoothing_window() -> usize { smoothing::WINDOW }

    pub fn process_interval_ms() -> u64 { worker::PROCESS_INTERVAL_MS }
    pub fn frame_rate_window_ms() -> f64 { worker::FRAME_RATE_WINDOW_MS }
    pub fn calibration_samples() -> usize { worker::CALIBRATION_SAMPLES }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: defaults::sample_rate_hz(),
            buffer_seconds: defaults::buffer_seconds(),
            min_process_seconds: defaults::min_process_seconds(),
            waveform_seconds: defaults::waveform_seconds(),
            pos_window_seconds: defaults::pos_window_seconds(),
        }
    }
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            min_hz: defaults::min_hz(),
            max_hz: defaults::max_hz(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_bpm: defaults::min_bpm(),
            max_bpm: defaults::max_bpm(),
            min_confidence: defaults::min_confidence(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            history_len: defaults::history_len(),
            recent_samples: defaults::recent_samples(),
            full_scale_px: defaults::full_scale_px(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: defaults::smoothing_window(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            process_interval_ms: defaults::process_interval_ms(),
            frame_rate_window_ms: defaults::frame_rate_window_ms(),
            calibration_samples: defaults::calibration_samples(),
        }
    }
}

impl PulseConfig {
    /// Check every section for values the pipeline cannot work with
    pub fn validate(&self) -> RppgResult<()> {
        let s = &self.signal;
        for (name, value) in [
            ("sample_rate_hz", s.sample_rate_hz),
            ("buffer_seconds", s.buffer_seconds),
            ("min_process_seconds", s.min_process_seconds),
            ("waveform_seconds", s.waveform_seconds),
            ("pos_window_seconds", s.pos_window_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PulseError::configuration(
                    "signal",
                    format!("{} must be positive and finite, got {}", name, value),
                ));
            }
        }
        if s.sample_rate_hz > signal::MAX_SAMPLE_RATE_HZ {
            return Err(PulseError::configuration(
                "signal",
                format!(
                    "sample_rate_hz {} exceeds the supported maximum of {}",
                    s.sample_rate_hz,
                    signal::MAX_SAMPLE_RATE_HZ
                ),
            ));
        }

        let b = &self.band;
        if !(b.min_hz > 0.0 && b.min_hz < b.max_hz) {
            return Err(PulseError::configuration(
                "band",
                format!("expected 0 < min_hz < max_hz, got {} and {}", b.min_hz, b.max_hz),
            ));
        }
        if b.max_hz >= s.sample_rate_hz / 2.0 {
            return Err(PulseError::configuration(
                "band",
                format!(
                    "max_hz ({} Hz) must be below the Nyquist frequency ({} Hz)",
                    b.max_hz,
                    s.sample_rate_hz / 2.0
                ),
            ));
        }

        let g = &self.gate;
        if !(g.min_bpm < g.max_bpm) {
            return Err(PulseError::configuration(
                "gate",
                format!("min_bpm ({}) must be below max_bpm ({})", g.min_bpm, g.max_bpm),
            ));
        }
        if !(0.0..=1.0).contains(&g.min_confidence) {
            return Err(PulseError::configuration(
                "gate",
                format!("min_confidence must lie in [0, 1], got {}", g.min_confidence),
            ));
        }

        let m = &self.motion;
        if m.history_len == 0 || m.recent_samples == 0 {
            return Err(PulseError::configuration(
                "motion",
                "history_len and recent_samples must be non-zero",
            ));
        }
        if !m.full_scale_px.is_finite() || m.full_scale_px <= 0.0 {
            return Err(PulseError::configuration(
                "motion",
                format!("full_scale_px must be positive, got {}", m.full_scale_px),
            ));
        }

        if self.smoothing.window == 0 {
            return Err(PulseError::configuration("smoothing", "window must be non-zero"));
        }

        let w = &self.worker;
        if w.process_interval_ms == 0 {
            return Err(PulseError::configuration(
                "worker",
                "process_interval_ms must be non-zero",
            ));
        }
        if !w.frame_rate_window_ms.is_finite() || w.frame_rate_window_ms <= 0.0 {
            return Err(PulseError::configuration(
                "worker",
                format!("frame_rate_window_ms must be positive, got {}", w.frame_rate_window_ms),
            ));
        }

        Ok(())
    }

    /// Render the configuration as a TOML document
    pub fn to_toml_string(&self) -> RppgResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = PulseConfig::default();
        assert_eq!(config.signal.sample_rate_hz, 30.0);
        assert_eq!(config.signal.buffer_seconds, 15.0);
        assert_eq!(config.band.min_hz, 0.7);
        assert_eq!(config.band.max_hz, 4.0);
        assert_eq!(config.gate.min_bpm, 45.0);
        assert_eq!(config.gate.max_bpm, 180.0);
        assert_eq!(config.motion.history_len, 60);
        assert_eq!(config.smoothing.window, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = PulseConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let deserialized: PulseConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PulseConfig = toml::from_str("[gate]\nmin_bpm = 50.0\n").unwrap();
        assert_eq!(config.gate.min_bpm, 50.0);
        assert_eq!(config.gate.max_bpm, 180.0);
        assert_eq!(config.signal.sample_rate_hz, 30.0);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = PulseConfig::default();
        config.band.min_hz = 5.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("band"));
    }

    #[test]
    fn test_band_above_nyquist_rejected() {
        let mut config = PulseConfig::default();
        config.signal.sample_rate_hz = 6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_windows_rejected() {
        let mut config = PulseConfig::default();
        config.smoothing.window = 0;
        assert!(config.validate().is_err());

        let mut config = PulseConfig::default();
        config.signal.buffer_seconds = f64::NAN;
        assert!(config.validate().is_err());
    }
}
