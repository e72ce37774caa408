// src/session.rs
//! User-facing measurement state on top of the report stream

use crate::config::constants::quality::NOT_STARTED_MESSAGE;
use crate::config::constants::worker::CALIBRATION_SAMPLES;
use crate::processing::{QualityLevel, QualityResult};
use crate::worker::{ControlMessage, PulseReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementState {
    Idle,
    /// Running, no accepted reading yet
    Calibrating,
    /// At least one smoothed reading has been shown
    Measuring,
}

/// Tracks what a display should show between `start` and `stop`.
///
/// The displayed BPM latches: a report without a reading leaves the last
/// shown value in place.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    state: MeasurementState,
    bpm: Option<f64>,
    confidence: f64,
    quality: QualityResult,
    waveform: Vec<f64>,
    buffer_length: usize,
    calibration_samples: usize,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new(CALIBRATION_SAMPLES)
    }
}

impl MeasurementSession {
    pub fn new(calibration_samples: usize) -> Self {
        Self {
            state: MeasurementState::Idle,
            bpm: None,
            confidence: 0.0,
            quality: Self::not_started(),
            waveform: Vec::new(),
            buffer_length: 0,
            calibration_samples,
        }
    }

    fn not_started() -> QualityResult {
        QualityResult {
            level: QualityLevel::Poor,
            score: 0.0,
            message: NOT_STARTED_MESSAGE.to_string(),
        }
    }

    /// Begin calibrating. Returns the message that clears the worker.
    pub fn start(&mut self) -> ControlMessage {
        self.state = MeasurementState::Calibrating;
        self.bpm = None;
        self.confidence = 0.0;
        self.quality = Self::not_started();
        self.waveform.clear();
        self.buffer_length = 0;
        info!("measurement started");
        ControlMessage::Reset
    }

    /// Return to idle and drop the displayed values. Returns the message that
    /// clears the worker.
    pub fn stop(&mut self) -> ControlMessage {
        self.state = MeasurementState::Idle;
        self.bpm = None;
        self.waveform.clear();
        self.buffer_length = 0;
        info!("measurement stopped");
        ControlMessage::Reset
    }

    /// Fold one report into the displayed state. Reports arriving while idle
    /// are stale and ignored.
    pub fn apply(&mut self, report: &PulseReport) {
        if self.state == MeasurementState::Idle {
            debug!("ignoring report while idle");
            return;
        }

        self.confidence = report.confidence;
        self.quality = report.quality.clone();
        self.waveform = report.waveform.clone();
        self.buffer_length = report.buffer_length;

        if let Some(smoothed) = report.smoothed_bpm {
            if self.state == MeasurementState::Calibrating {
                info!(bpm = smoothed, "first reading, measuring");
            }
            self.bpm = Some(smoothed);
            self.state = MeasurementState::Measuring;
        }
    }

    /// True once the worker holds more than the calibration sample count
    pub fn is_calibrated(&self, report: &PulseReport) -> bool {
        report.buffer_length > self.calibration_samples
    }

    /// Fraction of the calibration buffer filled, in `[0, 1]`
    pub fn calibration_progress(&self) -> f64 {
        if self.calibration_samples == 0 {
            return 1.0;
        }
        (self.buffer_length as f64 / self.calibration_samples as f64).min(1.0)
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != MeasurementState::Idle
    }

    pub fn bpm(&self) -> Option<f64> {
        self.bpm
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn quality(&self) -> &QualityResult {
        &self.quality
    }

    pub fn waveform(&self) -> &[f64] {
        &self.waveform
    }
}
