// src/worker/orchestrator.rs
//! Pipeline state machine driven by control messages
//!
//! The orchestrator owns every buffer and history of one measurement. It has
//! no timers of its own: a pass runs only when a `Process` message arrives.

use super::messages::{ControlMessage, PulseReport};
use crate::acquisition::{MotionTracker, RgbSample, RoiCenter, SampleBuffer};
use crate::config::constants::signal::MAX_SAMPLE_RATE_HZ;
use crate::config::PulseConfig;
use crate::error::RppgResult;
use crate::processing::{assess_signal_quality, BpmSmoother, PulseProcessor, PulseResult};
use crate::utils::time::{MonotonicTimeProvider, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counters for processing passes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingMetrics {
    pub passes: u64,
    /// Passes where the pulse pipeline actually ran
    pub pulse_results: u64,
    /// Passes whose reading passed the validity gate
    pub accepted_readings: u64,
    pub average_pass_time_us: f64,
    pub max_pass_time_us: f64,
}

/// Owns the buffers and runs one synchronous pass per `Process`
pub struct PulseOrchestrator {
    config: PulseConfig,
    processor: PulseProcessor,
    buffer: SampleBuffer,
    motion: MotionTracker,
    smoother: BpmSmoother,
    face_detected: bool,
    sample_rate: f64,
    time_provider: Arc<dyn TimeProvider>,
    metrics: ProcessingMetrics,
}

impl PulseOrchestrator {
    /// Validate `config` and build an orchestrator on the monotonic clock
    pub fn new(config: PulseConfig) -> RppgResult<Self> {
        Self::with_time_provider(config, Arc::new(MonotonicTimeProvider::new()))
    }

    pub fn with_time_provider(
        config: PulseConfig,
        time_provider: Arc<dyn TimeProvider>,
    ) -> RppgResult<Self> {
        config.validate()?;
        Ok(Self::build(config, time_provider))
    }

    fn build(config: PulseConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        let sample_rate = config.signal.sample_rate_hz;
        Self {
            processor: PulseProcessor::from_config(&config),
            buffer: SampleBuffer::new(sample_rate, config.signal.buffer_seconds),
            motion: MotionTracker::new(&config.motion),
            smoother: BpmSmoother::new(config.smoothing.window),
            face_detected: false,
            sample_rate,
            time_provider,
            metrics: ProcessingMetrics::default(),
            config,
        }
    }

    /// Dispatch one message. Only `Process` produces a report.
    pub fn handle(&mut self, message: ControlMessage) -> Option<PulseReport> {
        match message {
            ControlMessage::AddSample { sample, roi_center } => {
                self.add_sample(sample, roi_center);
                None
            }
            ControlMessage::SetFaceDetected { face_detected } => {
                self.set_face_detected(face_detected);
                None
            }
            ControlMessage::SetSampleRate { sample_rate } => {
                self.set_sample_rate(sample_rate);
                None
            }
            ControlMessage::Reset => {
                self.reset();
                None
            }
            ControlMessage::Process => Some(self.process()),
            ControlMessage::Shutdown => None,
        }
    }

    pub fn add_sample(&mut self, sample: RgbSample, roi_center: Option<RoiCenter>) {
        self.buffer.push(sample);
        if let Some(center) = roi_center {
            self.motion.push(center);
        }
    }

    pub fn add_roi_center(&mut self, center: RoiCenter) {
        self.motion.push(center);
    }

    pub fn set_face_detected(&mut self, face_detected: bool) {
        if face_detected != self.face_detected {
            debug!(face_detected, "face presence changed");
        }
        self.face_detected = face_detected;
    }

    /// Update the assumed frame rate. Non-finite, non-positive or implausibly
    /// high rates are ignored.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        if !sample_rate.is_finite() || sample_rate <= 0.0 || sample_rate > MAX_SAMPLE_RATE_HZ {
            warn!(sample_rate, "ignoring invalid sample rate");
            return;
        }
        if sample_rate != self.sample_rate {
            info!(from = self.sample_rate, to = sample_rate, "sample rate updated");
        }
        self.sample_rate = sample_rate;
        self.buffer.set_sample_rate(sample_rate);
    }

    /// Clear samples, motion history and BPM history
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.motion.clear();
        self.smoother.clear();
        info!("pipeline state reset");
    }

    /// Run one pass over the buffered signal
    pub fn process(&mut self) -> PulseReport {
        let start_time = self.time_provider.now_nanos();

        let motion = self.motion.estimate();
        let min_len = self.sample_rate * self.config.signal.min_process_seconds;
        let result = if self.face_detected && self.buffer.len() as f64 > min_len {
            let sample_rate = self.sample_rate;
            self.processor.process(self.buffer.as_slice(), sample_rate)
        } else {
            None
        };

        let confidence = result.as_ref().map_or(0.0, |r| r.confidence);
        let quality = assess_signal_quality(confidence, self.face_detected, motion);

        let bpm = result
            .as_ref()
            .map(|r| r.bpm)
            .filter(|&bpm| self.passes_gate(bpm, confidence));
        let smoothed_bpm = bpm.map(|bpm| self.smoother.smooth(bpm).round());

        let waveform = result
            .as_ref()
            .map(|r| self.display_window(r))
            .unwrap_or_default();

        let end_time = self.time_provider.now_nanos();
        let pass_time_us = end_time.saturating_sub(start_time) as f64 / 1000.0;
        self.update_metrics(pass_time_us, result.is_some(), bpm.is_some());

        debug!(
            buffer_len = self.buffer.len(),
            motion,
            confidence,
            bpm = ?bpm,
            smoothed_bpm = ?smoothed_bpm,
            quality = %quality.level,
            pass_time_us,
            "processing pass"
        );

        PulseReport {
            bpm,
            smoothed_bpm,
            confidence,
            quality,
            waveform,
            buffer_length: self.buffer.len(),
            sample_rate: self.sample_rate,
        }
    }

    fn passes_gate(&self, bpm: f64, confidence: f64) -> bool {
        let gate = &self.config.gate;
        bpm >= gate.min_bpm && bpm <= gate.max_bpm && confidence > gate.min_confidence
    }

    /// Tail of the waveform covering `waveform_seconds`. A window that rounds
    /// to zero samples yields the whole waveform.
    fn display_window(&self, result: &PulseResult) -> Vec<f64> {
        let window = (self.sample_rate * self.config.signal.waveform_seconds).round() as usize;
        if window == 0 {
            return result.waveform.clone();
        }
        let skip = result.waveform.len().saturating_sub(window);
        result.waveform[skip..].to_vec()
    }

    fn update_metrics(&mut self, pass_time_us: f64, had_result: bool, accepted: bool) {
        self.metrics.passes += 1;
        if had_result {
            self.metrics.pulse_results += 1;
        }
        if accepted {
            self.metrics.accepted_readings += 1;
        }

        let n = self.metrics.passes as f64;
        self.metrics.average_pass_time_us =
            (self.metrics.average_pass_time_us * (n - 1.0) + pass_time_us) / n;
        if pass_time_us > self.metrics.max_pass_time_us {
            self.metrics.max_pass_time_us = pass_time_us;
        }
    }

    pub fn metrics(&self) -> &ProcessingMetrics {
        &self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = ProcessingMetrics::default();
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn face_detected(&self) -> bool {
        self.face_detected
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn motion_history_len(&self) -> usize {
        self.motion.len()
    }

    pub fn bpm_history_len(&self) -> usize {
        self.smoother.len()
    }
}

impl Default for PulseOrchestrator {
    fn default() -> Self {
        Self::build(PulseConfig::default(), Arc::new(MonotonicTimeProvider::new()))
    }
}
