// src/acquisition/frame_feed.rs
//! Capture-side adapter: turns per-frame face observations into control messages

use super::sample_buffer::{RgbSample, RoiCenter};
use crate::worker::messages::ControlMessage;
use tracing::debug;

/// Mean ROI colour, when the detector could sample one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// What the face detector reported for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceObservation {
    pub center: RoiCenter,
    pub color: Option<RoiColor>,
}

/// One captured video frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureFrame {
    pub timestamp_ms: f64,
    pub face: Option<FaceObservation>,
}

/// Measures the effective frame rate over fixed wall-clock windows
#[derive(Debug, Clone)]
pub struct FrameRateEstimator {
    window_ms: f64,
    window_start_ms: Option<f64>,
    frame_count: u32,
    estimate: Option<f64>,
}

impl FrameRateEstimator {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start_ms: None,
            frame_count: 0,
            estimate: None,
        }
    }

    /// Count a frame at `now_ms`. Returns the rounded frame rate whenever a
    /// window longer than `window_ms` closes.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<f64> {
        self.frame_count += 1;

        let start = match self.window_start_ms {
            None => {
                self.window_start_ms = Some(now_ms);
                return None;
            }
            Some(start) => start,
        };

        let elapsed = now_ms - start;
        if elapsed <= self.window_ms {
            return None;
        }

        let fps = self.frame_count as f64 * 1000.0 / elapsed;
        self.frame_count = 0;
        self.window_start_ms = Some(now_ms);
        self.estimate = Some(fps);
        Some(fps.round())
    }

    /// Last unrounded estimate
    pub fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    pub fn reset(&mut self) {
        self.window_start_ms = None;
        self.frame_count = 0;
        self.estimate = None;
    }
}

/// Produces the message sequence the capture loop posts per frame:
/// an optional sample-rate update, the face flag, then the sample.
#[derive(Debug, Clone)]
pub struct FrameFeeder {
    rate_estimator: FrameRateEstimator,
    samples_sent: u64,
}

impl FrameFeeder {
    pub fn new(frame_rate_window_ms: f64) -> Self {
        Self {
            rate_estimator: FrameRateEstimator::new(frame_rate_window_ms),
            samples_sent: 0,
        }
    }

    pub fn ingest(&mut self, frame: &CaptureFrame) -> Vec<ControlMessage> {
        let mut messages = Vec::with_capacity(3);

        if let Some(rate) = self.rate_estimator.on_frame(frame.timestamp_ms) {
            debug!(rate, "frame rate window closed");
            messages.push(ControlMessage::SetSampleRate { sample_rate: rate });
        }

        messages.push(ControlMessage::SetFaceDetected {
            face_detected: frame.face.is_some(),
        });

        if let Some(FaceObservation { center, color: Some(color) }) = frame.face {
            self.samples_sent += 1;
            messages.push(ControlMessage::AddSample {
                sample: RgbSample::new(color.r, color.g, color.b, frame.timestamp_ms),
                roi_center: Some(center),
            });
        }

        messages
    }

    pub fn samples_sent(&self) -> u64 {
        self.samples_sent
    }

    pub fn frame_rate_estimate(&self) -> Option<f64> {
        self.rate_estimator.estimate()
    }

    /// Forget counters, e.g. when a measurement restarts
    pub fn reset(&mut self) {
        self.rate_estimator.reset();
        self.samples_sent = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_estimate_after_window() {
        let mut estimator = FrameRateEstimator::new(2000.0);
        let mut reported = None;
        for i in 0..=62 {
            if let Some(rate) = estimator.on_frame(i as f64 * 1000.0 / 30.0) {
                reported = Some(rate);
                break;
            }
        }
        assert_eq!(reported, Some(30.0));
    }

    #[test]
    fn test_no_estimate_inside_window() {
        let mut estimator = FrameRateEstimator::new(2000.0);
        for i in 0..60 {
            assert!(estimator.on_frame(i as f64 * 33.0).is_none());
        }
    }

    #[test]
    fn test_feeder_message_order() {
        let mut feeder = FrameFeeder::new(2000.0);
        let frame = CaptureFrame {
            timestamp_ms: 10.0,
            face: Some(FaceObservation {
                center: RoiCenter::new(320.0, 240.0),
                color: Some(RoiColor { r: 150.0, g: 120.0, b: 100.0 }),
            }),
        };
        let messages = feeder.ingest(&frame);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ControlMessage::SetFaceDetected { face_detected: true });
        match &messages[1] {
            ControlMessage::AddSample { sample, roi_center } => {
                assert_eq!(sample.g, 120.0);
                assert_eq!(sample.timestamp, 10.0);
                assert_eq!(*roi_center, Some(RoiCenter::new(320.0, 240.0)));
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(feeder.samples_sent(), 1);
    }

    #[test]
    fn test_feeder_without_face() {
        let mut feeder = FrameFeeder::new(2000.0);
        let messages = feeder.ingest(&CaptureFrame { timestamp_ms: 0.0, face: None });
        assert_eq!(messages, vec![ControlMessage::SetFaceDetected { face_detected: false }]);
    }

    #[test]
    fn test_feeder_face_without_colour() {
        let mut feeder = FrameFeeder::new(2000.0);
        let frame = CaptureFrame {
            timestamp_ms: 0.0,
            face: Some(FaceObservation { center: RoiCenter::new(1.0, 1.0), color: None }),
        };
        assert_eq!(feeder.ingest(&frame), vec![ControlMessage::SetFaceDetected { face_detected: true }]);
        assert_eq!(feeder.samples_sent(), 0);
    }

    #[test]
    fn test_feeder_reports_rate_first() {
        let mut feeder = FrameFeeder::new(100.0);
        feeder.ingest(&CaptureFrame { timestamp_ms: 0.0, face: None });
        let messages = feeder.ingest(&CaptureFrame { timestamp_ms: 150.0, face: None });
        assert_eq!(messages[0], ControlMessage::SetSampleRate { sample_rate: 13.0 });
    }
}
