// src/worker/messages.rs
//! Control protocol between the capture side and the pipeline worker

use crate::acquisition::{RgbSample, RoiCenter};
use crate::processing::QualityResult;
use serde::{Deserialize, Serialize};

/// One-way control message; the worker handles them strictly in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlMessage {
    /// Append a sample and, when known, the ROI centre it was taken from
    AddSample {
        sample: RgbSample,
        #[serde(default, rename = "roiCenter")]
        roi_center: Option<RoiCenter>,
    },
    SetFaceDetected {
        #[serde(rename = "faceDetected")]
        face_detected: bool,
    },
    /// Frames per second assumed for windowing from now on
    SetSampleRate {
        #[serde(rename = "sampleRate")]
        sample_rate: f64,
    },
    /// Drop buffered samples, motion history and BPM history
    Reset,
    /// Run one computation pass and emit a report
    Process,
    /// Stop the worker after the messages queued ahead of this one
    Shutdown,
}

/// Result of one `Process` pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseReport {
    /// Raw estimate when it passed the validity gate
    pub bpm: Option<f64>,
    /// Rounded median of recent accepted estimates, present with `bpm`
    pub smoothed_bpm: Option<f64>,
    pub confidence: f64,
    pub quality: QualityResult,
    /// Trailing display window of the normalised filtered signal
    pub waveform: Vec<f64>,
    pub buffer_length: usize,
    pub sample_rate: f64,
}

impl PulseReport {
    /// True when this pass produced an accepted reading
    pub fn has_reading(&self) -> bool {
        self.bpm.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::assess_signal_quality;

    #[test]
    fn test_message_json_shape() {
        let msg = ControlMessage::AddSample {
            sample: RgbSample::new(1.0, 2.0, 3.0, 4.0),
            roi_center: Some(RoiCenter::new(5.0, 6.0)),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "addSample");
        assert_eq!(json["roiCenter"]["x"], 5.0);

        let parsed: ControlMessage =
            serde_json::from_str(r#"{"type":"addSample","sample":{"r":1,"g":2,"b":3,"timestamp":4}}"#)
                .expect("deserialize");
        assert_eq!(
            parsed,
            ControlMessage::AddSample {
                sample: RgbSample::new(1.0, 2.0, 3.0, 4.0),
                roi_center: None,
            }
        );

        let parsed: ControlMessage =
            serde_json::from_str(r#"{"type":"setFaceDetected","faceDetected":true}"#).expect("deserialize");
        assert_eq!(parsed, ControlMessage::SetFaceDetected { face_detected: true });

        let json = serde_json::to_string(&ControlMessage::SetSampleRate { sample_rate: 24.0 }).expect("serialize");
        assert_eq!(json, r#"{"type":"setSampleRate","sampleRate":24.0}"#);
    }

    #[test]
    fn test_report_uses_camel_case() {
        let report = PulseReport {
            bpm: None,
            smoothed_bpm: None,
            confidence: 0.0,
            quality: assess_signal_quality(0.0, false, 0.0),
            waveform: Vec::new(),
            buffer_length: 12,
            sample_rate: 30.0,
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["smoothedBpm"].is_null());
        assert_eq!(json["bufferLength"], 12);
        assert_eq!(json["quality"]["level"], "poor");
        assert!(!report.has_reading());
    }
}
