//! rPPG-Core: real-time heart-rate estimation from facial skin colour
//!
//! This library turns a stream of average ROI colours (one RGB triple per
//! video frame) into heart-rate readings. It features:
//!
//! - Bounded sample and motion histories with sliding-window eviction
//! - POS (Plane-Orthogonal-to-Skin) pulse extraction
//! - Detrending, Butterworth bandpass filtering and FFT peak search
//! - Spectral confidence, motion-aware quality scoring and median smoothing
//! - A message-driven pipeline worker that never blocks the capture path
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rppg_core::config::PulseConfig;
//! use rppg_core::simulation::{SyntheticFaceConfig, SyntheticFaceSource};
//! use rppg_core::acquisition::FrameFeeder;
//! use rppg_core::worker::PulseWorker;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PulseConfig::default();
//!     let worker = PulseWorker::spawn(config.clone())?;
//!     let handle = worker.handle();
//!
//!     let mut source = SyntheticFaceSource::new(SyntheticFaceConfig::default())?;
//!     let mut feeder = FrameFeeder::new(config.worker.frame_rate_window_ms);
//!     for frame in source.take_frames(300) {
//!         for message in feeder.ingest(&frame) {
//!             handle.send(message)?;
//!         }
//!     }
//!
//!     handle.process()?;
//!     if let Some(report) = worker.recv_report_timeout(Duration::from_secs(1))? {
//!         println!("BPM: {:?} ({})", report.smoothed_bpm, report.quality.message);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod processing;
pub mod session;
pub mod simulation;
pub mod utils;
pub mod worker;

// Re-export commonly used types for convenience
pub use acquisition::{CaptureFrame, FrameFeeder, MotionTracker, RgbSample, RoiCenter, SampleBuffer};
pub use config::{ConfigLoader, PulseConfig};
pub use error::{PulseError, RppgResult};
pub use processing::{
    assess_signal_quality, process_rppg, BpmSmoother, PulseResult, QualityLevel, QualityResult,
};
pub use session::{MeasurementSession, MeasurementState};
pub use worker::{ControlMessage, PulseOrchestrator, PulseReport, PulseWorker, WorkerHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Real-time remote photoplethysmography (rPPG) heart-rate engine".to_string(),
        features: vec![
            "POS pulse extraction".to_string(),
            "Butterworth bandpass and FFT peak estimation".to_string(),
            "Confidence and motion-aware quality scoring".to_string(),
            "Median BPM smoothing".to_string(),
            "Message-driven pipeline worker".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
