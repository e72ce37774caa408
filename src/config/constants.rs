// src/config/constants.rs
//! System-wide configuration constants

/// Signal buffering and timing constants
pub mod signal {
    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 30.0;
    pub const BUFFER_SECONDS: f64 = 15.0;
    pub const MIN_PROCESS_SECONDS: f64 = 3.0;
    pub const WAVEFORM_SECONDS: f64 = 10.0;
    pub const MAX_SAMPLE_RATE_HZ: f64 = 1000.0;
}

/// POS projection constants
pub mod pos {
    pub const WINDOW_SECONDS: f64 = 1.6;
    pub const MIN_BLOCK_LEN: usize = 10;
    pub const MIN_SAMPLES: usize = 3;
    pub const MIN_CHANNEL_MEAN: f64 = 1e-6;
    pub const MIN_PROJECTION_STD: f64 = 1e-10;
}

/// Pulse band constants
pub mod band {
    /// 42 BPM
    pub const MIN_HR_HZ: f64 = 0.7;
    /// 240 BPM
    pub const MAX_HR_HZ: f64 = 4.0;
}

/// Reading validity gate
pub mod gate {
    pub const MIN_BPM: f64 = 45.0;
    pub const MAX_BPM: f64 = 180.0;
    pub const MIN_CONFIDENCE: f64 = 0.1;
}

/// Spectral confidence mapping
pub mod confidence {
    pub const SNR_FLOOR: f64 = 1.5;
    pub const SNR_SPAN: f64 = 5.0;
}

/// Quality scoring constants
pub mod quality {
    pub const GOOD_SCORE: f64 = 0.5;
    pub const FAIR_SCORE: f64 = 0.2;
    pub const MOTION_PENALTY_GAIN: f64 = 2.0;
    pub const MOTION_PENALTY_WEIGHT: f64 = 0.5;

    pub const NO_FACE_MESSAGE: &str = "No face detected. Please face the camera.";
    pub const GOOD_MESSAGE: &str = "Good signal quality.";
    pub const FAIR_MESSAGE: &str = "Fair signal. Try to stay still and ensure good lighting.";
    pub const POOR_MESSAGE: &str = "Poor signal. Improve lighting, stay still, and face the camera.";
    pub const NOT_STARTED_MESSAGE: &str = "Not started.";
}

/// Motion tracking constants
pub mod motion {
    pub const HISTORY_LEN: usize = 60;
    pub const RECENT_SAMPLES: usize = 15;
    pub const FULL_SCALE_PX: f64 = 20.0;
}

/// BPM smoothing constants
pub mod smoothing {
    pub const WINDOW: usize = 5;
}

/// Worker and capture-side timing constants
pub mod worker {
    pub const PROCESS_INTERVAL_MS: u64 = 500;
    pub const FRAME_RATE_WINDOW_MS: f64 = 2000.0;
    /// About five seconds at 30 fps
    pub const CALIBRATION_SAMPLES: usize = 150;
    pub const THREAD_NAME: &str = "rppg-worker";
}

/// Numeric guards shared across the DSP code
pub mod numeric {
    pub const MIN_NORMALIZE_STD: f64 = 1e-10;
}
