// src/processing/quality_monitor.rs
//! Signal quality scoring from spectral confidence, face presence and motion

use crate::config::constants::quality::{
    FAIR_MESSAGE, FAIR_SCORE, GOOD_MESSAGE, GOOD_SCORE, MOTION_PENALTY_GAIN,
    MOTION_PENALTY_WEIGHT, NO_FACE_MESSAGE, POOR_MESSAGE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-level quality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Good,
    Fair,
    Poor,
}

impl QualityLevel {
    /// Fixed user guidance for this level
    pub fn message(&self) -> &'static str {
        match self {
            QualityLevel::Good => GOOD_MESSAGE,
            QualityLevel::Fair => FAIR_MESSAGE,
            QualityLevel::Poor => POOR_MESSAGE,
        }
    }

    fn from_score(score: f64) -> Self {
        if score >= GOOD_SCORE {
            QualityLevel::Good
        } else if score >= FAIR_SCORE {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
        };
        f.write_str(name)
    }
}

/// Quality verdict attached to every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub level: QualityLevel,
    pub score: f64,
    pub message: String,
}

impl QualityResult {
    /// Verdict used while no face is in view
    pub fn no_face() -> Self {
        Self {
            level: QualityLevel::Poor,
            score: 0.0,
            message: NO_FACE_MESSAGE.to_string(),
        }
    }
}

/// Score `confidence` after a motion penalty. Without a face the verdict is
/// always poor with a zero score.
pub fn assess_signal_quality(confidence: f64, face_detected: bool, motion: f64) -> QualityResult {
    if !face_detected {
        return QualityResult::no_face();
    }

    let motion_penalty = (motion * MOTION_PENALTY_GAIN).min(1.0);
    let score = (confidence * (1.0 - motion_penalty * MOTION_PENALTY_WEIGHT)).clamp(0.0, 1.0);
    let level = QualityLevel::from_score(score);

    QualityResult {
        level,
        score,
        message: level.message().to_string(),
    }
}
