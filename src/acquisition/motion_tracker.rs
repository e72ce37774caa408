// src/acquisition/motion_tracker.rs
//! Head-motion estimation from the ROI centre trajectory

use super::sample_buffer::{BoundedHistory, RoiCenter};
use crate::config::MotionConfig;

/// Bounded history of ROI centres feeding the motion estimate
#[derive(Debug, Clone)]
pub struct MotionTracker {
    history: BoundedHistory<RoiCenter>,
    recent_samples: usize,
    full_scale_px: f64,
}

impl MotionTracker {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            history: BoundedHistory::new(config.history_len),
            recent_samples: config.recent_samples,
            full_scale_px: config.full_scale_px,
        }
    }

    pub fn push(&mut self, center: RoiCenter) {
        self.history.push(center);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Motion level in `[0, 1]`: 0 = still, 1 = at or beyond full scale
    pub fn estimate(&self) -> f64 {
        let recent: Vec<RoiCenter> = self.history.recent(self.recent_samples).copied().collect();
        estimate_motion(&recent, self.full_scale_px)
    }
}

/// Mean frame-to-frame displacement of `points` divided by `full_scale_px`,
/// capped at 1. Fewer than two points means no measurable motion.
pub fn estimate_motion(points: &[RoiCenter], full_scale_px: f64) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let total: f64 = points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();
    let average = total / (points.len() - 1) as f64;

    (average / full_scale_px).clamp(0.0, 1.0)
}
