// src/processing/smoother.rs
//! Median smoothing of accepted BPM readings

use crate::acquisition::BoundedHistory;
use crate::config::constants::smoothing::WINDOW;

/// Median over the last few accepted readings
#[derive(Debug, Clone)]
pub struct BpmSmoother {
    history: BoundedHistory<f64>,
}

impl Default for BpmSmoother {
    fn default() -> Self {
        Self::new(WINDOW)
    }
}

impl BpmSmoother {
    pub fn new(window: usize) -> Self {
        Self {
            history: BoundedHistory::new(window),
        }
    }

    /// Record `bpm` and return the median of the retained readings
    pub fn smooth(&mut self, bpm: f64) -> f64 {
        self.history.push(bpm);
        self.median()
    }

    /// Median of the current history, `None` when empty
    pub fn current(&self) -> Option<f64> {
        if self.history.is_empty() {
            None
        } else {
            Some(self.median())
        }
    }

    fn median(&self) -> f64 {
        let mut sorted: Vec<f64> = self.history.iter().copied().collect();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlier_rejected() {
        let mut smoother = BpmSmoother::default();
        let mut last = 0.0;
        for bpm in [70.0, 72.0, 68.0, 200.0, 71.0] {
            last = smoother.smooth(bpm);
        }
        assert_eq!(last, 71.0);
    }

    #[test]
    fn test_even_count_averages_middle() {
        let mut smoother = BpmSmoother::default();
        smoother.smooth(60.0);
        assert_eq!(smoother.smooth(70.0), 65.0);
    }

    #[test]
    fn test_window_bounded() {
        let mut smoother = BpmSmoother::default();
        for bpm in [100.0, 100.0, 100.0, 60.0, 60.0, 60.0, 60.0] {
            smoother.smooth(bpm);
        }
        assert_eq!(smoother.len(), 5);
        assert_eq!(smoother.current(), Some(60.0));
    }

    #[test]
    fn test_clear() {
        let mut smoother = BpmSmoother::default();
        smoother.smooth(80.0);
        smoother.clear();
        assert!(smoother.is_empty());
        assert_eq!(smoother.current(), None);
    }
}
