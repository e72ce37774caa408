// src/acquisition/sample_buffer.rs
//! Bounded sliding-window buffers for skin-colour samples

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Channel averages over the face ROI at one capture instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Capture time in the caller's clock, milliseconds assumed
    pub timestamp: f64,
}

impl RgbSample {
    pub fn new(r: f64, g: f64, b: f64, timestamp: f64) -> Self {
        Self { r, g, b, timestamp }
    }
}

/// Centroid of the detected face region, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiCenter {
    pub x: f64,
    pub y: f64,
}

impl RoiCenter {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance_to(&self, other: &RoiCenter) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// FIFO that silently evicts its oldest entries once `capacity` is exceeded.
///
/// Changing the capacity never trims existing entries; the new bound is
/// enforced on the next push.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `item`, then evict from the front until within capacity
    pub fn push(&mut self, item: T) {
        self.entries.push_back(item);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Set the bound used by future pushes
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest-first iteration
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The `count` most recent entries, oldest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip)
    }

    /// Contiguous oldest-first view
    pub fn as_slice(&mut self) -> &[T] {
        self.entries.make_contiguous()
    }
}

/// Sliding window of RGB samples sized in seconds of signal
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: BoundedHistory<RgbSample>,
    window_seconds: f64,
}

impl SampleBuffer {
    pub fn new(sample_rate: f64, window_seconds: f64) -> Self {
        Self {
            samples: BoundedHistory::new(Self::capacity_for(sample_rate, window_seconds)),
            window_seconds,
        }
    }

    /// `round(sample_rate × window_seconds)` entries
    pub fn capacity_for(sample_rate: f64, window_seconds: f64) -> usize {
        (sample_rate * window_seconds).round().max(0.0) as usize
    }

    pub fn push(&mut self, sample: RgbSample) {
        self.samples.push(sample);
    }

    /// Recompute the capacity for a new frame rate; existing samples stay
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.samples
            .set_capacity(Self::capacity_for(sample_rate, self.window_seconds));
    }

    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn as_slice(&mut self) -> &[RgbSample] {
        self.samples.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RgbSample> {
        self.samples.iter()
    }
}
