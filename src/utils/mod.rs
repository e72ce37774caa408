// src/utils/mod.rs
//! Small shared helpers: clocks and summary statistics

pub mod stats;
pub mod time;

pub use stats::{mean, population_std};
pub use time::{MockTimeProvider, MonotonicTimeProvider, TimeProvider};
