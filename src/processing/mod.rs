// src/processing/mod.rs
//! Signal processing pipeline for rPPG data

pub mod detrend;
pub mod filters;
pub mod pos;
pub mod pulse;
pub mod quality_monitor;
pub mod smoother;
pub mod spectrum;

pub use detrend::*;
pub use filters::*;
pub use pos::*;
pub use pulse::*;
pub use quality_monitor::*;
pub use smoother::*;
pub use spectrum::*;
