// src/acquisition/mod.rs
//! Sample acquisition and buffering components

pub mod frame_feed;
pub mod motion_tracker;
pub mod sample_buffer;

pub use frame_feed::*;
pub use motion_tracker::*;
pub use sample_buffer::*;
