// src/worker/mod.rs
//! Asynchronous pipeline worker and its control protocol

pub mod messages;
pub mod orchestrator;
pub mod runtime;
#[cfg(feature = "desktop")]
pub mod ticker;

pub use messages::{ControlMessage, PulseReport};
pub use orchestrator::{ProcessingMetrics, PulseOrchestrator};
pub use runtime::{PulseWorker, WorkerHandle};
#[cfg(feature = "desktop")]
pub use ticker::ProcessTicker;
