// src/worker/runtime.rs
//! Dedicated pipeline thread fed through channels
//!
//! The worker thread owns the orchestrator outright. Producers only ever
//! enqueue messages, and the thread drains them one at a time in arrival
//! order, so no buffer is ever touched from two threads.

use super::messages::{ControlMessage, PulseReport};
use super::orchestrator::PulseOrchestrator;
use crate::acquisition::{RgbSample, RoiCenter};
use crate::config::constants::worker::THREAD_NAME;
use crate::config::PulseConfig;
use crate::error::{PulseError, RppgResult};
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Cloneable sending side of the control protocol
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: Sender<ControlMessage>,
}

impl WorkerHandle {
    /// Enqueue any control message
    pub fn send(&self, message: ControlMessage) -> RppgResult<()> {
        let operation = operation_name(&message);
        self.tx
            .send(message)
            .map_err(|_| PulseError::disconnected(operation))
    }

    pub fn add_sample(&self, sample: RgbSample, roi_center: Option<RoiCenter>) -> RppgResult<()> {
        self.send(ControlMessage::AddSample { sample, roi_center })
    }

    pub fn set_face_detected(&self, face_detected: bool) -> RppgResult<()> {
        self.send(ControlMessage::SetFaceDetected { face_detected })
    }

    pub fn set_sample_rate(&self, sample_rate: f64) -> RppgResult<()> {
        self.send(ControlMessage::SetSampleRate { sample_rate })
    }

    pub fn reset(&self) -> RppgResult<()> {
        self.send(ControlMessage::Reset)
    }

    pub fn process(&self) -> RppgResult<()> {
        self.send(ControlMessage::Process)
    }

    /// Messages waiting to be handled
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

fn operation_name(message: &ControlMessage) -> &'static str {
    match message {
        ControlMessage::AddSample { .. } => "add_sample",
        ControlMessage::SetFaceDetected { .. } => "set_face_detected",
        ControlMessage::SetSampleRate { .. } => "set_sample_rate",
        ControlMessage::Reset => "reset",
        ControlMessage::Process => "process",
        ControlMessage::Shutdown => "shutdown",
    }
}

/// Running pipeline worker
pub struct PulseWorker {
    handle: WorkerHandle,
    reports: Receiver<PulseReport>,
    thread: Option<JoinHandle<PulseOrchestrator>>,
}

impl PulseWorker {
    /// Validate `config` and start the worker thread
    pub fn spawn(config: PulseConfig) -> RppgResult<Self> {
        Self::spawn_with(PulseOrchestrator::new(config)?)
    }

    /// Start a worker around an already-built orchestrator
    pub fn spawn_with(orchestrator: PulseOrchestrator) -> RppgResult<Self> {
        let (tx, rx) = unbounded();
        let (report_tx, report_rx) = unbounded();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run_loop(orchestrator, rx, report_tx))
            .map_err(PulseError::WorkerSpawn)?;

        info!(thread = THREAD_NAME, "pipeline worker started");

        Ok(Self {
            handle: WorkerHandle { tx },
            reports: report_rx,
            thread: Some(thread),
        })
    }

    /// A new sender for the control protocol
    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    /// Receiving side of the report stream
    pub fn reports(&self) -> &Receiver<PulseReport> {
        &self.reports
    }

    pub fn try_recv_report(&self) -> Option<PulseReport> {
        match self.reports.try_recv() {
            Ok(report) => Some(report),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next report
    pub fn recv_report_timeout(&self, timeout: Duration) -> RppgResult<Option<PulseReport>> {
        match self.reports.recv_timeout(timeout) {
            Ok(report) => Ok(Some(report)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(PulseError::disconnected("recv_report")),
        }
    }

    /// Stop after the already-queued messages and hand back the orchestrator
    pub fn shutdown(mut self) -> Option<PulseOrchestrator> {
        self.stop()
    }

    fn stop(&mut self) -> Option<PulseOrchestrator> {
        let thread = self.thread.take()?;
        let _ = self.handle.tx.send(ControlMessage::Shutdown);
        match thread.join() {
            Ok(orchestrator) => {
                info!("pipeline worker stopped");
                Some(orchestrator)
            }
            Err(_) => None,
        }
    }
}

impl Drop for PulseWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut orchestrator: PulseOrchestrator,
    rx: Receiver<ControlMessage>,
    report_tx: Sender<PulseReport>,
) -> PulseOrchestrator {
    for message in rx.iter() {
        if message == ControlMessage::Shutdown {
            break;
        }
        if let Some(report) = orchestrator.handle(message) {
            if report_tx.send(report).is_err() {
                debug!("report receiver dropped");
            }
        }
    }
    orchestrator
}
