// src/worker/ticker.rs
//! Periodic `Process` trigger on the tokio runtime
//!
//! Runs on its own fixed interval, independent of frame cadence.

use super::runtime::WorkerHandle;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background task that asks the worker for a pass every `period`
pub struct ProcessTicker {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl ProcessTicker {
    /// Start ticking. The first `Process` is sent one full period after start.
    /// Must be called from within a tokio runtime. Periods below 1 ms are
    /// raised to 1 ms.
    pub fn spawn(handle: WorkerHandle, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let task = tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "process ticker started");

            let mut interval = tokio::time::interval(period);
            // Late ticks are delayed, never bunched
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        debug!("process ticker stop requested");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = handle.process() {
                            warn!(error = %e, "worker gone, stopping ticker");
                            break;
                        }
                        counter.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
            ticks,
        }
    }

    /// `Process` messages sent so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop ticking and wait for the task to finish. Returns the tick count.
    pub async fn stop(mut self) -> u64 {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.ticks()
    }
}

impl Drop for ProcessTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
