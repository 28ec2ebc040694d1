//! Progress reporting seam for stream transfers.

use std::fmt::Debug;
use std::sync::Mutex;

use tracing::{info, trace};

/// Receives progress for one stream at a time.
///
/// Called from the transfer loop after every chunk, so implementations
/// should be cheap.
pub trait ProgressReporter: Send + Sync + Debug {
    /// A transfer named `label` is starting; `total` is the declared size.
    fn on_start(&self, label: &str, total: Option<u64>);

    /// `downloaded` bytes of the current transfer are on disk.
    fn on_progress(&self, downloaded: u64, total: Option<u64>);

    /// The current transfer finished (successfully or not).
    fn on_finish(&self);
}

/// Reports progress through `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn on_start(&self, label: &str, total: Option<u64>) {
        info!(label, total_bytes = total, "transfer started");
    }

    fn on_progress(&self, downloaded: u64, total: Option<u64>) {
        trace!(downloaded, total, "transfer progress");
    }

    fn on_finish(&self) {
        info!("transfer finished");
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_start(&self, _label: &str, _total: Option<u64>) {}

    fn on_progress(&self, _downloaded: u64, _total: Option<u64>) {}

    fn on_finish(&self) {}
}

/// Progress events as recorded by [`RecordingProgress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start { label: String, total: Option<u64> },
    Progress { downloaded: u64, total: Option<u64> },
    Finish,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all events so far.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: ProgressEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

impl ProgressReporter for RecordingProgress {
    fn on_start(&self, label: &str, total: Option<u64>) {
        self.push(ProgressEvent::Start {
            label: label.to_string(),
            total,
        });
    }

    fn on_progress(&self, downloaded: u64, total: Option<u64>) {
        self.push(ProgressEvent::Progress { downloaded, total });
    }

    fn on_finish(&self) {
        self.push(ProgressEvent::Finish);
    }
}
