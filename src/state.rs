// src/state.rs
use crate::market_analysis::{CancelToken, JobRecord};

/// Session state for live runs: the records seen so far and the stop flag.
///
/// Created when a session starts and cleared on reset. Records are appended
/// as delivered, without deduplication.
#[derive(Debug, Default)]
pub struct AppState {
    records: Vec<JobRecord>,
    cancel: CancelToken,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: JobRecord) {
        self.records.push(job);
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Handle for stopping the current stream from another task
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_streaming_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drop accumulated records and re-arm the stop flag
    pub fn clear(&mut self) {
        self.records.clear();
        self.cancel.reset();
    }
}
