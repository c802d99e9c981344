// src/market_analysis/discovery.rs
//! Simulated live discovery: replays a batch one record at a time with a
//! random delay before each delivery.

use super::JobRecord;
use futures::stream::{self, Stream};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared stop flag, polled once per item
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Inclusive interval the per-item delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let nanos = rng.gen_range(self.min.as_nanos()..=self.max.as_nanos());
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::from_millis(100, 400)
    }
}

/// Single-pass, non-restartable replay of a batch
pub struct DiscoveryStream {
    pending: std::vec::IntoIter<JobRecord>,
    delay: DelayRange,
    cancel: CancelToken,
    rng: StdRng,
    delivered: usize,
}

impl DiscoveryStream {
    pub fn new(jobs: Vec<JobRecord>, delay: DelayRange, cancel: CancelToken) -> Self {
        Self {
            pending: jobs.into_iter(),
            delay,
            cancel,
            rng: StdRng::from_entropy(),
            delivered: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Wait out the delay, then hand over the next record. Returns `None`
    /// once the batch is exhausted or cancellation has been observed; after
    /// that every call returns `None`.
    pub async fn next_job(&mut self) -> Option<JobRecord> {
        if self.stop_if_cancelled() || self.pending.as_slice().is_empty() {
            return None;
        }

        tokio::time::sleep(self.delay.sample(&mut self.rng)).await;

        if self.stop_if_cancelled() {
            return None;
        }

        let job = self.pending.next()?;
        self.delivered += 1;
        Some(job)
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn into_stream(self) -> impl Stream<Item = JobRecord> {
        stream::unfold(self, |mut discovery| async move {
            discovery.next_job().await.map(|job| (job, discovery))
        })
    }

    fn stop_if_cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            // drop whatever is left so the stream stays exhausted
            self.pending = Vec::new().into_iter();
            true
        } else {
            false
        }
    }
}
