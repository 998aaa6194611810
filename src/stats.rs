//! Windowed throughput and waiting statistics.

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// The statistics for one reporting window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Vehicles retired during the window.
    pub throughput: usize,
    /// Vehicles waiting at the most recent sample.
    pub waiting_count: usize,
}

/// Counts retirements over fixed, independent windows of wall-clock time.
///
/// Each window resets sharply when flushed; there is no smoothing.
#[derive(Clone, Debug)]
pub struct StatsAggregator {
    /// The window length.
    interval: Duration,
    /// The end of the previous window, or construction time.
    last_flush: Instant,
    /// Retirements in the current window.
    retired: usize,
    /// The most recent waiting count sample.
    waiting: usize,
    /// Retirements since construction.
    total_retired: u64,
}

impl StatsAggregator {
    /// Creates an aggregator whose first window starts at `start`.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last_flush: start,
            retired: 0,
            waiting: 0,
            total_retired: 0,
        }
    }

    /// Records a single retirement in the current window.
    pub fn record_retirement(&mut self) {
        self.retired += 1;
        self.total_retired += 1;
    }

    /// Records the current number of waiting vehicles.
    pub fn sample_waiting(&mut self, count: usize) {
        self.waiting = count;
    }

    /// Closes the current window if at least one interval has elapsed since the
    /// last flush, returning its statistics and starting a new, empty window.
    pub fn maybe_flush(&mut self, now: Instant) -> Option<Snapshot> {
        if now.saturating_duration_since(self.last_flush) < self.interval {
            return None;
        }
        let snapshot = Snapshot {
            throughput: self.retired,
            waiting_count: self.waiting,
        };
        debug!(
            "stats window closed: {} retired, {} waiting",
            snapshot.throughput, snapshot.waiting_count
        );
        self.retired = 0;
        self.last_flush = now;
        Some(snapshot)
    }

    /// Retirements recorded in the current, unflushed window.
    pub fn pending_retirements(&self) -> usize {
        self.retired
    }

    /// Retirements recorded since construction.
    pub fn total_retired(&self) -> u64 {
        self.total_retired
    }

    /// The window length.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
