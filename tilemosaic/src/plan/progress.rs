//! Completion tracking for one tile set.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

/// Callback invoked after each tile of a request settles.
pub type ProgressObserver<'a> = dyn Fn(ProgressSnapshot) + Send + Sync + 'a;

/// Shared completion counters for one request.
///
/// `completed` and `failed` only ever grow. Counters are atomic so fetches
/// may report from any task or thread.
#[derive(Debug)]
pub struct DownloadProgress {
    needed: usize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadProgress {
    pub fn new(needed: usize) -> Self {
        Self {
            needed,
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Records a successful tile.
    ///
    /// Returns `true` on exactly one call: the one that brings `completed`
    /// up to `needed`.
    pub fn record_completed(&self) -> bool {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        completed == self.needed
    }

    /// Records a failed tile.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::AcqRel);
    }

    /// Records `count` tiles that never settled, e.g. at a deadline.
    pub fn record_abandoned(&self, count: usize) {
        self.failed.fetch_add(count, Ordering::AcqRel);
    }

    pub fn needed(&self) -> usize {
        self.needed
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Acquire)
    }

    /// Whether every needed tile completed successfully.
    pub fn is_complete(&self) -> bool {
        self.completed() >= self.needed
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            needed: self.needed,
            completed: self.completed(),
            failed: self.failed(),
        }
    }
}

/// Point-in-time copy of [`DownloadProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub needed: usize,
    pub completed: usize,
    pub failed: usize,
}

impl ProgressSnapshot {
    /// Tiles that have neither completed nor failed.
    pub fn pending(&self) -> usize {
        self.needed.saturating_sub(self.completed + self.failed)
    }

    /// Fraction of needed tiles that completed. An empty set counts as 1.0.
    pub fn success_ratio(&self) -> f64 {
        if self.needed == 0 {
            1.0
        } else {
            self.completed as f64 / self.needed as f64
        }
    }

    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} tiles ({} failed)",
            self.completed, self.needed, self.failed
        )
    }
}
