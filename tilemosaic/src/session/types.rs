//! Session configuration, outcomes and errors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::coord::{CoordError, TileKey};
use crate::fetch::{FetchError, FetchSource};
use crate::mosaic::{Mosaic, MosaicError};
use crate::plan::ProgressSnapshot;

/// Default number of tiles resolved concurrently per request.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Default time budget for the fetch phase of a request.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(120);

/// What a request does when some tiles could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CompletionPolicy {
    /// Any failed tile fails the request.
    #[default]
    RequireAll,
    /// Stitch what resolved when at least `min_ratio` of the tiles did.
    AllowPartial { min_ratio: f64 },
}

impl CompletionPolicy {
    /// Policy for a minimum success ratio. `1.0` or more requires all tiles.
    pub fn from_min_ratio(min_ratio: f64) -> Self {
        if min_ratio >= 1.0 {
            Self::RequireAll
        } else {
            Self::AllowPartial {
                min_ratio: min_ratio.max(0.0),
            }
        }
    }

    /// Whether a settled request with this progress may be stitched.
    pub fn accepts(&self, progress: &ProgressSnapshot) -> bool {
        if progress.completed == 0 {
            return false;
        }
        match self {
            Self::RequireAll => progress.completed >= progress.needed,
            Self::AllowPartial { min_ratio } => progress.success_ratio() >= *min_ratio,
        }
    }
}

/// Tunables for [`MosaicSession`](super::MosaicSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub max_concurrent_fetches: usize,
    pub deadline: Duration,
    pub policy: CompletionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            deadline: DEFAULT_DEADLINE,
            policy: CompletionPolicy::RequireAll,
        }
    }
}

impl SessionConfig {
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Why a tile is missing from a mosaic.
#[derive(Debug, Clone)]
pub enum FailureReason {
    Fetch(FetchError),
    /// Still in flight when the deadline passed.
    DeadlineExceeded,
}

/// A tile of the request that did not resolve.
#[derive(Debug, Clone)]
pub struct TileFailure {
    pub key: TileKey,
    pub reason: FailureReason,
}

impl fmt::Display for TileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::Fetch(e) => write!(f, "{}", e),
            FailureReason::DeadlineExceeded => {
                write!(f, "tile {} was still pending at the deadline", self.key)
            }
        }
    }
}

/// How many tiles each cache level served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub memory: usize,
    pub disk: usize,
    pub network: usize,
}

impl SourceCounts {
    pub fn record(&mut self, source: FetchSource) {
        match source {
            FetchSource::Memory => self.memory += 1,
            FetchSource::Disk => self.disk += 1,
            FetchSource::Network => self.network += 1,
        }
    }
}

/// Result of a successful request.
#[derive(Debug)]
pub struct MosaicOutcome {
    pub mosaic: Mosaic,
    pub summary: ProgressSnapshot,
    /// Tiles missing from the mosaic, sorted by key.
    pub failures: Vec<TileFailure>,
    /// True when the mosaic was stitched without every tile.
    pub partial: bool,
    pub sources: SourceCounts,
}

/// Errors that abort a request.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] CoordError),

    #[error("no tiles to fetch ({rejected} point(s) rejected)")]
    NoTiles { rejected: usize },

    #[error("only {completed} of {needed} tiles resolved")]
    Incomplete {
        completed: usize,
        needed: usize,
        failures: Vec<TileFailure>,
    },

    #[error("stitching failed: {0}")]
    Stitch(#[from] MosaicError),

    #[error("stitch task failed: {0}")]
    StitchTask(String),
}
