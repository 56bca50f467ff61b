//! Request orchestration: plan, fetch, track and stitch.
//!
//! A [`MosaicSession`] turns the geo-points of one drive into a stitched
//! [`Mosaic`](crate::mosaic::Mosaic):
//!
//! 1. the planner computes the request's [`TileSet`](crate::plan::TileSet);
//! 2. every key is resolved once through the shared [`TileFetcher`], at most
//!    `max_concurrent_fetches` at a time, bounded by the request deadline;
//! 3. each settled tile updates the request's own progress counters and
//!    notifies the optional observer;
//! 4. once every fetch settled (or the deadline passed) the
//!    [`CompletionPolicy`] decides whether the resolved tiles are stitched.
//!
//! Sessions sharing a fetcher share its caches but never their progress.

mod types;

pub use types::{
    CompletionPolicy, FailureReason, MosaicOutcome, SessionConfig, SessionError, SourceCounts,
    TileFailure, DEFAULT_DEADLINE, DEFAULT_MAX_CONCURRENT_FETCHES,
};

use std::collections::HashSet;
use std::pin::pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::cache::DiskCache;
use crate::coord::{GeoPoint, TileKey};
use crate::fetch::{FetchedTile, TileFetcher};
use crate::mosaic::stitch;
use crate::plan::{ProgressObserver, TilePlanner};
use crate::provider::TileProvider;

/// Builds mosaics for drive requests.
pub struct MosaicSession<P, D> {
    fetcher: Arc<TileFetcher<P, D>>,
    config: SessionConfig,
}

impl<P, D> MosaicSession<P, D>
where
    P: TileProvider,
    D: DiskCache,
{
    pub fn new(fetcher: Arc<TileFetcher<P, D>>, config: SessionConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Arc<TileFetcher<P, D>> {
        &self.fetcher
    }

    /// Builds the mosaic covering `points` at `zoom`.
    ///
    /// `observer` is called with a progress snapshot after every tile that
    /// completes or fails.
    #[instrument(skip(self, points, observer), fields(points = points.len()))]
    pub async fn build(
        &self,
        points: &[GeoPoint],
        zoom: u8,
        observer: Option<&ProgressObserver<'_>>,
    ) -> Result<MosaicOutcome, SessionError> {
        let set = TilePlanner::new(zoom)?.plan(points);
        if set.is_empty() {
            return Err(SessionError::NoTiles {
                rejected: set.rejected_points(),
            });
        }

        let progress = set.progress();
        let deadline = Instant::now() + self.config.deadline;
        info!(
            tiles = set.len(),
            rejected_points = set.rejected_points(),
            "Resolving tile set"
        );

        let mut resolved: Vec<FetchedTile> = Vec::with_capacity(set.len());
        let mut failures = Vec::new();
        let mut settled: HashSet<TileKey> = HashSet::with_capacity(set.len());
        let mut sources = SourceCounts::default();

        let mut fetches = pin!(stream::iter(set.iter().copied())
            .map(|key| async move { (key, self.fetcher.resolve(key).await) })
            .buffer_unordered(self.config.max_concurrent_fetches.max(1)));

        loop {
            let next = match tokio::time::timeout_at(deadline, fetches.next()).await {
                Ok(Some(next)) => next,
                Ok(None) => break,
                Err(_) => {
                    let pending: Vec<TileKey> =
                        set.iter().filter(|k| !settled.contains(*k)).copied().collect();
                    warn!(
                        pending = pending.len(),
                        deadline_secs = self.config.deadline.as_secs_f64(),
                        "Deadline reached with tiles still pending"
                    );
                    progress.record_abandoned(pending.len());
                    failures.extend(pending.into_iter().map(|key| TileFailure {
                        key,
                        reason: FailureReason::DeadlineExceeded,
                    }));
                    if let Some(observer) = observer {
                        observer(progress.snapshot());
                    }
                    break;
                }
            };

            match next {
                (key, Ok(tile)) => {
                    settled.insert(key);
                    sources.record(tile.source);
                    resolved.push(tile);
                    if progress.record_completed() {
                        debug!("All tiles resolved");
                    }
                }
                (key, Err(e)) => {
                    settled.insert(key);
                    warn!(tile = %key, error = %e, "Tile failed");
                    progress.record_failed();
                    failures.push(TileFailure {
                        key,
                        reason: FailureReason::Fetch(e),
                    });
                }
            }

            if let Some(observer) = observer {
                observer(progress.snapshot());
            }
        }

        let summary = progress.snapshot();
        failures.sort_by_key(|f| f.key);

        let partial = !failures.is_empty();
        if !self.config.policy.accepts(&summary) {
            warn!(
                completed = summary.completed,
                needed = summary.needed,
                "Request incomplete"
            );
            return Err(SessionError::Incomplete {
                completed: summary.completed,
                needed: summary.needed,
                failures,
            });
        }

        let mosaic = tokio::task::spawn_blocking(move || {
            stitch(resolved.iter().map(|tile| (tile.key, tile.image.as_ref())))
        })
        .await
        .map_err(|e| SessionError::StitchTask(e.to_string()))??;

        info!(
            completed = summary.completed,
            needed = summary.needed,
            partial = partial,
            from_memory = sources.memory,
            from_disk = sources.disk,
            from_network = sources.network,
            width = mosaic.width(),
            height = mosaic.height(),
            "Mosaic built"
        );

        Ok(MosaicOutcome {
            mosaic,
            summary,
            failures,
            partial,
            sources,
        })
    }
}
