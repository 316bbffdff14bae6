//! TTL cache for the place catalog.
//!
//! The catalog is a few thousand entries and changes rarely, so it is
//! fetched once and reused until the TTL expires. When a refresh fails
//! and an expired snapshot is still around, the snapshot is served
//! instead of surfacing the error: a stale catalog beats a silent radio.

use crate::client::DirectoryClient;
use crate::error::{Error, Result};
use crate::models::Place;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Default place catalog TTL in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug)]
struct Snapshot {
    places: Arc<Vec<Place>>,
    fetched_at: Instant,
}

/// Caches the place catalog with a freshness window.
#[derive(Debug)]
pub struct PlaceCache {
    snapshot: Option<Snapshot>,
    ttl: Duration,
}

impl PlaceCache {
    pub fn new(ttl: Duration) -> Self {
        Self { snapshot: None, ttl }
    }

    /// Whether the current snapshot is inside its freshness window.
    pub fn is_fresh(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.fetched_at.elapsed() < self.ttl)
    }

    /// Drop the snapshot so the next call fetches anew.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Return a fresh catalog, fetching from the directory if needed.
    ///
    /// A failed refresh falls back to the previous snapshot when one
    /// exists; with no snapshot at all the failure is reported as
    /// [`Error::DirectoryUnavailable`].
    pub async fn ensure_fresh(&mut self, client: &DirectoryClient) -> Result<Arc<Vec<Place>>> {
        if let Some(snapshot) = &self.snapshot {
            if snapshot.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&snapshot.places));
            }
        }

        info!("Refreshing place catalog from the station directory...");
        match client.places().await {
            Ok(list) => {
                info!("Loaded {} places", list.len());
                let places = Arc::new(list);
                self.snapshot = Some(Snapshot {
                    places: Arc::clone(&places),
                    fetched_at: Instant::now(),
                });
                Ok(places)
            }
            Err(e) => match &self.snapshot {
                Some(snapshot) => {
                    warn!("Station directory is unreachable, serving stale catalog: {e}");
                    Ok(Arc::clone(&snapshot.places))
                }
                None => Err(Error::DirectoryUnavailable(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_is_not_fresh() {
        let cache = PlaceCache::new(Duration::from_secs(3600));
        assert!(!cache.is_fresh());
    }

    #[test]
    fn invalidate_clears_the_snapshot() {
        let mut cache = PlaceCache::new(Duration::from_secs(3600));
        cache.snapshot = Some(Snapshot {
            places: Arc::new(Vec::new()),
            fetched_at: Instant::now(),
        });
        assert!(cache.is_fresh());
        cache.invalidate();
        assert!(!cache.is_fresh());
    }

    #[test]
    fn zero_ttl_snapshot_is_immediately_stale() {
        let mut cache = PlaceCache::new(Duration::ZERO);
        cache.snapshot = Some(Snapshot {
            places: Arc::new(Vec::new()),
            fetched_at: Instant::now(),
        });
        assert!(!cache.is_fresh());
    }
}
