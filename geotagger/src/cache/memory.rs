//! In-memory tile cache using moka.
//!
//! Memoizes decoded tiles for the lifetime of the cache. There is no
//! eviction: the number of tiles one run touches is bounded by the map area
//! limits, so memory growth stays small.
//!
//! Moka coalesces concurrent initialisation of one key, so a tile requested
//! by several workers at once is still fetched a single time, while reads of
//! already resolved tiles never block.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;
use tracing::{debug, warn};

use crate::cache::CacheStats;
use crate::coord::TileId;
use crate::provider::{ProviderError, TileFetcher, TileRaster};

/// Initial number of slots reserved in the cache.
const INITIAL_CAPACITY: usize = 64;

/// Memoizing front of a [`TileFetcher`].
///
/// Owns its fetcher. Failed fetches are not stored.
pub struct TileCache<F: TileFetcher> {
    fetcher: F,
    tiles: Cache<TileId, TileRaster>,
    hits: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

impl<F: TileFetcher> TileCache<F> {
    /// Creates an empty cache in front of `fetcher`.
    pub fn new(fetcher: F) -> Self {
        let tiles = Cache::builder()
            .name("tiles")
            .initial_capacity(INITIAL_CAPACITY)
            .build();

        Self {
            fetcher,
            tiles,
            hits: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Returns the tile, fetching it on first use.
    ///
    /// Concurrent calls for the same uncached tile share one fetch; the
    /// others wait for its outcome.
    pub fn get(&self, tile: TileId) -> Result<TileRaster, ProviderError> {
        let mut fetched = false;

        let result = self.tiles.try_get_with(tile, || {
            fetched = true;
            self.fetches.fetch_add(1, Ordering::Relaxed);
            debug!(tile = %tile, fetcher = self.fetcher.name(), "Tile cache miss");
            self.fetcher.fetch(tile)
        });

        match result {
            Ok(raster) => {
                if !fetched {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(raster)
            }
            Err(e) => {
                if fetched {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    warn!(tile = %tile, error = %e, "Tile fetch failed");
                }
                Err((*e).clone())
            }
        }
    }

    /// Check if a tile is already cached.
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains_key(&tile)
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.run_pending_tasks();
        self.tiles.entry_count() as usize
    }

    /// Whether no tile has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// The fetcher behind this cache.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
