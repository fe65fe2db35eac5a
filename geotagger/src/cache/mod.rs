//! Tile caching.
//!
//! [`TileCache`] memoizes decoded tiles in memory for as long as it lives.
//! It is an owned collaborator: create one per run and hand it to the
//! [`MapComposer`](crate::compose::MapComposer).

mod memory;

pub use memory::TileCache;

use std::fmt;

/// Counters describing cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served without a fetch.
    pub hits: u64,
    /// Fetches issued to the underlying fetcher.
    pub fetches: u64,
    /// Fetches that failed.
    pub failures: u64,
    /// Tiles currently held.
    pub entries: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles cached, {} fetched ({} failed), {} hits",
            self.entries, self.fetches, self.failures, self.hits
        )
    }
}
