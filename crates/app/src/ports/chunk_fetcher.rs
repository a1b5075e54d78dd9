//! Chunk fetcher port — remote partitions of the glyph catalog.

use std::future::Future;

use pageshell_domain::error::FetchError;
use pageshell_domain::icon::ChunkMap;

/// Fetches one catalog chunk (`GET /static/mdi/<file>.json`).
pub trait ChunkFetcher {
    /// Fetch and decode the chunk named `file` (without extension).
    fn fetch_chunk(&self, file: &str) -> impl Future<Output = Result<ChunkMap, FetchError>> + Send;
}

impl<T: ChunkFetcher + Send + Sync> ChunkFetcher for std::sync::Arc<T> {
    fn fetch_chunk(&self, file: &str) -> impl Future<Output = Result<ChunkMap, FetchError>> + Send {
        (**self).fetch_chunk(file)
    }
}
