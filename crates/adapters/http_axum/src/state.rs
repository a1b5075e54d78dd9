//! Shared application state for axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use pageshell_app::ports::{ChunkFetcher, IconStore};
use pageshell_app::services::icon_cache::IconCache;

/// Application state shared across all axum handlers.
///
/// Generic over the icon store and chunk fetcher to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`.
pub struct AppState<S, F> {
    /// Icon resolution service.
    pub icons: IconCache<S, F>,
    /// Directory holding the glyph catalog chunk files, if served locally.
    pub catalog_dir: Option<Arc<PathBuf>>,
}

impl<S, F> Clone for AppState<S, F> {
    fn clone(&self) -> Self {
        Self {
            icons: self.icons.clone(),
            catalog_dir: self.catalog_dir.clone(),
        }
    }
}

impl<S, F> AppState<S, F>
where
    S: IconStore + Send + Sync + 'static,
    F: ChunkFetcher + Send + Sync + 'static,
{
    /// Create a new application state around an icon cache.
    pub fn new(icons: IconCache<S, F>) -> Self {
        Self {
            icons,
            catalog_dir: None,
        }
    }

    /// Serve the glyph catalog from `dir` under `/static/mdi`.
    #[must_use]
    pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.catalog_dir = Some(Arc::new(dir.into()));
        self
    }
}
