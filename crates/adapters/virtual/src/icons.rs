//! In-memory icon store and a static glyph catalog.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pageshell_app::ports::{ChunkFetcher, IconStore};
use pageshell_domain::error::{FetchError, ShellError};
use pageshell_domain::icon::ChunkMap;

#[derive(Default)]
struct StoreState {
    icons: HashMap<String, String>,
    version: Option<String>,
}

/// Versioned in-memory [`IconStore`] counting its transactions.
#[derive(Default)]
pub struct InMemoryIconStore {
    state: Mutex<StoreState>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    clears: AtomicUsize,
}

impl InMemoryIconStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `icons` under `version`.
    #[must_use]
    pub fn seeded<I, K, V>(version: &str, icons: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.version = Some(version.to_string());
            state
                .icons
                .extend(icons.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of `get_many` transactions.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `put_many` transactions.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().icons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().icons.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().icons.get(name).cloned()
    }
}

impl IconStore for InMemoryIconStore {
    fn get_many(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Option<String>>, ShellError>> + Send {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        let found = names
            .iter()
            .map(|name| state.icons.get(name).cloned())
            .collect();
        async move { Ok(found) }
    }

    fn put_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), ShellError>> + Send {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.lock().icons.extend(entries);
        async { Ok(()) }
    }

    fn clear(&self) -> impl Future<Output = Result<(), ShellError>> + Send {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.lock().icons.clear();
        async { Ok(()) }
    }

    fn version(&self) -> impl Future<Output = Result<Option<String>, ShellError>> + Send {
        let version = self.lock().version.clone();
        async move { Ok(version) }
    }

    fn set_version(&self, version: &str) -> impl Future<Output = Result<(), ShellError>> + Send {
        self.lock().version = Some(version.to_string());
        async { Ok(()) }
    }
}

/// [`ChunkFetcher`] serving fixed chunks.
///
/// Unknown files fail like a 404 would.
#[derive(Default)]
pub struct StaticChunkFetcher {
    chunks: HashMap<String, ChunkMap>,
    failing: HashSet<String>,
    latency: Duration,
    fetches: AtomicUsize,
}

impl StaticChunkFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chunk<I, K, V>(mut self, file: &str, icons: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let chunk = icons
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.chunks.insert(file.to_string(), chunk);
        self
    }

    /// Make every fetch of `file` fail.
    #[must_use]
    pub fn with_failure(mut self, file: &str) -> Self {
        self.failing.insert(file.to_string());
        self
    }

    /// Delay every response by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of fetches issued so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ChunkFetcher for StaticChunkFetcher {
    fn fetch_chunk(&self, file: &str) -> impl Future<Output = Result<ChunkMap, FetchError>> + Send {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let result = if self.failing.contains(file) {
            Err(FetchError::new(file, "connection reset"))
        } else {
            self.chunks
                .get(file)
                .cloned()
                .ok_or_else(|| FetchError::new(file, "404 Not Found"))
        };
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}
