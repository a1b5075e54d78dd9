//! Icon cache — resolves `<namespace>:<name>` icons to SVG path data.
//!
//! Lookups go to the persistent [`IconStore`] first, then to the remote
//! catalog chunk owning the name. Store reads issued in the same scheduler
//! tick share one read transaction, concurrent lookups in one chunk share one
//! fetch, and fetched chunks are written back in debounced batches.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{OnceCell, oneshot};

use pageshell_domain::error::{FetchError, ShellError};
use pageshell_domain::icon::{ChunkMap, ChunkTable, IconName};

use crate::ports::{ChunkFetcher, IconStore};

/// Trailing-edge delay before fetched chunks are persisted.
pub const DEFAULT_WRITE_DEBOUNCE: Duration = Duration::from_secs(2);

/// Tuning knobs for [`IconCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCacheConfig {
    pub write_debounce: Duration,
}

impl Default for IconCacheConfig {
    fn default() -> Self {
        Self {
            write_debounce: DEFAULT_WRITE_DEBOUNCE,
        }
    }
}

/// Result of resolving an icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconLookup {
    /// SVG path data.
    Path(String),
    /// The owning chunk has no entry for this name.
    Missing,
    /// Not a vector catalog namespace; callers fall back to a generic renderer.
    NotVector,
}

type ChunkResult = Result<Arc<ChunkMap>, FetchError>;
type SharedChunk = Shared<BoxFuture<'static, ChunkResult>>;
type ChunkSlots = Mutex<HashMap<String, SharedChunk>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chunked, coalescing, persisted icon resolver.
///
/// Cloning is cheap and every clone shares the same in-flight requests and
/// write buffer.
pub struct IconCache<S, F> {
    inner: Arc<Inner<S, F>>,
}

impl<S, F> Clone for IconCache<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S, F> {
    table: ChunkTable,
    store: Arc<S>,
    fetcher: Arc<F>,
    ready: OnceCell<()>,
    reads: Arc<ReadBatch<S>>,
    writes: Arc<WriteBuffer<S>>,
    chunks: Arc<ChunkSlots>,
    /// Chunks whose entries were handed to the write buffer.
    persisted: Mutex<HashSet<String>>,
}

impl<S, F> IconCache<S, F>
where
    S: IconStore + Send + Sync + 'static,
    F: ChunkFetcher + Send + Sync + 'static,
{
    /// Create a cache over `store` for the catalog described by `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Validation`] if the partition table is empty,
    /// unsorted or not contiguous.
    pub fn new(
        store: S,
        fetcher: F,
        table: ChunkTable,
        config: IconCacheConfig,
    ) -> Result<Self, ShellError> {
        table.validate()?;
        let store = Arc::new(store);
        Ok(Self {
            inner: Arc::new(Inner {
                table,
                fetcher: Arc::new(fetcher),
                ready: OnceCell::new(),
                reads: Arc::new(ReadBatch {
                    store: Arc::clone(&store),
                    queue: Mutex::new(Vec::new()),
                }),
                writes: Arc::new(WriteBuffer {
                    store: Arc::clone(&store),
                    debounce: config.write_debounce,
                    state: Mutex::new(WriteState::default()),
                }),
                chunks: Arc::new(Mutex::new(HashMap::new())),
                persisted: Mutex::new(HashSet::new()),
                store,
            }),
        })
    }

    /// Version of the shipped catalog.
    #[must_use]
    pub fn catalog_version(&self) -> &str {
        &self.inner.table.version
    }

    /// Bring the persistent store in line with the catalog version.
    ///
    /// Runs once per cache; a store recorded under another version (or none)
    /// is cleared before the current version is written.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the store could not be read or cleared.
    /// A later call retries.
    pub async fn init(&self) -> Result<(), ShellError> {
        self.inner
            .ready
            .get_or_try_init(|| check_version(self.inner.store.as_ref(), &self.inner.table))
            .await?;
        Ok(())
    }

    /// Resolve `icon` to its path data.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Validation`] for identifiers without a
    /// `namespace:` prefix, and [`ShellError::Fetch`] when the owning chunk
    /// could not be fetched.
    pub async fn resolve(&self, icon: &str) -> Result<IconLookup, ShellError> {
        let icon: IconName = icon.parse()?;
        if !icon.is_vector() {
            return Ok(IconLookup::NotVector);
        }

        let persist = match self.init().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "icon store unavailable, resolving from network only");
                false
            }
        };

        let name = icon.name();
        if persist && let Some(path) = self.inner.reads.get(name).await {
            return Ok(IconLookup::Path(path));
        }

        let Some(file) = self.inner.table.find_chunk(name) else {
            return Ok(IconLookup::Missing);
        };
        let chunk = self.chunk(file).await?;
        if persist {
            self.persist_chunk(file, &chunk);
        }
        Ok(chunk
            .get(name)
            .cloned()
            .map_or(IconLookup::Missing, IconLookup::Path))
    }

    /// Persist pending writes now instead of waiting for the debounce.
    pub async fn flush(&self) {
        self.inner.writes.flush(None).await;
    }

    /// Queue the entries of `file` for writing, once per chunk.
    ///
    /// A chunk fetched while the store was unavailable is written by the
    /// first lookup that hits it after the store recovered.
    fn persist_chunk(&self, file: &str, chunk: &ChunkMap) {
        if !lock(&self.inner.persisted).insert(file.to_string()) {
            return;
        }
        self.inner.writes.schedule(
            chunk
                .iter()
                .map(|(name, path)| (name.clone(), path.clone()))
                .collect(),
        );
    }

    /// In-flight or completed request for `file`, starting one if needed.
    fn chunk(&self, file: &str) -> SharedChunk {
        let mut slots = lock(self.inner.chunks.as_ref());
        if let Some(shared) = slots.get(file) {
            return shared.clone();
        }

        let fetcher = Arc::clone(&self.inner.fetcher);
        let owner = Arc::downgrade(&self.inner.chunks);
        let file = file.to_string();
        let key = file.clone();

        let shared = async move {
            tracing::debug!(file = %file, "fetching icon chunk");
            match fetcher.fetch_chunk(&file).await {
                Ok(map) => Ok(Arc::new(map)),
                Err(err) => {
                    tracing::warn!(file = %file, error = %err, "icon chunk fetch failed");
                    // Waiters already holding this request still see the error;
                    // the next lookup starts a fresh one.
                    if let Some(slots) = owner.upgrade() {
                        lock(slots.as_ref()).remove(&file);
                    }
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        slots.insert(key, shared.clone());
        shared
    }
}

async fn check_version<S: IconStore>(store: &S, table: &ChunkTable) -> Result<(), ShellError> {
    let stored = store.version().await?;
    if stored.as_deref() == Some(table.version.as_str()) {
        return Ok(());
    }
    tracing::info!(
        stored = ?stored,
        current = %table.version,
        "icon catalog version changed, clearing icon store"
    );
    store.clear().await?;
    store.set_version(&table.version).await
}

struct PendingRead {
    name: String,
    reply: oneshot::Sender<Option<String>>,
}

/// Store reads queued during one scheduler tick.
struct ReadBatch<S> {
    store: Arc<S>,
    queue: Mutex<Vec<PendingRead>>,
}

impl<S> ReadBatch<S>
where
    S: IconStore + Send + Sync + 'static,
{
    async fn get(self: &Arc<Self>, name: &str) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        let first = {
            let mut queue = lock(&self.queue);
            queue.push(PendingRead {
                name: name.to_string(),
                reply,
            });
            queue.len() == 1
        };
        if first {
            let this = Arc::clone(self);
            tokio::spawn(async move { this.drain().await });
        }
        rx.await.ok().flatten()
    }

    async fn drain(&self) {
        // Let every lookup issued in this tick join the batch.
        tokio::task::yield_now().await;
        let batch = std::mem::take(&mut *lock(&self.queue));
        if batch.is_empty() {
            return;
        }

        let names = batch.iter().map(|read| read.name.clone()).collect();
        match self.store.get_many(names).await {
            Ok(values) => {
                for (read, value) in batch.into_iter().zip(values) {
                    let _ = read.reply.send(value);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "icon store read failed");
                for read in batch {
                    let _ = read.reply.send(None);
                }
            }
        }
    }
}

#[derive(Default)]
struct WriteState {
    pending: Vec<(String, String)>,
    generation: u64,
}

/// Debounced, batched writes of fetched chunks.
struct WriteBuffer<S> {
    store: Arc<S>,
    debounce: Duration,
    state: Mutex<WriteState>,
}

impl<S> WriteBuffer<S>
where
    S: IconStore + Send + Sync + 'static,
{
    fn schedule(self: &Arc<Self>, entries: Vec<(String, String)>) {
        let generation = {
            let mut state = lock(&self.state);
            state.pending.extend(entries);
            state.generation += 1;
            state.generation
        };
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.flush(Some(generation)).await;
        });
    }

    /// Write the buffer; with `Some(generation)`, only if nothing was
    /// scheduled since.
    async fn flush(&self, generation: Option<u64>) {
        let batch = {
            let mut state = lock(&self.state);
            if generation.is_some_and(|generation| generation != state.generation) {
                return;
            }
            std::mem::take(&mut state.pending)
        };
        if batch.is_empty() {
            return;
        }

        tracing::debug!(count = batch.len(), "persisting icons");
        if let Err(err) = self.store.put_many(batch).await {
            tracing::warn!(error = %err, "failed to persist icons");
        }
    }
}
