//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use pageshell_app::ports::{ChunkFetcher, IconStore};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and, when a catalog directory is configured,
/// serves its chunk files under `/static/mdi`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S, F>(state: AppState<S, F>) -> Router
where
    S: IconStore + Send + Sync + 'static,
    F: ChunkFetcher + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes());
    if let Some(dir) = &state.catalog_dir {
        router = router.nest_service("/static/mdi", ServeDir::new(dir.as_path()));
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
