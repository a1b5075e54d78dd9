//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod icons;

use axum::Router;
use axum::routing::get;

use pageshell_app::ports::{ChunkFetcher, IconStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, F>() -> Router<AppState<S, F>>
where
    S: IconStore + Send + Sync + 'static,
    F: ChunkFetcher + Send + Sync + 'static,
{
    Router::new().route("/icons/{icon}", get(icons::get::<S, F>))
}
