//! JSON handlers for icon resolution.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pageshell_app::ports::{ChunkFetcher, IconStore};
use pageshell_app::services::icon_cache::IconLookup;
use pageshell_domain::error::{NotFoundError, ShellError};

use crate::error::ApiError;
use crate::state::AppState;

/// A resolved icon.
#[derive(Debug, Serialize)]
pub struct IconBody {
    pub icon: String,
    pub path: String,
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<IconBody>),
    /// The namespace is not served by the vector catalog.
    NotVector(String),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NotVector(icon) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": format!("`{icon}` is not a vector icon"),
                })),
            )
                .into_response(),
        }
    }
}

/// `GET /api/icons/{icon}`
pub async fn get<S, F>(
    State(state): State<AppState<S, F>>,
    Path(icon): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: IconStore + Send + Sync + 'static,
    F: ChunkFetcher + Send + Sync + 'static,
{
    match state.icons.resolve(&icon).await? {
        IconLookup::Path(path) => Ok(GetResponse::Ok(Json(IconBody { icon, path }))),
        IconLookup::NotVector => Ok(GetResponse::NotVector(icon)),
        IconLookup::Missing => Err(ApiError::from(ShellError::from(NotFoundError {
            entity: "Icon",
            id: icon,
        }))),
    }
}
