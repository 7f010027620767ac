//! Link preview route handler.
//!
//! Handles `GET /api/link-preview?url=<url>`.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::PreviewError;
use crate::state::AppState;

/// Query parameters for the preview endpoint.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    url: Option<String>,
}

/// Resolve a URL into `{ title, description, image, url }`.
///
/// 400 when `url` is missing or the query string is malformed, 500 when the
/// upstream source fails. Every failure body is JSON `{ error }`.
pub async fn link_preview_handler(
    State(state): State<AppState>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> Result<Response, PreviewError> {
    let Query(query) = query.map_err(|e| PreviewError::InvalidQuery(e.body_text()))?;

    let preview = state.resolver.resolve(query.url.as_deref()).await?;

    let mut response = Json(preview).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=300"),
    );

    Ok(response)
}
