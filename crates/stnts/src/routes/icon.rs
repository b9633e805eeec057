//! Favicon route.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, IconError};
use crate::icon::normalize_host;
use crate::state::AppState;

/// Handle a request for a host's favicon.
///
/// Route: `GET /icon/{host}`
///
/// Only hosts that appear on the page are probed.
pub async fn icon_handler(
    State(state): State<AppState>,
    Path(host): Path<String>,
) -> Result<Response, AppError> {
    let host = normalize_host(&host)?;

    if !state.hosts.contains(&host) {
        tracing::debug!(host = %host, "icon requested for host not on the page");
        return Err(IconError::NotFound(host).into());
    }

    let icon = state.icons.resolve(&host).await?;

    let mut headers = super::body_headers(icon.content_type, &icon.bytes);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );

    Ok((StatusCode::OK, headers, icon.bytes).into_response())
}
