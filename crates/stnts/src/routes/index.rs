//! The new tab page.

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

/// Render the index page. Rendered on every request since it shows the
/// current time; only the compiled template is cached.
pub async fn index_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = render::render_index(&state.templates, &state.site)?;

    let mut headers = super::body_headers("text/html; charset=utf-8", &body);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok((StatusCode::OK, headers, body).into_response())
}
