//! Route definitions.
//!
//! ## Routes
//!
//! - `GET /` - The new tab page
//! - `GET /icon/{host}` - Cached favicon for a host on the page
//! - `GET /health` - Health check (JSON)
//!
//! Everything else is a plain-text 404.

mod health;
mod icon;
mod index;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, Uri, header};
use axum::routing::get;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_page))
        .route("/icon/{host}", get(icon::icon_handler))
        .route("/health", get(health::health_check))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Headers shared by every successful body: type, nosniff and an ETag.
fn body_headers(content_type: &str, body: &[u8]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(val) = HeaderValue::from_str(content_type) {
        headers.insert(header::CONTENT_TYPE, val);
    }
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    // ETag (xxHash of content)
    let hash = xxhash_rust::xxh3::xxh3_64(body);
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(val) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, val);
    }

    headers
}
