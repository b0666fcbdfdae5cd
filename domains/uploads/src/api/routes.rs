//! Route definitions for Uploads domain API

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::handlers;
use super::middleware::UploadsState;

/// Create all Uploads domain API routes.
///
/// The global request body limit is lifted here; each upload route caps
/// its file size while reading the multipart stream.
pub fn routes() -> Router<UploadsState> {
    Router::new()
        .route("/v1/uploads/{route}", post(handlers::upload_file))
        .layer(DefaultBodyLimit::disable())
}
