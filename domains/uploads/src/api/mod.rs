//! HTTP API for the Uploads domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::UploadsState;
pub use routes::routes;
