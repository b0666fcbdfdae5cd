//! Uploads domain: course image, attachment and chapter video upload routes

pub mod api;
pub mod domain;

pub use api::routes;
pub use api::UploadsState;
pub use domain::rules::{MediaKind, UploadRoute};
