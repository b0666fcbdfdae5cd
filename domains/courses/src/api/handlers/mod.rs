//! HTTP handlers for the Courses domain

pub mod attachments;
pub mod categories;
pub mod chapters;
pub mod courses;

use serde::Deserialize;
use validator::Validate;

/// Single-field title update (course or chapter)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

/// Single-field description update (course or chapter)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDescriptionRequest {
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
}

/// Publish or unpublish (course or chapter)
#[derive(Debug, Deserialize, Validate)]
pub struct PublishRequest {
    pub is_published: bool,
}
