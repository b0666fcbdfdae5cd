//! Course attachment API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coursecraft_auth::AuthUser;
use coursecraft_common::{Error, Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::guard::require_owned_course;
use crate::api::middleware::CoursesState;
use crate::domain::entities::Attachment;

/// An uploaded file to attach to a course
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAttachmentRequest {
    #[validate(url)]
    pub url: String,

    /// Original file name, shown without its extension
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// MIME type of the upload (`application/pdf`)
    #[serde(alias = "type")]
    #[validate(length(min = 1, max = 255))]
    pub content_type: String,
}

pub async fn create_attachment(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateAttachmentRequest>,
) -> Result<(StatusCode, Json<Attachment>)> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let attachment = Attachment::from_upload(
        course.id,
        ctx.user_id(),
        &req.url,
        &req.name,
        &req.content_type,
    )?;
    let created = state.repos.attachments.create(&attachment).await?;

    tracing::info!(
        course_id = %course.id,
        attachment_id = %created.id,
        attachment_type = %created.attachment_type,
        "Attachment added"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_attachment(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let deleted = state
        .repos
        .attachments
        .delete(attachment_id, course.id, ctx.user_id())
        .await?;
    if !deleted {
        return Err(Error::NotFound("Attachment not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
