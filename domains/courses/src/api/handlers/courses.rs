//! Course authoring API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use coursecraft_auth::AuthUser;
use coursecraft_common::{Error, Pagination, Result, ValidatedJson};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{PublishRequest, UpdateDescriptionRequest, UpdateTitleRequest};
use crate::api::guard::require_owned_course;
use crate::api::middleware::CoursesState;
use crate::api::video::detach_chapter_video;
use crate::domain::entities::{validate_price, validate_title, Attachment, Category, Chapter, Course};
use crate::domain::readiness::{course_readiness, ensure_course_publishable, ReadinessReport};

/// Request for creating a course
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateImageRequest {
    #[validate(url)]
    pub image_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePriceRequest {
    pub price: Decimal,
}

/// Course response DTO
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub formatted_price: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            formatted_price: c.formatted_price(),
            id: c.id,
            title: c.title,
            description: c.description,
            image_url: c.image_url,
            price: c.price,
            category_id: c.category_id,
            is_published: c.is_published,
            owner_id: c.owner_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Course with its chapters, attachments, category and publish progress
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub category: Option<Category>,
    pub chapters: Vec<Chapter>,
    pub attachments: Vec<Attachment>,
    pub readiness: ReadinessReport,
}

fn course_gone() -> Error {
    Error::NotFound("Course not found".to_string())
}

/// Create a course owned by the caller
pub async fn create_course(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>)> {
    let course = Course::new(ctx.user_id(), &req.title)?;
    let created = state.repos.courses.create(&course).await?;

    tracing::info!(course_id = %created.id, user_id = %ctx.user_id(), "Course created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List the caller's own courses
pub async fn list_my_courses(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<CourseResponse>>> {
    let courses = state
        .repos
        .courses
        .list_by_owner(ctx.user_id(), page.limit(), page.offset())
        .await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Public catalog of published courses
pub async fn list_catalog(
    State(state): State<CoursesState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<CourseResponse>>> {
    let courses = state
        .repos
        .courses
        .list_published(page.limit(), page.offset())
        .await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Get a course with everything the editor needs
pub async fn get_course(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let chapters = state.repos.chapters.list_by_course(course.id).await?;
    let attachments = state.repos.attachments.list_by_course(course.id).await?;
    let category = match course.category_id {
        Some(category_id) => state.repos.categories.find(category_id).await?,
        None => None,
    };
    let readiness = course_readiness(&course, &chapters).report();

    Ok(Json(CourseDetailResponse {
        course: course.into(),
        category,
        chapters,
        attachments,
        readiness,
    }))
}

pub async fn update_course_title(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTitleRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;
    let title = validate_title(&req.title)?;

    let updated = state
        .repos
        .courses
        .update_title(course.id, ctx.user_id(), &title)
        .await?
        .ok_or_else(course_gone)?;

    Ok(Json(updated.into()))
}

pub async fn update_course_description(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateDescriptionRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let updated = state
        .repos
        .courses
        .update_description(course.id, ctx.user_id(), &req.description)
        .await?
        .ok_or_else(course_gone)?;

    Ok(Json(updated.into()))
}

pub async fn update_course_image(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateImageRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let updated = state
        .repos
        .courses
        .update_image(course.id, ctx.user_id(), &req.image_url)
        .await?
        .ok_or_else(course_gone)?;

    Ok(Json(updated.into()))
}

pub async fn update_course_category(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    state
        .repos
        .categories
        .find(req.category_id)
        .await?
        .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;

    let updated = state
        .repos
        .courses
        .update_category(course.id, ctx.user_id(), req.category_id)
        .await?
        .ok_or_else(course_gone)?;

    Ok(Json(updated.into()))
}

pub async fn update_course_price(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePriceRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;
    let price = validate_price(req.price)?;

    let updated = state
        .repos
        .courses
        .update_price(course.id, ctx.user_id(), price)
        .await?
        .ok_or_else(course_gone)?;

    Ok(Json(updated.into()))
}

/// Publish (after the readiness check) or unpublish a course
pub async fn publish_course(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<PublishRequest>,
) -> Result<Json<CourseResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    if req.is_published {
        let chapters = state.repos.chapters.list_by_course(course.id).await?;
        ensure_course_publishable(&course, &chapters)?;
    }

    let updated = state
        .repos
        .courses
        .set_published(course.id, ctx.user_id(), req.is_published)
        .await?
        .ok_or_else(course_gone)?;

    tracing::info!(
        course_id = %updated.id,
        is_published = updated.is_published,
        "Course publish state changed"
    );
    Ok(Json(updated.into()))
}

/// Delete a course after releasing every chapter video at the host.
///
/// Chapters and their mux_data rows go by cascade. If a release fails no
/// rows are removed.
pub async fn delete_course(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let videos = state.repos.mux_data.list_by_course(course.id).await?;
    let mut released: Vec<&str> = Vec::with_capacity(videos.len());
    for mux_data in &videos {
        if let Err(e) = detach_chapter_video(state.video.as_ref(), Some(mux_data)).await {
            // Rows stay in place; a retry treats released assets as already gone
            tracing::warn!(
                course_id = %course.id,
                failed_asset_id = %mux_data.asset_id,
                released_asset_ids = ?released,
                error = %e,
                "Course deletion stopped while releasing chapter videos"
            );
            return Err(e);
        }
        released.push(&mux_data.asset_id);
    }

    let removed_attachments = state
        .repos
        .attachments
        .delete_all_for_course(course.id, ctx.user_id())
        .await?;

    if !state.repos.courses.delete(course.id, ctx.user_id()).await? {
        return Err(course_gone());
    }

    tracing::info!(
        course_id = %course.id,
        released_videos = videos.len(),
        removed_attachments,
        "Course deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
