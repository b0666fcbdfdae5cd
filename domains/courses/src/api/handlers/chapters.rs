//! Chapter authoring API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coursecraft_auth::AuthUser;
use coursecraft_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{PublishRequest, UpdateDescriptionRequest, UpdateTitleRequest};
use crate::api::guard::{require_owned_chapter, require_owned_course};
use crate::api::middleware::CoursesState;
use crate::api::video::{detach_chapter_video, replace_chapter_video};
use crate::domain::entities::{validate_title, Chapter, MuxData};
use crate::domain::readiness::{chapter_readiness, ensure_chapter_publishable, ReadinessReport};
use crate::domain::reorder::{
    current_positions, resolve_move, validate_assignments, PositionAssignment,
};
use crate::domain::state::VideoState;
use crate::repository::{
    create_chapter_tx, delete_chapter_tx, set_chapter_published_tx,
    unpublish_course_if_no_published_chapters_tx, update_chapter_positions_tx,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateChapterRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccessRequest {
    pub is_free: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(url)]
    pub video_url: String,
}

/// Positions for the chapters that moved
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderChaptersRequest {
    #[validate(length(min = 1))]
    pub list: Vec<PositionAssignment>,
}

/// Drag-and-drop move by list index (0-based)
#[derive(Debug, Deserialize, Validate)]
pub struct MoveChapterRequest {
    pub from_index: usize,
    pub to_index: usize,
}

/// Chapter with its video record, video state and publish progress
#[derive(Debug, Serialize)]
pub struct ChapterDetailResponse {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub mux_data: Option<MuxData>,
    pub video_state: VideoState,
    pub readiness: ReadinessReport,
}

impl ChapterDetailResponse {
    fn new(chapter: Chapter, mux_data: Option<MuxData>) -> Self {
        Self {
            readiness: chapter_readiness(&chapter).report(),
            video_state: VideoState::from_record(mux_data.as_ref()),
            chapter,
            mux_data,
        }
    }
}

/// Result of publishing or unpublishing a chapter
#[derive(Debug, Serialize)]
pub struct PublishChapterResponse {
    #[serde(flatten)]
    pub chapter: Chapter,
    /// Whether the parent course is still published afterwards
    pub course_is_published: bool,
}

#[derive(Debug, Serialize)]
pub struct MoveChapterResponse {
    pub assignments: Vec<PositionAssignment>,
    pub chapters: Vec<Chapter>,
}

fn chapter_gone() -> Error {
    Error::NotFound("Chapter not found".to_string())
}

fn begin_failed(e: sqlx::Error) -> Error {
    Error::Internal(format!("Failed to begin transaction: {}", e))
}

fn commit_failed(e: sqlx::Error) -> Error {
    Error::Internal(format!("Failed to commit transaction: {}", e))
}

/// Append a chapter to the course
pub async fn create_chapter(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateChapterRequest>,
) -> Result<(StatusCode, Json<Chapter>)> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    let chapter = create_chapter_tx(&mut tx, course.id, &req.title).await?;
    tx.commit().await.map_err(commit_failed)?;

    tracing::info!(
        course_id = %course.id,
        chapter_id = %chapter.id,
        position = chapter.position,
        "Chapter created"
    );
    Ok((StatusCode::CREATED, Json(chapter)))
}

pub async fn get_chapter(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ChapterDetailResponse>> {
    let (_, chapter) = require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;
    let mux_data = state.repos.mux_data.find_by_chapter(chapter.id).await?;

    Ok(Json(ChapterDetailResponse::new(chapter, mux_data)))
}

pub async fn update_chapter_title(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<UpdateTitleRequest>,
) -> Result<Json<Chapter>> {
    let (course, chapter) =
        require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;
    let title = validate_title(&req.title)?;

    let updated = state
        .repos
        .chapters
        .update_title(chapter.id, course.id, &title)
        .await?
        .ok_or_else(chapter_gone)?;

    Ok(Json(updated))
}

pub async fn update_chapter_description(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<UpdateDescriptionRequest>,
) -> Result<Json<Chapter>> {
    let (course, chapter) =
        require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;

    let updated = state
        .repos
        .chapters
        .update_description(chapter.id, course.id, &req.description)
        .await?
        .ok_or_else(chapter_gone)?;

    Ok(Json(updated))
}

/// Toggle whether the chapter is a free preview
pub async fn update_chapter_access(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<UpdateAccessRequest>,
) -> Result<Json<Chapter>> {
    let (course, chapter) =
        require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;

    let updated = state
        .repos
        .chapters
        .update_access(chapter.id, course.id, req.is_free)
        .await?
        .ok_or_else(chapter_gone)?;

    Ok(Json(updated))
}

/// Replace the chapter video and its hosted asset
pub async fn update_chapter_video(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<UpdateVideoRequest>,
) -> Result<Json<ChapterDetailResponse>> {
    let (_, chapter) = require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;

    let (updated, mux_data) = replace_chapter_video(&state, &chapter, &req.video_url).await?;

    Ok(Json(ChapterDetailResponse::new(updated, Some(mux_data))))
}

/// Publish a complete chapter, or unpublish it and the course with it when
/// it was the last published chapter
pub async fn publish_chapter(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<PublishRequest>,
) -> Result<Json<PublishChapterResponse>> {
    let (course, chapter) =
        require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;

    if req.is_published {
        let mux_data = state.repos.mux_data.find_by_chapter(chapter.id).await?;
        ensure_chapter_publishable(&chapter, mux_data.as_ref())?;
    }

    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    let updated = set_chapter_published_tx(&mut tx, chapter.id, course.id, req.is_published)
        .await?
        .ok_or_else(chapter_gone)?;
    let course_unpublished = if req.is_published {
        false
    } else {
        unpublish_course_if_no_published_chapters_tx(&mut tx, course.id).await?
    };
    tx.commit().await.map_err(commit_failed)?;

    if course_unpublished {
        tracing::info!(course_id = %course.id, "Course unpublished, no published chapters left");
    }

    Ok(Json(PublishChapterResponse {
        chapter: updated,
        course_is_published: course.is_published && !course_unpublished,
    }))
}

/// Delete a chapter and its hosted video
pub async fn delete_chapter(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path((course_id, chapter_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let (course, chapter) =
        require_owned_chapter(&state.repos, &ctx, course_id, chapter_id).await?;

    let mux_data = state.repos.mux_data.find_by_chapter(chapter.id).await?;
    detach_chapter_video(state.video.as_ref(), mux_data.as_ref()).await?;

    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    if !delete_chapter_tx(&mut tx, chapter.id, course.id).await? {
        return Err(chapter_gone());
    }
    let course_unpublished =
        unpublish_course_if_no_published_chapters_tx(&mut tx, course.id).await?;
    tx.commit().await.map_err(commit_failed)?;

    tracing::info!(
        course_id = %course.id,
        chapter_id = %chapter.id,
        course_unpublished,
        "Chapter deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Write client-computed positions for the moved span
pub async fn reorder_chapters(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ReorderChaptersRequest>,
) -> Result<Json<Vec<Chapter>>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let chapters = state.repos.chapters.list_by_course(course.id).await?;
    validate_assignments(&current_positions(&chapters), &req.list)?;

    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    update_chapter_positions_tx(&mut tx, course.id, &req.list).await?;
    tx.commit().await.map_err(commit_failed)?;

    tracing::info!(course_id = %course.id, moved = req.list.len(), "Chapters reordered");
    let reordered = state.repos.chapters.list_by_course(course.id).await?;
    Ok(Json(reordered))
}

/// Move one chapter and renumber the chapters whose position changed
pub async fn move_chapter(
    AuthUser(ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(course_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveChapterRequest>,
) -> Result<Json<MoveChapterResponse>> {
    let course = require_owned_course(&state.repos, &ctx, course_id).await?;

    let chapters = state.repos.chapters.list_by_course(course.id).await?;
    let assignments = resolve_move(&current_positions(&chapters), req.from_index, req.to_index)?;

    if !assignments.is_empty() {
        let mut tx = state.repos.begin().await.map_err(begin_failed)?;
        update_chapter_positions_tx(&mut tx, course.id, &assignments).await?;
        tx.commit().await.map_err(commit_failed)?;
    }

    let chapters = state.repos.chapters.list_by_course(course.id).await?;
    Ok(Json(MoveChapterResponse {
        assignments,
        chapters,
    }))
}
