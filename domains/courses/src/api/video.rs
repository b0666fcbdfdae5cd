//! Chapter video lifecycle
//!
//! Drives `VideoStateMachine` against the video host and the mux_data
//! table. An asset created at the host is either recorded or deleted again;
//! a failure releasing the previous asset aborts before anything new is
//! created. A published chapter that ends up without a video is withdrawn,
//! along with its course when no other chapter is published.

use std::future::Future;

use coursecraft_common::{Error, Result};
use coursecraft_video::{CreateAssetRequest, VideoError, VideoService};
use uuid::Uuid;

use crate::api::middleware::CoursesState;
use crate::domain::entities::{Chapter, MuxData};
use crate::domain::state::{VideoEvent, VideoState, VideoStateMachine};
use crate::repository::{
    replace_video_url_tx, set_chapter_published_tx, unpublish_course_if_no_published_chapters_tx,
};

fn external(err: VideoError) -> Error {
    Error::ExternalService(err.to_string())
}

fn advance(chapter_id: Uuid, current: VideoState, event: VideoEvent) -> Result<VideoState> {
    let next = VideoStateMachine::transition(current, event)?;
    tracing::debug!(
        chapter_id = %chapter_id,
        from = %current,
        to = %next,
        event = %event,
        "Chapter video state changed"
    );
    Ok(next)
}

/// Delete an asset at the video host
async fn release_asset(video: &dyn VideoService, mux_data: &MuxData) -> Result<()> {
    video
        .delete_asset(&mux_data.asset_id)
        .await
        .map_err(external)?;
    tracing::info!(
        chapter_id = %mux_data.chapter_id,
        asset_id = %mux_data.asset_id,
        "Released chapter video asset"
    );
    Ok(())
}

/// Release a chapter's video before the chapter (or its course) is deleted.
///
/// The mux_data row itself goes with the chapter by cascade.
pub async fn detach_chapter_video(
    video: &dyn VideoService,
    mux_data: Option<&MuxData>,
) -> Result<()> {
    let Some(mux_data) = mux_data else {
        return Ok(());
    };
    advance(mux_data.chapter_id, VideoState::Ready, VideoEvent::Detach)?;
    release_asset(video, mux_data).await
}

/// Create an asset for `video_url` and hand the record to `persist`.
///
/// If `persist` fails the new asset is deleted again; a failure of that
/// cleanup is logged and the persist error is returned.
pub async fn attach_asset<F, Fut>(
    video: &dyn VideoService,
    chapter_id: Uuid,
    video_url: &str,
    persist: F,
) -> Result<MuxData>
where
    F: FnOnce(MuxData) -> Fut,
    Fut: Future<Output = Result<MuxData>>,
{
    let processing = VideoState::Processing;

    let asset = match video
        .create_asset(CreateAssetRequest::public(video_url))
        .await
    {
        Ok(asset) => asset,
        Err(e) => {
            advance(chapter_id, processing, VideoEvent::Fail)?;
            tracing::warn!(chapter_id = %chapter_id, error = %e, "Video asset creation failed");
            return Err(external(e));
        }
    };

    let asset_id = asset.asset_id.clone();
    let record = MuxData::new(chapter_id, asset.asset_id, asset.playback_id);

    match persist(record).await {
        Ok(saved) => {
            advance(chapter_id, processing, VideoEvent::Recorded)?;
            tracing::info!(chapter_id = %chapter_id, asset_id = %saved.asset_id, "Chapter video recorded");
            Ok(saved)
        }
        Err(e) => {
            if let Err(cleanup) = video.delete_asset(&asset_id).await {
                tracing::warn!(
                    chapter_id = %chapter_id,
                    asset_id = %asset_id,
                    error = %cleanup,
                    "Failed to delete unrecorded video asset"
                );
            }
            advance(chapter_id, processing, VideoEvent::Fail)?;
            Err(e)
        }
    }
}

fn begin_failed(e: sqlx::Error) -> Error {
    Error::Internal(format!("Failed to begin transaction: {}", e))
}

fn commit_failed(e: sqlx::Error) -> Error {
    Error::Internal(format!("Failed to commit transaction: {}", e))
}

/// Unpublish a chapter that lost its video, and its course when that was
/// the last published chapter. Returns whether the course was unpublished.
async fn withdraw_chapter(state: &CoursesState, chapter: &Chapter) -> Result<bool> {
    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    set_chapter_published_tx(&mut tx, chapter.id, chapter.course_id, false).await?;
    let course_unpublished =
        unpublish_course_if_no_published_chapters_tx(&mut tx, chapter.course_id).await?;
    tx.commit().await.map_err(commit_failed)?;
    Ok(course_unpublished)
}

/// Point a chapter at a new video.
///
/// Releases the previous asset and its record first so a chapter never has
/// two live assets, then creates and records the new one. If that fails the
/// chapter is left without a video and, when it was published, unpublished.
pub async fn replace_chapter_video(
    state: &CoursesState,
    chapter: &Chapter,
    video_url: &str,
) -> Result<(Chapter, MuxData)> {
    let existing = state.repos.mux_data.find_by_chapter(chapter.id).await?;
    advance(
        chapter.id,
        VideoState::from_record(existing.as_ref()),
        VideoEvent::Attach,
    )?;

    if let Some(old) = existing.as_ref() {
        release_asset(state.video.as_ref(), old).await?;
    }

    let mut tx = state.repos.begin().await.map_err(begin_failed)?;
    let updated = replace_video_url_tx(&mut tx, chapter.id, chapter.course_id, video_url)
        .await?
        .ok_or_else(|| Error::NotFound("Chapter not found".to_string()))?;
    tx.commit().await.map_err(commit_failed)?;

    let repos = state.repos.clone();
    let attached = attach_asset(state.video.as_ref(), chapter.id, video_url, |record| async move {
        repos.mux_data.create(&record).await
    })
    .await;

    match attached {
        Ok(mux_data) => Ok((updated, mux_data)),
        Err(e) => {
            if updated.is_published {
                match withdraw_chapter(state, &updated).await {
                    Ok(course_unpublished) => tracing::warn!(
                        chapter_id = %updated.id,
                        course_unpublished,
                        "Chapter unpublished after losing its video"
                    ),
                    Err(withdraw) => tracing::error!(
                        chapter_id = %updated.id,
                        error = %withdraw,
                        "Failed to unpublish chapter without a video"
                    ),
                }
            }
            Err(e)
        }
    }
}
