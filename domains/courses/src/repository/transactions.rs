//! Transaction helpers for multi-row chapter operations
//!
//! Each function runs inside a caller-owned transaction so a chapter write
//! and the course re-evaluation it triggers commit together.

use crate::domain::entities::Chapter;
use crate::domain::reorder::PositionAssignment;
use crate::repository::chapters::CHAPTER_COLUMNS;
use coursecraft_common::{Error, Result};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Insert a chapter at the end of its course.
///
/// The course row is locked first so concurrent creates do not compute
/// the same position.
pub async fn create_chapter_tx(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
    title: &str,
) -> Result<Chapter> {
    sqlx::query("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
        .bind(course_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;

    let next_position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM chapters WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_one(&mut **tx)
    .await?;

    let chapter = Chapter::new(course_id, title, next_position)?;

    let query = format!(
        "INSERT INTO chapters ({CHAPTER_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {CHAPTER_COLUMNS}"
    );
    let created = sqlx::query_as::<_, Chapter>(&query)
        .bind(chapter.id)
        .bind(chapter.course_id)
        .bind(&chapter.title)
        .bind(&chapter.description)
        .bind(&chapter.video_url)
        .bind(chapter.is_free)
        .bind(chapter.is_published)
        .bind(chapter.position)
        .bind(chapter.created_at)
        .bind(chapter.updated_at)
        .fetch_one(&mut **tx)
        .await?;

    Ok(created)
}

pub async fn set_chapter_published_tx(
    tx: &mut Transaction<'_, Postgres>,
    chapter_id: Uuid,
    course_id: Uuid,
    is_published: bool,
) -> Result<Option<Chapter>> {
    let query = format!(
        "UPDATE chapters SET is_published = $3, updated_at = NOW() \
         WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Chapter>(&query)
        .bind(chapter_id)
        .bind(course_id)
        .bind(is_published)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(updated)
}

/// Delete a chapter and close the gap it leaves in the course's positions.
///
/// Its mux_data row cascades.
pub async fn delete_chapter_tx(
    tx: &mut Transaction<'_, Postgres>,
    chapter_id: Uuid,
    course_id: Uuid,
) -> Result<bool> {
    let deleted: Option<i32> = sqlx::query_scalar(
        "DELETE FROM chapters WHERE id = $1 AND course_id = $2 RETURNING position",
    )
    .bind(chapter_id)
    .bind(course_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(position) = deleted else {
        return Ok(false);
    };

    sqlx::query(
        "UPDATE chapters SET position = position - 1, updated_at = NOW() \
         WHERE course_id = $1 AND position > $2",
    )
    .bind(course_id)
    .bind(position)
    .execute(&mut **tx)
    .await?;

    Ok(true)
}

pub async fn count_published_chapters_tx(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM chapters WHERE course_id = $1 AND is_published = TRUE",
    )
    .bind(course_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(count)
}

/// Returns true when the course was published and is now unpublished
pub async fn unpublish_course_tx(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE courses SET is_published = FALSE, updated_at = NOW() \
         WHERE id = $1 AND is_published = TRUE",
    )
    .bind(course_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Unpublish the course when none of its chapters remain published
pub async fn unpublish_course_if_no_published_chapters_tx(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> Result<bool> {
    if count_published_chapters_tx(tx, course_id).await? > 0 {
        return Ok(false);
    }
    unpublish_course_tx(tx, course_id).await
}

/// Write every position; fails with `NotFound` if any chapter left the course
pub async fn update_chapter_positions_tx(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
    assignments: &[PositionAssignment],
) -> Result<()> {
    for assignment in assignments {
        let result = sqlx::query(
            "UPDATE chapters SET position = $3, updated_at = NOW() \
             WHERE id = $1 AND course_id = $2",
        )
        .bind(assignment.id)
        .bind(course_id)
        .bind(assignment.position)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Chapter {} not found",
                assignment.id
            )));
        }
    }

    Ok(())
}

/// Point a chapter at a new video url and drop its old mux_data row
pub async fn replace_video_url_tx(
    tx: &mut Transaction<'_, Postgres>,
    chapter_id: Uuid,
    course_id: Uuid,
    video_url: &str,
) -> Result<Option<Chapter>> {
    sqlx::query("DELETE FROM mux_data WHERE chapter_id = $1")
        .bind(chapter_id)
        .execute(&mut **tx)
        .await?;

    let query = format!(
        "UPDATE chapters SET video_url = $3, updated_at = NOW() \
         WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Chapter>(&query)
        .bind(chapter_id)
        .bind(course_id)
        .bind(video_url)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(updated)
}
