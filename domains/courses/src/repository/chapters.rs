//! Chapter repository

use crate::domain::entities::Chapter;
use coursecraft_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the chapters table, used for SELECT and RETURNING clauses.
pub(crate) const CHAPTER_COLUMNS: &str = "\
    id, course_id, title, description, video_url, \
    is_free, is_published, position, created_at, updated_at";

#[derive(Clone)]
pub struct ChapterRepository {
    pool: PgPool,
}

impl ChapterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a chapter scoped to its course
    pub async fn find_in_course(&self, id: Uuid, course_id: Uuid) -> Result<Option<Chapter>> {
        let query =
            format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = $1 AND course_id = $2");
        let chapter = sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(chapter)
    }

    /// Chapters of a course by position
    pub async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Chapter>> {
        let query = format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters \
             WHERE course_id = $1 ORDER BY position ASC, created_at ASC"
        );
        let chapters = sqlx::query_as::<_, Chapter>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(chapters)
    }

    pub async fn update_title(&self, id: Uuid, course_id: Uuid, title: &str) -> Result<Option<Chapter>> {
        let query = format!(
            "UPDATE chapters SET title = $3, updated_at = NOW() \
             WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(course_id)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_description(
        &self,
        id: Uuid,
        course_id: Uuid,
        description: &str,
    ) -> Result<Option<Chapter>> {
        let query = format!(
            "UPDATE chapters SET description = $3, updated_at = NOW() \
             WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(course_id)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Toggle free preview access
    pub async fn update_access(&self, id: Uuid, course_id: Uuid, is_free: bool) -> Result<Option<Chapter>> {
        let query = format!(
            "UPDATE chapters SET is_free = $3, updated_at = NOW() \
             WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(course_id)
            .bind(is_free)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
