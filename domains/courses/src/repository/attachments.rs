//! Attachment repository

use crate::domain::entities::Attachment;
use coursecraft_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

const ATTACHMENT_COLUMNS: &str = "id, course_id, name, url, type, owner_id, created_at";

#[derive(Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attachments of a course, newest first
    pub async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Attachment>> {
        let query = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments \
             WHERE course_id = $1 ORDER BY created_at DESC"
        );
        let attachments = sqlx::query_as::<_, Attachment>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(attachments)
    }

    pub async fn create(&self, attachment: &Attachment) -> Result<Attachment> {
        let query = format!(
            "INSERT INTO attachments ({ATTACHMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Attachment>(&query)
            .bind(attachment.id)
            .bind(attachment.course_id)
            .bind(&attachment.name)
            .bind(&attachment.url)
            .bind(&attachment.attachment_type)
            .bind(&attachment.owner_id)
            .bind(attachment.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Delete one attachment scoped to its course and owner
    pub async fn delete(&self, id: Uuid, course_id: Uuid, owner_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM attachments WHERE id = $1 AND course_id = $2 AND owner_id = $3",
        )
        .bind(id)
        .bind(course_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every attachment of a course owned by `owner_id`
    pub async fn delete_all_for_course(&self, course_id: Uuid, owner_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM attachments WHERE course_id = $1 AND owner_id = $2")
            .bind(course_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
