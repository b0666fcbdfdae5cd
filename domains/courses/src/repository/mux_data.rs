//! MuxData repository

use crate::domain::entities::MuxData;
use coursecraft_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const MUX_DATA_COLUMNS: &str = "id, chapter_id, asset_id, playback_id, created_at";

#[derive(Clone)]
pub struct MuxDataRepository {
    pool: PgPool,
}

impl MuxDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Option<MuxData>> {
        let query = format!("SELECT {MUX_DATA_COLUMNS} FROM mux_data WHERE chapter_id = $1");
        let mux_data = sqlx::query_as::<_, MuxData>(&query)
            .bind(chapter_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(mux_data)
    }

    /// Video records for every chapter of a course
    pub async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<MuxData>> {
        let mux_data = sqlx::query_as::<_, MuxData>(
            r#"
            SELECT m.id, m.chapter_id, m.asset_id, m.playback_id, m.created_at
            FROM mux_data m
            JOIN chapters c ON c.id = m.chapter_id
            WHERE c.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mux_data)
    }

    pub async fn create(&self, mux_data: &MuxData) -> Result<MuxData> {
        let query = format!(
            "INSERT INTO mux_data ({MUX_DATA_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MUX_DATA_COLUMNS}"
        );
        let created = sqlx::query_as::<_, MuxData>(&query)
            .bind(mux_data.id)
            .bind(mux_data.chapter_id)
            .bind(&mux_data.asset_id)
            .bind(&mux_data.playback_id)
            .bind(mux_data.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }
}
