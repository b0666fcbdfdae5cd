//! Course repository

use crate::domain::entities::Course;
use coursecraft_common::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the courses table, used for SELECT and RETURNING clauses.
pub(crate) const COURSE_COLUMNS: &str = "\
    id, title, description, image_url, price, category_id, \
    is_published, owner_id, created_at, updated_at";

#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a course by ID regardless of owner
    pub async fn find(&self, id: Uuid) -> Result<Option<Course>> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(course)
    }

    /// Courses authored by `owner_id`, newest first
    pub async fn list_by_owner(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Course>> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let courses = sqlx::query_as::<_, Course>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(courses)
    }

    /// Published courses for the public catalog, newest first
    pub async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Course>> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             WHERE is_published = TRUE ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let courses = sqlx::query_as::<_, Course>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(courses)
    }

    pub async fn create(&self, course: &Course) -> Result<Course> {
        let query = format!(
            "INSERT INTO courses ({COURSE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COURSE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Course>(&query)
            .bind(course.id)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.image_url)
            .bind(course.price)
            .bind(course.category_id)
            .bind(course.is_published)
            .bind(&course.owner_id)
            .bind(course.created_at)
            .bind(course.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn update_title(&self, id: Uuid, owner_id: &str, title: &str) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET title = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_description(
        &self,
        id: Uuid,
        owner_id: &str,
        description: &str,
    ) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET description = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_image(&self, id: Uuid, owner_id: &str, image_url: &str) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET image_url = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        owner_id: &str,
        category_id: Uuid,
    ) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET category_id = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_price(&self, id: Uuid, owner_id: &str, price: Decimal) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET price = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(price)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Set the publish flag; the caller has already checked readiness
    pub async fn set_published(
        &self,
        id: Uuid,
        owner_id: &str,
        is_published: bool,
    ) -> Result<Option<Course>> {
        let query = format!(
            "UPDATE courses SET is_published = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING {COURSE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(is_published)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Delete a course; chapters, attachments and mux rows cascade
    pub async fn delete(&self, id: Uuid, owner_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
