//! Ownership guard
//!
//! Every handler touching a course, or anything under it, resolves the
//! course through here before validating or writing anything.

use coursecraft_auth::AuthContext;
use coursecraft_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::{Chapter, Course};
use crate::repository::CoursesRepositories;

const NOT_OWNED: &str = "Course not found or not owned by caller";

/// Load a course the caller owns, or fail with `Unauthorized`
pub async fn require_owned_course(
    repos: &CoursesRepositories,
    ctx: &AuthContext,
    course_id: Uuid,
) -> Result<Course> {
    let Some(course) = repos.courses.find(course_id).await? else {
        tracing::debug!(course_id = %course_id, "Course lookup missed");
        return Err(Error::Unauthorized(NOT_OWNED.to_string()));
    };

    if !ctx.owns(&course.owner_id) {
        tracing::warn!(
            course_id = %course_id,
            user_id = %ctx.user_id(),
            "Rejected access to course owned by another user"
        );
        return Err(Error::Unauthorized(NOT_OWNED.to_string()));
    }

    Ok(course)
}

/// Load an owned course and one of its chapters (`NotFound` if the chapter
/// is not part of the course)
pub async fn require_owned_chapter(
    repos: &CoursesRepositories,
    ctx: &AuthContext,
    course_id: Uuid,
    chapter_id: Uuid,
) -> Result<(Course, Chapter)> {
    let course = require_owned_course(repos, ctx, course_id).await?;
    let chapter = repos
        .chapters
        .find_in_course(chapter_id, course.id)
        .await?
        .ok_or_else(|| Error::NotFound("Chapter not found".to_string()))?;

    Ok((course, chapter))
}
