//! Route definitions for Courses domain API

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{attachments, categories, chapters, courses};
use super::middleware::CoursesState;

/// Create course routes
fn course_routes() -> Router<CoursesState> {
    Router::new()
        .route(
            "/v1/courses",
            post(courses::create_course).get(courses::list_my_courses),
        )
        .route("/v1/catalog/courses", get(courses::list_catalog))
        .route(
            "/v1/courses/{course_id}",
            get(courses::get_course).delete(courses::delete_course),
        )
        .route(
            "/v1/courses/{course_id}/title",
            patch(courses::update_course_title),
        )
        .route(
            "/v1/courses/{course_id}/description",
            patch(courses::update_course_description),
        )
        .route(
            "/v1/courses/{course_id}/image",
            patch(courses::update_course_image),
        )
        .route(
            "/v1/courses/{course_id}/category",
            patch(courses::update_course_category),
        )
        .route(
            "/v1/courses/{course_id}/price",
            patch(courses::update_course_price),
        )
        .route(
            "/v1/courses/{course_id}/publish",
            post(courses::publish_course),
        )
}

/// Create chapter routes
fn chapter_routes() -> Router<CoursesState> {
    Router::new()
        .route(
            "/v1/courses/{course_id}/chapters",
            post(chapters::create_chapter),
        )
        .route(
            "/v1/courses/{course_id}/chapters/reorder",
            put(chapters::reorder_chapters),
        )
        .route(
            "/v1/courses/{course_id}/chapters/move",
            post(chapters::move_chapter),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}",
            get(chapters::get_chapter).delete(chapters::delete_chapter),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}/title",
            patch(chapters::update_chapter_title),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}/description",
            patch(chapters::update_chapter_description),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}/access",
            patch(chapters::update_chapter_access),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}/video",
            patch(chapters::update_chapter_video),
        )
        .route(
            "/v1/courses/{course_id}/chapters/{chapter_id}/publish",
            post(chapters::publish_chapter),
        )
}

/// Create attachment routes
fn attachment_routes() -> Router<CoursesState> {
    Router::new()
        .route(
            "/v1/courses/{course_id}/attachments",
            post(attachments::create_attachment),
        )
        .route(
            "/v1/courses/{course_id}/attachments/{attachment_id}",
            axum::routing::delete(attachments::delete_attachment),
        )
}

/// Create category routes
fn category_routes() -> Router<CoursesState> {
    Router::new()
        .route("/v1/categories", get(categories::list_categories))
        .route("/v1/categories/{id}", get(categories::get_category))
}

/// Create all Courses domain API routes
pub fn routes() -> Router<CoursesState> {
    Router::new()
        .merge(course_routes())
        .merge(chapter_routes())
        .merge(attachment_routes())
        .merge(category_routes())
}
