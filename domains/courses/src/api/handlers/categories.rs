//! Category API handlers (read-only)

use axum::{
    extract::{Path, State},
    Json,
};
use coursecraft_auth::AuthUser;
use coursecraft_common::{Error, Result};
use uuid::Uuid;

use crate::api::middleware::CoursesState;
use crate::domain::entities::Category;

pub async fn list_categories(
    AuthUser(_ctx): AuthUser,
    State(state): State<CoursesState>,
) -> Result<Json<Vec<Category>>> {
    let categories = state.repos.categories.list().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    AuthUser(_ctx): AuthUser,
    State(state): State<CoursesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>> {
    let category = state
        .repos
        .categories
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}
