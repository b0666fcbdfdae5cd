//! Courses domain state and auth backend integration

use std::sync::Arc;

use crate::CoursesRepositories;
use axum::extract::FromRef;
use coursecraft_auth::AuthBackend;
use coursecraft_video::VideoService;

/// Application state for the Courses domain
#[derive(Clone)]
pub struct CoursesState {
    pub repos: CoursesRepositories,
    pub auth: AuthBackend,
    pub video: Arc<dyn VideoService>,
}

impl FromRef<CoursesState> for AuthBackend {
    fn from_ref(state: &CoursesState) -> Self {
        state.auth.clone()
    }
}
