//! Uploads domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use coursecraft_auth::AuthBackend;
use coursecraft_storage::ObjectStorage;

/// Application state for the Uploads domain
#[derive(Clone)]
pub struct UploadsState {
    pub auth: AuthBackend,
    pub storage: Arc<dyn ObjectStorage>,
}

impl FromRef<UploadsState> for AuthBackend {
    fn from_ref(state: &UploadsState) -> Self {
        state.auth.clone()
    }
}
