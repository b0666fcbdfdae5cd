//! Authorization context for authenticated users

use crate::types::AuthIdentity;

/// Represents an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    /// Provider subject of the caller
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Check whether the caller is the stored owner of a resource
    pub fn owns(&self, owner_id: &str) -> bool {
        self.user.id == owner_id
    }
}
