//! Concrete authentication backend
//!
//! Holds the token verification config. The auth provider owns user
//! records, so authenticating a request never touches the database.

use crate::claims::ProviderClaims;
use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::types::AuthIdentity;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a bearer token and build the caller context
    pub fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;
        let identity = identity_from_claims(claims)?;

        tracing::debug!(user_id = %identity.id, "Authenticated request");

        Ok(AuthContext::new(identity))
    }
}

fn identity_from_claims(claims: ProviderClaims) -> Result<AuthIdentity, AuthError> {
    let id = claims.sub.trim();
    if id.is_empty() {
        return Err(AuthError::InvalidUserId);
    }

    Ok(AuthIdentity {
        id: id.to_string(),
        email: claims.email,
        name: claims.name,
    })
}
