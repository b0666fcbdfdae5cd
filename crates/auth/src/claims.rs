//! JWT claims types

use serde::{Deserialize, Serialize};

/// Session token claims issued by the auth provider
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderClaims {
    /// Subject (provider user ID)
    pub sub: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
