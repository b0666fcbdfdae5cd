//! Caller identity types

use serde::Serialize;

/// Identity of the authenticated caller.
///
/// The auth provider owns user records; `id` is its subject string and is
/// what gets stored as `owner_id` on courses and attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthIdentity {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}
