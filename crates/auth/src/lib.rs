//! Authentication middleware for the Coursecraft API
//!
//! Validates bearer tokens issued by the external auth provider and exposes
//! the caller's identity through axum extractors that work with any domain
//! state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::ProviderClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use types::AuthIdentity;
