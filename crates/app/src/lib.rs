//! Coursecraft application composition root
//!
//! Composes the domain routers into a single application and provides the
//! middleware shared by the local server and the Lambda handler.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use coursecraft_auth::{AuthBackend, AuthConfig};
use coursecraft_common::config::Config;
use coursecraft_courses::{CoursesRepositories, CoursesState};
use coursecraft_storage::{ObjectStorage, ObjectStorageFactory, StorageConfig};
use coursecraft_uploads::UploadsState;
use coursecraft_video::{VideoConfig, VideoService, VideoServiceFactory};
use sqlx::{migrate::Migrator, PgPool};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// JSON request body cap. Upload routes lift it and enforce their own.
pub const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

/// External providers the domains talk to
#[derive(Clone)]
pub struct Providers {
    pub video: Arc<dyn VideoService>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl Providers {
    /// Build the video and storage providers from environment variables
    pub async fn from_env() -> Result<Self, anyhow::Error> {
        let video_config = VideoConfig::from_env()?;
        let storage_config = StorageConfig::from_env()?;

        tracing::info!(
            video_provider = %video_config.provider,
            storage_provider = %storage_config.provider,
            "Configuring external providers"
        );

        Ok(Self {
            video: Arc::from(VideoServiceFactory::create(video_config)?),
            storage: Arc::from(ObjectStorageFactory::create(storage_config).await?),
        })
    }
}

/// Create the main application router from configuration and environment
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let providers = Providers::from_env().await?;
    Ok(build_router(config, pool, providers))
}

/// Compose the domain routers over explicit providers
pub fn build_router(config: &Config, pool: PgPool, providers: Providers) -> Router {
    let auth = AuthBackend::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    });

    let courses_state = CoursesState {
        repos: CoursesRepositories::new(pool),
        auth: auth.clone(),
        video: providers.video,
    };

    let uploads_state = UploadsState {
        auth,
        storage: providers.storage,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Coursecraft API v0.0.1-SNAPSHOT" }),
        )
        .merge(coursecraft_courses::routes().with_state(courses_state))
        .merge(coursecraft_uploads::routes().with_state(uploads_state))
}

/// Apply tracing, CORS and the JSON body limit
pub fn with_middleware(app: Router, cors: CorsLayer) -> Router {
    app.layer(body_limit_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_JSON_BODY_BYTES)
}

/// CORS for a comma-separated origin list.
///
/// Unparseable entries are skipped. With no origins configured, browsers
/// get no cross-origin access.
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let allowed: Vec<HeaderValue> = parse_origins(origins.unwrap_or_default());

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Apply embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
