//! Coursecraft Video Service
//!
//! Chapter videos are transcoded and streamed by an external video host.
//! This crate owns the asset lifecycle calls against that host:
//! - Mux Video API integration for production
//! - Programmable mock service for testing and development
//! - Provider selection through `VideoServiceFactory`

pub mod mock;
pub mod mux;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Video configuration error: {0}")]
    Configuration(String),

    #[error("Video request error: {0}")]
    Request(String),

    #[error("Video response error: {0}")]
    Response(String),
}

/// Who may play back an asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPolicy {
    #[default]
    Public,
    Signed,
}

/// Request to ingest a video from a URL
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAssetRequest {
    pub input_url: String,
    pub playback_policy: PlaybackPolicy,
}

impl CreateAssetRequest {
    /// Public playback asset for an uploaded chapter video
    pub fn public(input_url: impl Into<String>) -> Self {
        Self {
            input_url: input_url.into(),
            playback_policy: PlaybackPolicy::Public,
        }
    }
}

/// Asset as reported by the video host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub asset_id: String,
    pub playback_id: Option<String>,
    pub status: String,
}

/// Video service configuration
#[derive(Clone)]
pub struct VideoConfig {
    /// Provider name (mux, mock)
    pub provider: String,
    pub token_id: Option<String>,
    pub token_secret: Option<String>,
    /// Override for the provider API base URL
    pub base_url: Option<String>,
    /// Create provider-side test assets (watermarked, auto-deleted)
    pub test_mode: bool,
}

impl std::fmt::Debug for VideoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoConfig")
            .field("provider", &self.provider)
            .field("token_id", &self.token_id)
            .field("base_url", &self.base_url)
            .field("test_mode", &self.test_mode)
            .finish_non_exhaustive()
    }
}

impl VideoConfig {
    /// Create video config from environment variables
    pub fn from_env() -> Result<Self, VideoError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("VIDEO_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let test_mode = std::env::var("MUX_TEST_MODE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            provider,
            token_id: std::env::var("MUX_TOKEN_ID").ok(),
            token_secret: std::env::var("MUX_TOKEN_SECRET").ok(),
            base_url: std::env::var("MUX_BASE_URL").ok(),
            test_mode,
        })
    }

    /// Mock provider config for tests and local development
    pub fn mock() -> Self {
        Self {
            provider: "mock".to_string(),
            token_id: None,
            token_secret: None,
            base_url: None,
            test_mode: false,
        }
    }
}

/// Video host operations used by the chapter video lifecycle
#[async_trait::async_trait]
pub trait VideoService: Send + Sync {
    /// Ask the host to ingest the video at `input_url`
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<VideoAsset, VideoError>;

    /// Delete an asset. Deleting an asset the host no longer knows is not an error.
    async fn delete_asset(&self, asset_id: &str) -> Result<(), VideoError>;
}

/// Factory for creating VideoService implementations
pub struct VideoServiceFactory;

impl VideoServiceFactory {
    pub fn create(config: VideoConfig) -> Result<Box<dyn VideoService>, VideoError> {
        match config.provider.as_str() {
            "mux" => {
                tracing::info!("Creating Mux video service");
                Ok(Box::new(mux::MuxVideoService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock video service");
                Ok(Box::new(mock::MockVideoService::new()))
            }
            provider => Err(VideoError::Configuration(format!(
                "Unknown video provider: {}. Supported providers: mux, mock",
                provider
            ))),
        }
    }
}
