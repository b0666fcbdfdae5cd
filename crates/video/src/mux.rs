//! Mux Video API Implementation
//!
//! Calls the Mux asset endpoints (https://api.mux.com/video/v1/assets)
//! using reqwest with HTTP basic auth (token id / token secret).

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{CreateAssetRequest, PlaybackPolicy, VideoAsset, VideoConfig, VideoError, VideoService};

const DEFAULT_BASE_URL: &str = "https://api.mux.com";

#[derive(Debug, Serialize)]
struct CreateAssetBody {
    input: Vec<AssetInput>,
    playback_policy: Vec<PlaybackPolicy>,
    test: bool,
}

#[derive(Debug, Serialize)]
struct AssetInput {
    url: String,
}

/// Mux wraps every payload in `data`
#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    data: AssetData,
}

#[derive(Debug, Deserialize)]
struct AssetData {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    playback_ids: Vec<PlaybackIdData>,
}

#[derive(Debug, Deserialize)]
struct PlaybackIdData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    messages: Vec<String>,
}

/// Mux video service implementation
pub struct MuxVideoService {
    client: Client,
    token_id: String,
    token_secret: String,
    base_url: String,
    test_mode: bool,
}

impl MuxVideoService {
    pub fn new(config: VideoConfig) -> Result<Self, VideoError> {
        let token_id = config.token_id.ok_or_else(|| {
            VideoError::Configuration("MUX_TOKEN_ID is required for the mux provider".to_string())
        })?;
        let token_secret = config.token_secret.ok_or_else(|| {
            VideoError::Configuration(
                "MUX_TOKEN_SECRET is required for the mux provider".to_string(),
            )
        })?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: Client::new(),
            token_id,
            token_secret,
            base_url,
            test_mode: config.test_mode,
        })
    }

    fn assets_url(&self) -> String {
        format!("{}/video/v1/assets", self.base_url)
    }

    async fn error_from_response(response: reqwest::Response) -> VideoError {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
            return VideoError::Response(format!(
                "Mux API error ({}): {}",
                error_response.error.error_type,
                error_response.error.messages.join("; ")
            ));
        }

        VideoError::Response(format!("Mux API returned {}: {}", status, error_body))
    }
}

impl From<AssetData> for VideoAsset {
    fn from(data: AssetData) -> Self {
        Self {
            playback_id: data.playback_ids.into_iter().next().map(|p| p.id),
            status: data.status.unwrap_or_else(|| "preparing".to_string()),
            asset_id: data.id,
        }
    }
}

#[async_trait::async_trait]
impl VideoService for MuxVideoService {
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<VideoAsset, VideoError> {
        let body = CreateAssetBody {
            input: vec![AssetInput {
                url: request.input_url,
            }],
            playback_policy: vec![request.playback_policy],
            test: self.test_mode,
        };

        tracing::debug!(test = self.test_mode, "Sending Mux create asset request");

        let response = self
            .client
            .post(self.assets_url())
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| VideoError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let envelope: AssetEnvelope = response
            .json()
            .await
            .map_err(|e| VideoError::Response(format!("Failed to parse response: {}", e)))?;

        let asset = VideoAsset::from(envelope.data);
        tracing::info!(asset_id = %asset.asset_id, status = %asset.status, "Mux asset created");
        Ok(asset)
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), VideoError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.assets_url(), asset_id))
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .send()
            .await
            .map_err(|e| VideoError::Request(format!("HTTP request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(asset_id = %asset_id, "Mux asset already gone");
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::info!(asset_id = %asset_id, "Mux asset deleted");
        Ok(())
    }
}
