//! Mock Video Service Implementation
//!
//! Programmable mock for testing the chapter video lifecycle:
//! - `MockVideoService`: in-memory asset store with call recording
//! - `MockVideoBehavior`: toggles failures on create or delete

use crate::{CreateAssetRequest, VideoAsset, VideoError, VideoService};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Programmable behavior for the mock video service
#[derive(Debug, Clone, Default)]
pub struct MockVideoBehavior {
    pub fail_create: Arc<RwLock<bool>>,
    pub fail_delete: Arc<RwLock<bool>>,
}

impl MockVideoBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_create(&self, fail: bool) {
        *self.fail_create.write().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        *self.fail_delete.write().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.set_fail_create(false);
        self.set_fail_delete(false);
    }

    fn create_fails(&self) -> bool {
        *self.fail_create.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn delete_fails(&self) -> bool {
        *self.fail_delete.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A recorded call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedVideoCall {
    Create { input_url: String },
    Delete { asset_id: String },
}

/// Mock video service with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockVideoService {
    behavior: Arc<MockVideoBehavior>,
    history: Arc<Mutex<Vec<RecordedVideoCall>>>,
    live_assets: Arc<Mutex<BTreeSet<String>>>,
}

impl MockVideoService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockVideoBehavior>) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn behavior(&self) -> &Arc<MockVideoBehavior> {
        &self.behavior
    }

    /// Recorded calls in order
    pub fn recorded_calls(&self) -> Vec<RecordedVideoCall> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Asset ids created and not yet deleted
    pub fn live_assets(&self) -> Vec<String> {
        self.live_assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Clear history and live assets
    pub fn reset_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.live_assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: RecordedVideoCall) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait::async_trait]
impl VideoService for MockVideoService {
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<VideoAsset, VideoError> {
        self.record(RecordedVideoCall::Create {
            input_url: request.input_url.clone(),
        });

        if self.behavior.create_fails() {
            tracing::info!("Mock video: simulating create failure");
            return Err(VideoError::Response(
                "Mock video host rejected the asset".to_string(),
            ));
        }

        let asset_id = format!("mock-asset-{}", uuid::Uuid::new_v4().simple());
        let playback_id = format!("mock-playback-{}", uuid::Uuid::new_v4().simple());
        self.live_assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(asset_id.clone());

        tracing::info!(asset_id = %asset_id, "Mock video: asset created");
        Ok(VideoAsset {
            asset_id,
            playback_id: Some(playback_id),
            status: "preparing".to_string(),
        })
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), VideoError> {
        self.record(RecordedVideoCall::Delete {
            asset_id: asset_id.to_string(),
        });

        if self.behavior.delete_fails() {
            tracing::info!(asset_id = %asset_id, "Mock video: simulating delete failure");
            return Err(VideoError::Response(
                "Mock video host failed to delete the asset".to_string(),
            ));
        }

        self.live_assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(asset_id);
        Ok(())
    }
}
