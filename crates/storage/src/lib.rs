//! Coursecraft Object Storage
//!
//! Uploaded course images, attachments and chapter videos are written to
//! an object store and served from a public URL. Small files go up in one
//! request; large ones are streamed as a multipart upload so only one part
//! is held in memory at a time.
//! - AWS S3 integration for production (LocalStack for local E2E)
//! - In-memory mock store for testing and development

pub mod aws_s3;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("AWS S3 error: {0}")]
    AwsS3(String),
}

/// Object to be written
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Smallest part size used for multipart uploads. S3 requires at least
/// 5 MiB for every part except the last.
pub const MIN_PART_BYTES: u64 = 8 * 1024 * 1024;

/// Most parts S3 accepts in one multipart upload
pub const MAX_PARTS: u64 = 10_000;

/// Part size that lets an object of up to `max_bytes` fit in `MAX_PARTS`
pub fn part_size_for(max_bytes: u64) -> usize {
    let needed = max_bytes.div_ceil(MAX_PARTS).max(MIN_PART_BYTES);
    usize::try_from(needed).unwrap_or(usize::MAX)
}

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Object storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider (s3, mock)
    pub provider: String,
    pub bucket: String,
    /// Public URL prefix objects are served from (CDN or bucket website)
    pub public_base_url: Option<String>,
    pub aws_region: Option<String>,
    /// AWS endpoint URL (for LocalStack)
    pub aws_endpoint_url: Option<String>,
}

impl StorageConfig {
    /// Create storage config from environment variables
    pub fn from_env() -> Result<Self, StorageError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let bucket = std::env::var("S3_BUCKET_UPLOADS")
            .unwrap_or_else(|_| "coursecraft-uploads".to_string());

        Ok(Self {
            provider,
            bucket,
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
            aws_region: std::env::var("AWS_REGION").ok(),
            aws_endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
        })
    }

    /// Mock provider config for tests and local development
    pub fn mock() -> Self {
        Self {
            provider: "mock".to_string(),
            bucket: "coursecraft-uploads".to_string(),
            public_base_url: None,
            aws_region: None,
            aws_endpoint_url: None,
        }
    }

    pub fn region(&self) -> &str {
        self.aws_region.as_deref().unwrap_or("us-east-1")
    }

    /// Public URL for a stored key.
    ///
    /// Preference order: explicit public base URL, custom endpoint
    /// (path-style), then the regional virtual-hosted S3 URL.
    pub fn object_url(&self, key: &str) -> String {
        if let Some(base) = &self.public_base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }
        if let Some(endpoint) = &self.aws_endpoint_url {
            return format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key);
        }
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket,
            self.region(),
            key
        )
    }
}

/// Multipart write in progress.
///
/// Parts are appended in order. Every part but the last must be at least
/// `MIN_PART_BYTES`. Nothing is visible under the key until `complete`.
#[async_trait::async_trait]
pub trait ObjectUpload: Send {
    async fn write_part(&mut self, part: Vec<u8>) -> Result<(), StorageError>;

    async fn complete(self: Box<Self>) -> Result<StoredObject, StorageError>;

    /// Discard every part written so far
    async fn abort(self: Box<Self>) -> Result<(), StorageError>;
}

/// Object storage trait for different implementations
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object and return where it can be fetched
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError>;

    /// Start a multipart upload for `key`
    async fn begin_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<Box<dyn ObjectUpload>, StorageError>;
}

/// Object storage factory
pub struct ObjectStorageFactory;

impl ObjectStorageFactory {
    /// Create object storage based on configuration
    pub async fn create(config: StorageConfig) -> Result<Box<dyn ObjectStorage>, StorageError> {
        match config.provider.as_str() {
            "s3" | "aws-s3" => {
                tracing::info!(bucket = %config.bucket, "Creating AWS S3 object storage");
                Ok(Box::new(aws_s3::S3ObjectStorage::new(config).await?))
            }
            "mock" => {
                tracing::info!("Creating mock object storage");
                Ok(Box::new(mock::MockObjectStorage::new()))
            }
            provider => Err(StorageError::Configuration(format!(
                "Unknown storage provider: {}. Supported providers: s3, mock",
                provider
            ))),
        }
    }
}
