//! AWS S3 Object Storage Implementation
//!
//! Writes uploads to an S3 bucket, with support for LocalStack through a
//! custom endpoint URL.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::SharedCredentialsProvider;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client as S3Client;

use crate::{ObjectStorage, ObjectUpload, PutObject, StorageConfig, StorageError, StoredObject};

/// AWS S3 object storage implementation
pub struct S3ObjectStorage {
    client: S3Client,
    config: StorageConfig,
}

impl S3ObjectStorage {
    pub async fn new(config: StorageConfig) -> Result<Self, StorageError> {
        if config.bucket.is_empty() {
            return Err(StorageError::Configuration(
                "S3_BUCKET_UPLOADS must not be empty".to_string(),
            ));
        }

        let region = Region::new(config.region().to_string());

        let client = match config.aws_endpoint_url.as_ref() {
            Some(endpoint_url) => {
                tracing::info!("Using custom AWS endpoint: {}", endpoint_url);

                // For LocalStack, use dummy credentials
                let credentials = Credentials::new(
                    "test-access-key",
                    "test-secret-key",
                    None,
                    None,
                    "localstack-storage-provider",
                );

                let base_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .endpoint_url(endpoint_url)
                    .credentials_provider(SharedCredentialsProvider::new(credentials))
                    .load()
                    .await;

                // LocalStack serves buckets path-style
                let s3_config = aws_sdk_s3::config::Builder::from(&base_config)
                    .force_path_style(true)
                    .build();
                S3Client::from_conf(s3_config)
            }
            None => {
                let base_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                S3Client::new(&base_config)
            }
        };

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        let size = object.body.len();

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .content_type(&object.content_type)
            .send()
            .await
            .map_err(|e| StorageError::AwsS3(format!("Failed to put object: {}", e)))?;

        tracing::info!(
            bucket = %self.config.bucket,
            key = %object.key,
            size_bytes = size,
            "Object stored in S3"
        );

        Ok(StoredObject {
            url: self.config.object_url(&object.key),
            key: object.key,
        })
    }

    async fn begin_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<Box<dyn ObjectUpload>, StorageError> {
        let output = self
            .client
            .create_multipart_upload()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::AwsS3(format!("Failed to start multipart upload: {}", e)))?;

        let upload_id = output
            .upload_id()
            .map(str::to_string)
            .ok_or_else(|| StorageError::AwsS3("Multipart upload has no upload id".to_string()))?;

        tracing::debug!(bucket = %self.config.bucket, key = %key, "Multipart upload started");

        Ok(Box::new(S3ObjectUpload {
            client: self.client.clone(),
            bucket: self.config.bucket.clone(),
            key: key.to_string(),
            url: self.config.object_url(key),
            upload_id,
            parts: Vec::new(),
            size_bytes: 0,
        }))
    }
}

/// S3 multipart upload in progress
pub struct S3ObjectUpload {
    client: S3Client,
    bucket: String,
    key: String,
    url: String,
    upload_id: String,
    parts: Vec<CompletedPart>,
    size_bytes: u64,
}

#[async_trait::async_trait]
impl ObjectUpload for S3ObjectUpload {
    async fn write_part(&mut self, part: Vec<u8>) -> Result<(), StorageError> {
        let part_number = i32::try_from(self.parts.len() + 1)
            .map_err(|_| StorageError::AwsS3("Too many parts in multipart upload".to_string()))?;
        let size = part.len() as u64;

        let output = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(&self.key)
            .upload_id(&self.upload_id)
            .part_number(part_number)
            .body(ByteStream::from(part))
            .send()
            .await
            .map_err(|e| {
                StorageError::AwsS3(format!("Failed to upload part {}: {}", part_number, e))
            })?;

        self.parts.push(
            CompletedPart::builder()
                .set_e_tag(output.e_tag().map(str::to_string))
                .part_number(part_number)
                .build(),
        );
        self.size_bytes += size;
        Ok(())
    }

    async fn complete(self: Box<Self>) -> Result<StoredObject, StorageError> {
        let this = *self;
        let parts = this.parts.len();

        this.client
            .complete_multipart_upload()
            .bucket(&this.bucket)
            .key(&this.key)
            .upload_id(&this.upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(this.parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                StorageError::AwsS3(format!("Failed to complete multipart upload: {}", e))
            })?;

        tracing::info!(
            bucket = %this.bucket,
            key = %this.key,
            size_bytes = this.size_bytes,
            parts,
            "Object stored in S3 by multipart upload"
        );

        Ok(StoredObject {
            key: this.key,
            url: this.url,
        })
    }

    async fn abort(self: Box<Self>) -> Result<(), StorageError> {
        self.client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(&self.key)
            .upload_id(&self.upload_id)
            .send()
            .await
            .map_err(|e| StorageError::AwsS3(format!("Failed to abort multipart upload: {}", e)))?;

        tracing::info!(bucket = %self.bucket, key = %self.key, "Multipart upload aborted");
        Ok(())
    }
}
