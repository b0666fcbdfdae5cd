//! Mock Object Storage Implementation
//!
//! Keeps objects in memory so upload flows can be tested without S3.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ObjectStorage, ObjectUpload, PutObject, StorageError, StoredObject};

const MOCK_BASE_URL: &str = "https://mock-storage.example.com/uploads";

/// Object held by the mock store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockObject {
    pub content_type: String,
    pub body: Vec<u8>,
    /// 1 for `put_object`, the part count for multipart uploads
    pub parts: usize,
}

type Objects = Arc<Mutex<HashMap<String, MockObject>>>;

/// In-memory object storage for testing
#[derive(Debug, Clone, Default)]
pub struct MockObjectStorage {
    objects: Objects,
    open_uploads: Arc<Mutex<HashSet<String>>>,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored object by key
    pub fn get(&self, key: &str) -> Option<MockObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Keys of multipart uploads neither completed nor aborted
    pub fn open_uploads(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .open_uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        tracing::info!(key = %object.key, size_bytes = object.body.len(), "Mock storage: object stored");

        let url = format!("{}/{}", MOCK_BASE_URL, object.key);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                object.key.clone(),
                MockObject {
                    content_type: object.content_type,
                    body: object.body,
                    parts: 1,
                },
            );

        Ok(StoredObject {
            key: object.key,
            url,
        })
    }

    async fn begin_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<Box<dyn ObjectUpload>, StorageError> {
        self.open_uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());

        Ok(Box::new(MockObjectUpload {
            key: key.to_string(),
            content_type: content_type.to_string(),
            parts: Vec::new(),
            objects: self.objects.clone(),
            open_uploads: self.open_uploads.clone(),
        }))
    }
}

/// Multipart upload held in memory until it completes
pub struct MockObjectUpload {
    key: String,
    content_type: String,
    parts: Vec<Vec<u8>>,
    objects: Objects,
    open_uploads: Arc<Mutex<HashSet<String>>>,
}

impl MockObjectUpload {
    fn close(&self) {
        self.open_uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[async_trait::async_trait]
impl ObjectUpload for MockObjectUpload {
    async fn write_part(&mut self, part: Vec<u8>) -> Result<(), StorageError> {
        self.parts.push(part);
        Ok(())
    }

    async fn complete(self: Box<Self>) -> Result<StoredObject, StorageError> {
        self.close();
        let body = self.parts.concat();
        tracing::info!(
            key = %self.key,
            size_bytes = body.len(),
            parts = self.parts.len(),
            "Mock storage: multipart object stored"
        );

        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                self.key.clone(),
                MockObject {
                    content_type: self.content_type.clone(),
                    body,
                    parts: self.parts.len(),
                },
            );

        Ok(StoredObject {
            url: format!("{}/{}", MOCK_BASE_URL, self.key),
            key: self.key.clone(),
        })
    }

    async fn abort(self: Box<Self>) -> Result<(), StorageError> {
        self.close();
        tracing::info!(key = %self.key, "Mock storage: multipart upload aborted");
        Ok(())
    }
}
