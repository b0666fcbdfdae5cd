//! Upload API handlers

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use coursecraft_auth::AuthUser;
use coursecraft_common::{Error, Result};
use coursecraft_storage::{
    part_size_for, ObjectStorage, ObjectUpload, PutObject, StorageError, StoredObject,
};
use serde::Serialize;
use uuid::Uuid;

use super::middleware::UploadsState;
use crate::domain::keys::object_key;
use crate::domain::rules::{MediaKind, UploadRoute};

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Stored upload, returned to the editor which then saves `url` on the
/// course, attachment or chapter
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
    pub name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub size_bytes: u64,
    pub uploaded_by: String,
}

fn multipart_error(err: MultipartError) -> Error {
    Error::Validation(format!("Invalid multipart body: {}", err.body_text()))
}

fn storage_error(err: StorageError) -> Error {
    Error::ExternalService(err.to_string())
}

/// File body on its way to storage.
///
/// Bytes collect in `buffer` until it grows past one part. From then on
/// full parts go to a multipart upload and only the remainder stays in
/// memory. The last part is held back until the request has been read to
/// the end, so a rejected request never leaves a finished object behind.
struct BodyWriter {
    key: String,
    content_type: String,
    part_size: usize,
    size_bytes: u64,
    buffer: Vec<u8>,
    upload: Option<Box<dyn ObjectUpload>>,
}

impl BodyWriter {
    fn new(key: String, content_type: String, part_size: usize) -> Self {
        Self {
            key,
            content_type,
            part_size,
            size_bytes: 0,
            buffer: Vec::new(),
            upload: None,
        }
    }

    async fn push(&mut self, storage: &dyn ObjectStorage, chunk: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(chunk);
        self.size_bytes += chunk.len() as u64;

        while self.buffer.len() > self.part_size {
            let rest = self.buffer.split_off(self.part_size);
            let part = std::mem::replace(&mut self.buffer, rest);

            if self.upload.is_none() {
                let upload = storage
                    .begin_upload(&self.key, &self.content_type)
                    .await
                    .map_err(storage_error)?;
                self.upload = Some(upload);
            }
            if let Some(upload) = self.upload.as_mut() {
                upload.write_part(part).await.map_err(storage_error)?;
            }
        }
        Ok(())
    }

    async fn finish(self, storage: &dyn ObjectStorage) -> Result<StoredObject> {
        let Some(mut upload) = self.upload else {
            return storage
                .put_object(PutObject {
                    key: self.key,
                    content_type: self.content_type,
                    body: self.buffer,
                })
                .await
                .map_err(storage_error);
        };

        if let Err(e) = upload.write_part(self.buffer).await {
            abort_upload(&self.key, upload).await;
            return Err(storage_error(e));
        }
        upload.complete().await.map_err(storage_error)
    }

    async fn abort(self) {
        if let Some(upload) = self.upload {
            abort_upload(&self.key, upload).await;
        }
    }
}

async fn abort_upload(key: &str, upload: Box<dyn ObjectUpload>) {
    if let Err(e) = upload.abort().await {
        tracing::warn!(key = %key, error = %e, "Failed to abort multipart upload");
    }
}

struct ReceivedFile {
    name: String,
    kind: MediaKind,
    body: BodyWriter,
}

/// Read one file field, enforcing the route's rules as chunks arrive
async fn read_file(
    route: UploadRoute,
    storage: &dyn ObjectStorage,
    user_id: &str,
    mut field: Field<'_>,
) -> Result<ReceivedFile> {
    let name = field
        .file_name()
        .map(str::to_string)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| Error::Validation("File name is required".to_string()))?;
    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| Error::Validation("File content type is required".to_string()))?;
    let (kind, cap) = route.accept(&content_type)?;

    let key = object_key(route, user_id, Uuid::new_v4(), &name);
    let mut body = BodyWriter::new(key, content_type, part_size_for(cap));

    if let Err(e) = receive(route, kind, cap, storage, &mut field, &mut body).await {
        body.abort().await;
        return Err(e);
    }

    Ok(ReceivedFile { name, kind, body })
}

async fn receive(
    route: UploadRoute,
    kind: MediaKind,
    cap: u64,
    storage: &dyn ObjectStorage,
    field: &mut Field<'_>,
    body: &mut BodyWriter,
) -> Result<()> {
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        route.check_size(kind, cap, body.size_bytes + chunk.len() as u64)?;
        body.push(storage, &chunk).await?;
    }
    if body.size_bytes == 0 {
        return Err(Error::Validation("Uploaded file is empty".to_string()));
    }
    Ok(())
}

/// Walk the multipart fields, reading the single `file` field into `received`
async fn scan_fields(
    route: UploadRoute,
    storage: &dyn ObjectStorage,
    user_id: &str,
    multipart: &mut Multipart,
    received: &mut Option<ReceivedFile>,
) -> Result<()> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if received.is_some() {
            return Err(Error::Validation(format!(
                "{} accepts a single file per request",
                route
            )));
        }
        *received = Some(read_file(route, storage, user_id, field).await?);
    }
    Ok(())
}

/// Accept a single-file multipart upload for one of the upload routes
pub async fn upload_file(
    AuthUser(ctx): AuthUser,
    State(state): State<UploadsState>,
    Path(slug): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let route = UploadRoute::from_slug(&slug)
        .ok_or_else(|| Error::NotFound(format!("Unknown upload route '{}'", slug)))?;
    let mut multipart =
        multipart.map_err(|e| Error::Validation(format!("Invalid multipart body: {}", e.body_text())))?;
    let storage = state.storage.as_ref();

    let mut received: Option<ReceivedFile> = None;
    if let Err(e) = scan_fields(route, storage, ctx.user_id(), &mut multipart, &mut received).await
    {
        if let Some(file) = received {
            file.body.abort().await;
        }
        return Err(e);
    }
    let file = received.ok_or_else(|| {
        Error::Validation(format!("Multipart field '{}' is required", FILE_FIELD))
    })?;

    let size_bytes = file.body.size_bytes;
    let content_type = file.body.content_type.clone();
    let streamed = file.body.upload.is_some();
    let stored = file.body.finish(storage).await?;

    tracing::info!(
        route = %route,
        user_id = %ctx.user_id(),
        key = %stored.key,
        size_bytes,
        streamed,
        "Upload stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: stored.url,
            key: stored.key,
            name: file.name,
            content_type,
            kind: file.kind,
            size_bytes,
            uploaded_by: ctx.user_id().to_string(),
        }),
    ))
}
