use crate::infrastructure::storage::StorageError;
use async_trait::async_trait;
use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

// Minimum part size for S3 is 5MB. We use 6MB to be safe.
pub const MIN_PART_SIZE: usize = 6 * 1024 * 1024;

/// Uploads larger than this go through multipart instead of a single PutObject.
pub const MULTIPART_THRESHOLD: u64 = 16 * 1024 * 1024;

const READ_CHUNK_SIZE: usize = 1024 * 1024;

/// The multipart calls of the store, one method per S3 request.
#[async_trait]
pub trait PartSink: Send + Sync {
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, StorageError>;

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), StorageError>;

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), StorageError>;
}

pub struct MultipartUploader<'a, S: PartSink + ?Sized> {
    storage: &'a S,
    bucket: String,
    key: String,
    upload_id: String,
    parts: Vec<CompletedPart>,
    part_number: i32,
    buffer: Vec<u8>,
}

impl<'a, S: PartSink + ?Sized> MultipartUploader<'a, S> {
    pub async fn new(
        storage: &'a S,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<Self, StorageError> {
        let upload_id = storage
            .create_multipart_upload(bucket, key, content_type)
            .await
            .map_err(|e| StorageError::Request(format!("Failed to initiate upload: {}", e)))?;

        Ok(Self {
            storage,
            bucket: bucket.to_string(),
            key: key.to_string(),
            upload_id,
            parts: Vec::new(),
            part_number: 1,
            buffer: Vec::with_capacity(MIN_PART_SIZE),
        })
    }

    pub async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), StorageError> {
        self.buffer.extend_from_slice(&chunk);

        if self.buffer.len() >= MIN_PART_SIZE {
            self.flush_part().await?;
        }

        Ok(())
    }

    async fn flush_part(&mut self) -> Result<(), StorageError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let body = Bytes::from(std::mem::replace(
            &mut self.buffer,
            Vec::with_capacity(MIN_PART_SIZE),
        ));

        let part = self
            .storage
            .upload_part(&self.bucket, &self.key, &self.upload_id, self.part_number, body)
            .await
            .map_err(|e| {
                StorageError::Request(format!("Failed to upload part {}: {}", self.part_number, e))
            })?;

        self.parts.push(part);
        self.part_number += 1;

        Ok(())
    }

    pub async fn finish(mut self) -> Result<(), StorageError> {
        // Upload remaining buffer as last part
        if !self.buffer.is_empty() {
            self.flush_part().await?;
        }

        let parts = std::mem::take(&mut self.parts);
        let part_count = parts.len();
        if let Err(e) = self
            .storage
            .complete_multipart_upload(&self.bucket, &self.key, &self.upload_id, parts)
            .await
        {
            self.abort().await;
            return Err(StorageError::Request(format!("Failed to complete upload: {}", e)));
        }

        info!("📤 Multipart upload of {} finished in {} parts", self.key, part_count);
        Ok(())
    }

    pub async fn abort(&self) {
        if let Err(e) = self
            .storage
            .abort_multipart_upload(&self.bucket, &self.key, &self.upload_id)
            .await
        {
            error!("Failed to abort upload {}: {}", self.upload_id, e);
        }
    }
}

/// Streams `source` to `bucket/key` in parts of at least `MIN_PART_SIZE`
/// (the last one may be shorter). Any failure aborts the upload.
pub async fn stream_in_parts<S, R>(
    storage: &S,
    bucket: &str,
    key: &str,
    source: R,
    content_type: &str,
) -> Result<(), StorageError>
where
    S: PartSink + ?Sized,
    R: AsyncRead + Send + Unpin,
{
    let mut uploader = MultipartUploader::new(storage, bucket, key, content_type).await?;
    let mut chunks = ReaderStream::with_capacity(source, READ_CHUNK_SIZE);

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                error!("File read error during upload: {}", e);
                uploader.abort().await;
                return Err(StorageError::Io(e));
            }
        };

        if let Err(e) = uploader.write_chunk(chunk).await {
            error!("Upload error: {}", e);
            uploader.abort().await;
            return Err(e);
        }
    }

    if let Err(e) = uploader.flush_part().await {
        error!("Upload error: {}", e);
        uploader.abort().await;
        return Err(e);
    }

    uploader.finish().await
}
