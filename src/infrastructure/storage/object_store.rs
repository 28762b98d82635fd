use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncRead;

/// Byte stream of a downloaded object. Transfer errors surface as `io::Error`
/// while reading.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    Request(String),
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl From<aws_sdk_s3::Error> for StorageError {
    fn from(err: aws_sdk_s3::Error) -> Self {
        StorageError::Request(DisplayErrorContext(&err).to_string())
    }
}

/// The bucket-based store the compression jobs read from and write to.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectReader, StorageError>;

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        file: File,
        content_length: u64,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Connectivity probe used by `/health`.
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;
}
