use thiserror::Error;

/// Why a compression job ended in `Failed`. Tagged where the failure happens.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("MinIO download error: {0}")]
    Download(String),
    #[error("FFmpeg launch error: {0}")]
    TranscodeLaunch(String),
    #[error("FFmpeg exited with code {exit_code}")]
    Transcode { exit_code: i32, diagnostics: String },
    #[error("MinIO upload error: {0}")]
    Upload(String),
    #[error("{0}")]
    Internal(String),
}

impl JobError {
    /// Caller-safe message; the raw `Display` text goes out as `details`.
    pub fn summary(&self) -> &'static str {
        match self {
            JobError::Download(_) => "Failed to download file from bucket",
            JobError::TranscodeLaunch(_) | JobError::Transcode { .. } => "Video compression failed",
            JobError::Upload(_) => "Failed to upload compressed file",
            JobError::Internal(_) => "File compression failed",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Download(_) => "DownloadFailed",
            JobError::TranscodeLaunch(_) => "TranscodeLaunchFailed",
            JobError::Transcode { .. } => "TranscodeFailed",
            JobError::Upload(_) => "UploadFailed",
            JobError::Internal(_) => "Internal",
        }
    }
}
