use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::config::env::{self, EnvKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid MinIO endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub minio_endpoint: String,
    pub minio_port: u16,
    pub minio_use_ssl: bool,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub minio_region: String,
    /// `0` disables the cap.
    pub max_concurrent_jobs: usize,
    pub ffmpeg_path: PathBuf,
    pub tmp_dir: PathBuf,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let tmp_dir = env::get(EnvKey::TmpDir)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 8080),
            minio_endpoint: env::get_or(EnvKey::MinioEndpoint, "localhost"),
            minio_port: env::get_parsed(EnvKey::MinioPort, 9000),
            minio_use_ssl: env::get_flag(EnvKey::MinioUseSsl),
            minio_access_key: required(EnvKey::MinioAccessKey)?,
            minio_secret_key: required(EnvKey::MinioSecretKey)?,
            minio_region: env::get_or(EnvKey::MinioRegion, "us-east-1"),
            max_concurrent_jobs: env::get_parsed(EnvKey::MaxConcurrentJobs, 4),
            ffmpeg_path: PathBuf::from(env::get_or(EnvKey::FfmpegPath, "ffmpeg")),
            tmp_dir,
        })
    }

    pub fn minio_endpoint_url(&self) -> Result<String, ConfigError> {
        let scheme = if self.minio_use_ssl { "https" } else { "http" };
        let endpoint = format!("{}://{}:{}", scheme, self.minio_endpoint, self.minio_port);

        let url = Url::parse(&endpoint)
            .map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })?;

        // Url keeps a trailing slash on bare hosts; the SDK wants none.
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    match env::get(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(ConfigError::Missing(name)),
    }
}
