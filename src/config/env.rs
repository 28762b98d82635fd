use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    MinioEndpoint,
    MinioPort,
    MinioUseSsl,
    MinioAccessKey,
    MinioSecretKey,
    MinioRegion,
    MaxConcurrentJobs,
    FfmpegPath,
    TmpDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::MinioEndpoint => "MINIO_ENDPOINT",
            EnvKey::MinioPort => "MINIO_PORT",
            EnvKey::MinioUseSsl => "MINIO_USE_SSL",
            EnvKey::MinioAccessKey => "MINIO_ACCESS",
            EnvKey::MinioSecretKey => "MINIO_SECRET",
            EnvKey::MinioRegion => "MINIO_REGION",
            EnvKey::MaxConcurrentJobs => "MAX_CONCURRENT_JOBS",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TmpDir => "COMPRESS_TMP_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Only the literal `true` (case-insensitive) enables a flag.
pub fn get_flag(key: EnvKey) -> bool {
    get(key)
        .map(|val| val.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
