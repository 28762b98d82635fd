#![allow(dead_code)]

pub mod fakes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;
use video_compressor::app::create_app;
use video_compressor::config::settings::AppConfig;
use video_compressor::state::AppState;

use fakes::{FakeStore, FakeTranscoder};

/// Test application wired to in-memory collaborators
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<FakeStore>,
    pub transcoder: Arc<FakeTranscoder>,
    pub tmp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of every file left in the job scratch directory.
    pub fn leftover_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.tmp_dir.path())
            .expect("read tmp dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }
}

pub fn test_config(tmp_dir: &Path, max_concurrent_jobs: usize) -> AppConfig {
    AppConfig {
        server_port: 0,
        minio_endpoint: "localhost".to_string(),
        minio_port: 9000,
        minio_use_ssl: false,
        minio_access_key: "test-access".to_string(),
        minio_secret_key: "test-secret".to_string(),
        minio_region: "us-east-1".to_string(),
        max_concurrent_jobs,
        ffmpeg_path: PathBuf::from("ffmpeg"),
        tmp_dir: tmp_dir.to_path_buf(),
    }
}

pub fn setup_test_app(store: FakeStore, transcoder: FakeTranscoder) -> TestApp {
    setup_test_app_with_limit(store, transcoder, 4)
}

pub fn setup_test_app_with_limit(
    store: FakeStore,
    transcoder: FakeTranscoder,
    max_concurrent_jobs: usize,
) -> TestApp {
    let tmp_dir = TempDir::new().expect("Failed to create tmp dir");
    let store = Arc::new(store);
    let transcoder = Arc::new(transcoder);

    let state = AppState::new(
        test_config(tmp_dir.path(), max_concurrent_jobs),
        store.clone(),
        transcoder.clone(),
    );
    let server = TestServer::new(create_app(state).into_make_service())
        .expect("Failed to create test server");

    TestApp {
        server,
        store,
        transcoder,
        tmp_dir,
    }
}
