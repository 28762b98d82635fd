use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::settings::AppConfig;
use crate::infrastructure::storage::ObjectStore;
use crate::workers::transcoder::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn ObjectStore>,
    pub transcoder: Arc<dyn Transcoder>,
    /// One permit per job allowed to run at the same time.
    pub job_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        let permits = job_permits(config.max_concurrent_jobs);

        Self {
            config,
            storage,
            transcoder,
            job_slots: Arc::new(Semaphore::new(permits)),
        }
    }
}

/// `0` means unbounded; anything above the semaphore's ceiling is clamped.
pub fn job_permits(max_concurrent_jobs: usize) -> usize {
    match max_concurrent_jobs {
        0 => Semaphore::MAX_PERMITS,
        n => n.min(Semaphore::MAX_PERMITS),
    }
}
