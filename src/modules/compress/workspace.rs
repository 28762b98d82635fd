use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

static LAST_JOB_ID: AtomicU64 = AtomicU64::new(0);

/// Nanosecond UNIX timestamp, strictly increasing within this process.
pub fn next_job_id() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut last = LAST_JOB_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_JOB_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// The two local files owned by one job.
///
/// `cleanup` is the normal release path. If the value is dropped before
/// that ran (task cancelled or panicked), `Drop` removes the files instead.
#[derive(Debug)]
pub struct JobFiles {
    input_path: PathBuf,
    output_path: PathBuf,
    released: bool,
}

impl JobFiles {
    pub fn allocate(dir: &Path, job_id: u64, object_name: &str) -> Self {
        let basename = Path::new(object_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("object");

        Self {
            input_path: dir.join(format!("input-{}-{}", job_id, basename)),
            output_path: dir.join(format!("output-{}-compressed.mp4", job_id)),
            released: false,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Removes both files if present. Never fails; safe to call repeatedly.
    pub async fn cleanup(&mut self) {
        for path in [&self.input_path, &self.output_path] {
            log_removal(path, tokio::fs::remove_file(path).await);
        }
        self.released = true;
    }
}

impl Drop for JobFiles {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        for path in [&self.input_path, &self.output_path] {
            log_removal(path, std::fs::remove_file(path));
        }
    }
}

fn log_removal(path: &Path, result: io::Result<()>) {
    match result {
        Ok(()) => debug!("🧹 Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("⚠️ Failed to remove transient file {}: {}", path.display(), e),
    }
}
