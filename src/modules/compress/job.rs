use std::fmt;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use super::model::CompressionRequest;
use super::workspace::JobFiles;

const OUTPUT_SUFFIX: &str = "_compressed";
const OUTPUT_EXTENSION: &str = "mp4";

/// `video.mov` -> `video_compressed.mp4`, `clip` -> `clip_compressed.mp4`.
///
/// Only a final extension with no `/` in it is stripped, so dots in
/// directory names are kept. Existing objects under the derived key are
/// overwritten.
pub fn derive_output_object_name(object_name: &str) -> String {
    let stem = match object_name.rfind('.') {
        Some(dot) if dot + 1 < object_name.len() && !object_name[dot + 1..].contains('/') => {
            &object_name[..dot]
        }
        _ => object_name,
    };

    format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Downloading,
    Transcoding,
    Uploading,
    CleaningUp,
    Succeeded,
    Failed,
}

impl JobPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPhase::Idle => "idle",
            JobPhase::Downloading => "downloading",
            JobPhase::Transcoding => "transcoding",
            JobPhase::Uploading => "uploading",
            JobPhase::CleaningUp => "cleaning_up",
            JobPhase::Succeeded => "succeeded",
            JobPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Succeeded | JobPhase::Failed)
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one in-flight job owns. Never shared between requests.
#[derive(Debug)]
pub struct JobContext {
    pub job_id: u64,
    pub bucket_name: String,
    pub object_name: String,
    pub output_object_name: String,
    pub files: JobFiles,
    pub started_at: Instant,
    phase: JobPhase,
}

impl JobContext {
    pub fn new(job_id: u64, tmp_dir: &Path, request: CompressionRequest, started_at: Instant) -> Self {
        let files = JobFiles::allocate(tmp_dir, job_id, &request.object_name);
        let output_object_name = derive_output_object_name(&request.object_name);

        Self {
            job_id,
            bucket_name: request.bucket_name,
            object_name: request.object_name,
            output_object_name,
            files,
            started_at,
            phase: JobPhase::Idle,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn enter(&mut self, next: JobPhase) {
        if next.is_terminal() {
            info!(
                "Job {}: {} -> {} after {}ms",
                self.job_id,
                self.phase,
                next,
                self.started_at.elapsed().as_millis()
            );
        } else {
            info!("Job {}: {} -> {}", self.job_id, self.phase, next);
        }
        self.phase = next;
    }
}
