use std::path::Path;
use std::time::Instant;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{Instrument, error, info, info_span};

use super::error::JobError;
use super::job::{JobContext, JobPhase};
use super::model::{CompressionRequest, CompressionResult, compression_ratio_percent};
use super::workspace::next_job_id;
use crate::infrastructure::storage::ObjectStore;
use crate::state::AppState;

const MB: f64 = 1024.0 * 1024.0;

struct TransferSizes {
    original: u64,
    compressed: u64,
}

pub struct CompressService;

impl CompressService {
    /// Runs one job to completion: download, transcode, upload, cleanup.
    ///
    /// The job runs on its own task, so it finishes (and cleans up) even if
    /// the caller stops waiting for it.
    pub async fn compress(
        state: AppState,
        request: CompressionRequest,
    ) -> Result<CompressionResult, JobError> {
        let started_at = Instant::now();

        let permit = state
            .job_slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| JobError::Internal(format!("job limiter closed: {}", e)))?;

        let job_id = next_job_id();
        let span = info_span!(
            "job",
            id = job_id,
            bucket = %request.bucket_name,
            object = %request.object_name
        );

        let handle = tokio::spawn(
            async move {
                let _permit = permit;
                let ctx = JobContext::new(job_id, &state.config.tmp_dir, request, started_at);
                run_job(&state, ctx).await
            }
            .instrument(span),
        );

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Compression task {} aborted: {}", job_id, e);
                Err(JobError::Internal(format!("compression task failed: {}", e)))
            }
        }
    }
}

async fn run_job(state: &AppState, mut ctx: JobContext) -> Result<CompressionResult, JobError> {
    info!(
        "🎬 Starting compression job: bucket={} source={} target={}",
        ctx.bucket_name, ctx.object_name, ctx.output_object_name
    );

    let outcome = execute(state, &mut ctx).await;
    let last_stage = ctx.phase();

    ctx.enter(JobPhase::CleaningUp);
    ctx.files.cleanup().await;

    match outcome {
        Ok(sizes) => {
            ctx.enter(JobPhase::Succeeded);
            let result = CompressionResult {
                original_file: ctx.object_name.clone(),
                compressed_file: ctx.output_object_name.clone(),
                bucket_name: ctx.bucket_name.clone(),
                processing_time_ms: ctx.started_at.elapsed().as_millis() as u64,
                original_size_bytes: sizes.original,
                compressed_size_bytes: sizes.compressed,
                compression_ratio_percent: compression_ratio_percent(sizes.original, sizes.compressed),
            };

            info!(
                "🎉 Compression finished in {}ms, {:.2} MB -> {:.2} MB ({}%)",
                result.processing_time_ms,
                sizes.original as f64 / MB,
                sizes.compressed as f64 / MB,
                result.compression_ratio_percent
            );
            Ok(result)
        }
        Err(e) => {
            ctx.enter(JobPhase::Failed);
            error!("❌ Compression failed while {} ({}): {}", last_stage, e.kind(), e);
            Err(e)
        }
    }
}

async fn execute(state: &AppState, ctx: &mut JobContext) -> Result<TransferSizes, JobError> {
    ctx.enter(JobPhase::Downloading);
    let downloaded = download(
        state.storage.as_ref(),
        &ctx.bucket_name,
        &ctx.object_name,
        ctx.files.input_path(),
    )
    .await?;
    info!(
        "📥 Downloaded {} ({:.2} MB)",
        ctx.files.input_path().display(),
        downloaded as f64 / MB
    );

    ctx.enter(JobPhase::Transcoding);
    state
        .transcoder
        .run(ctx.files.input_path(), ctx.files.output_path())
        .await?
        .into_result()?;

    ctx.enter(JobPhase::Uploading);
    let sizes = upload(state.storage.as_ref(), ctx).await?;
    info!("📤 Uploaded {}/{}", ctx.bucket_name, ctx.output_object_name);

    Ok(sizes)
}

async fn download(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    dest: &Path,
) -> Result<u64, JobError> {
    let mut reader = store
        .get(bucket, key)
        .await
        .map_err(|e| JobError::Download(e.to_string()))?;

    let mut file = File::create(dest)
        .await
        .map_err(|e| JobError::Download(format!("file write error: {}", e)))?;

    let written = tokio::io::copy(&mut reader, &mut file)
        .await
        .map_err(|e| JobError::Download(e.to_string()))?;

    file.flush()
        .await
        .map_err(|e| JobError::Download(format!("file write error: {}", e)))?;

    Ok(written)
}

async fn upload(store: &dyn ObjectStore, ctx: &JobContext) -> Result<TransferSizes, JobError> {
    let original = file_size(ctx.files.input_path()).await?;
    let compressed = file_size(ctx.files.output_path()).await?;

    let file = File::open(ctx.files.output_path())
        .await
        .map_err(|e| JobError::Upload(format!("cannot open transcoded file: {}", e)))?;

    let content_type = mime_guess::from_path(&ctx.output_object_name).first_or_octet_stream();

    store
        .put(
            &ctx.bucket_name,
            &ctx.output_object_name,
            file,
            compressed,
            content_type.essence_str(),
        )
        .await
        .map_err(|e| JobError::Upload(e.to_string()))?;

    Ok(TransferSizes {
        original,
        compressed,
    })
}

async fn file_size(path: &Path) -> Result<u64, JobError> {
    fs::metadata(path)
        .await
        .map(|meta| meta.len())
        .map_err(|e| JobError::Upload(format!("cannot stat {}: {}", path.display(), e)))
}
