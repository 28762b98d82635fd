use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::modules::compress::error::JobError;

const VIDEO_CODEC: &str = "libx264";
const CONSTANT_RATE_FACTOR: &str = "33";
const FRAME_RATE: &str = "30";

/// Exit code reported when the process was terminated by a signal.
const SIGNALLED_EXIT_CODE: i32 = -1;

/// Result of one transcoder invocation that actually ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub diagnostics: String,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    pub fn into_result(self) -> Result<(), JobError> {
        if self.succeeded() {
            return Ok(());
        }

        Err(JobError::Transcode {
            exit_code: self.exit_code,
            diagnostics: self.diagnostics,
        })
    }
}

#[derive(Debug, Error)]
#[error("failed to run {program}: {source}")]
pub struct TranscodeLaunchError {
    pub program: String,
    #[source]
    pub source: io::Error,
}

impl From<TranscodeLaunchError> for JobError {
    fn from(err: TranscodeLaunchError) -> Self {
        JobError::TranscodeLaunch(err.to_string())
    }
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn run(&self, input: &Path, output: &Path)
    -> Result<ProcessOutcome, TranscodeLaunchError>;
}

/// Fixed encode profile: overwrite, H.264, CRF 33, 30 fps.
pub fn ffmpeg_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_os_string(),
        "-vcodec".into(),
        VIDEO_CODEC.into(),
        "-crf".into(),
        CONSTANT_RATE_FACTOR.into(),
        "-r".into(),
        FRAME_RATE.into(),
        output.as_os_str().to_os_string(),
    ]
}

#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn launch_error(&self, source: io::Error) -> TranscodeLaunchError {
        TranscodeLaunchError {
            program: self.program.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn run(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ProcessOutcome, TranscodeLaunchError> {
        let args = ffmpeg_args(input, output);
        info!(
            "[FFMPEG] Running: {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let diagnostics = match child.stderr.take() {
            Some(stderr) => drain_diagnostics(stderr).await,
            None => String::new(),
        };

        let status = child.wait().await.map_err(|e| self.launch_error(e))?;
        let exit_code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);

        if exit_code == 0 {
            info!("✅ FFmpeg finished");
        } else {
            error!("❌ FFmpeg exited with code {}", exit_code);
            error!("FFmpeg stderr: {}", diagnostics);
        }

        Ok(ProcessOutcome {
            exit_code,
            diagnostics,
        })
    }
}

/// Reads the diagnostic channel to EOF, logging progress chunks as they arrive.
async fn drain_diagnostics<R>(mut stderr: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        match stderr.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = &buf[..n];
                collected.extend_from_slice(chunk);

                let text = String::from_utf8_lossy(chunk);
                if text.contains("frame=") || text.contains("time=") {
                    debug!(progress = %text.trim(), "ffmpeg progress");
                }
            }
            Err(e) => {
                warn!("Failed to read ffmpeg stderr: {}", e);
                break;
            }
        }
    }

    String::from_utf8_lossy(&collected).into_owned()
}
