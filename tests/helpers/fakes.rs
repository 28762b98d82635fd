use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use video_compressor::infrastructure::storage::{ObjectReader, ObjectStore, StorageError};
use video_compressor::workers::transcoder::{ProcessOutcome, TranscodeLaunchError, Transcoder};

#[derive(Debug, Clone)]
pub struct Upload {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// In-memory object store that records every call.
#[derive(Default)]
pub struct FakeStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    uploads: Mutex<Vec<Upload>>,
    get_calls: AtomicUsize,
    put_calls: AtomicUsize,
    broken_stream: bool,
    failing_put: bool,
    offline: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, body: Vec<u8>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        self
    }

    /// Downloads start but the byte stream errors out.
    pub fn with_broken_stream(mut self) -> Self {
        self.broken_stream = true;
        self
    }

    pub fn with_failing_put(mut self) -> Self {
        self.failing_put = true;
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectReader, StorageError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if self.broken_stream {
            return Ok(Box::pin(BrokenReader));
        }

        let body = self
            .objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned();

        match body {
            Some(body) => Ok(Box::pin(io::Cursor::new(body))),
            None => Err(StorageError::Request(
                "NoSuchKey: The specified key does not exist.".to_string(),
            )),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        mut file: File,
        _content_length: u64,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_put {
            return Err(StorageError::Request("AccessDenied: Access Denied.".to_string()));
        }

        let mut body = Vec::new();
        file.read_to_end(&mut body).await?;

        self.uploads.lock().unwrap().push(Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        if self.offline {
            return Err(StorageError::Request("connect ECONNREFUSED 127.0.0.1:9000".to_string()));
        }

        let mut buckets: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .map(|(bucket, _)| bucket.clone())
            .collect();
        buckets.sort();
        buckets.dedup();
        Ok(buckets)
    }
}

struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Writes an output file of the given size and exits 0.
    Encode { output_size: usize },
    /// Writes a partial output file and exits with the code.
    Exit(i32),
    LaunchFailure,
}

#[derive(Debug, Clone)]
pub struct TranscodeCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_size: u64,
}

pub struct FakeTranscoder {
    behavior: Behavior,
    delay: Duration,
    calls: Mutex<Vec<TranscodeCall>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTranscoder {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn encoding(output_size: usize) -> Self {
        Self::new(Behavior::Encode { output_size })
    }

    /// Keeps each run busy for `delay` so overlapping jobs can be observed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<TranscodeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn run(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ProcessOutcome, TranscodeLaunchError> {
        let input_size = tokio::fs::metadata(input).await.map(|m| m.len()).unwrap_or(0);
        self.calls.lock().unwrap().push(TranscodeCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_size,
        });

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_active, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Encode { output_size } => {
                tokio::fs::write(output, vec![0u8; output_size])
                    .await
                    .expect("write fake output");
                Ok(ProcessOutcome {
                    exit_code: 0,
                    diagnostics: "frame=  30 fps=0.0 q=-1.0 Lsize=1kB time=00:00:01.00".to_string(),
                })
            }
            Behavior::Exit(code) => {
                tokio::fs::write(output, b"partial")
                    .await
                    .expect("write fake output");
                Ok(ProcessOutcome {
                    exit_code: code,
                    diagnostics: "Invalid data found when processing input".to_string(),
                })
            }
            Behavior::LaunchFailure => Err(TranscodeLaunchError {
                program: "ffmpeg".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
        }
    }
}
