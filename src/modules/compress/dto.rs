use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::model::{CompressionRequest, CompressionResult};

pub const MISSING_PARAMETERS: &str = "Missing required parameters: bucketName and objectName";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressRequest {
    #[validate(required, length(min = 1))]
    pub bucket_name: Option<String>,
    /// Object key inside the bucket, e.g. `uploads/clip.mov`.
    #[validate(required, length(min = 1))]
    pub object_name: Option<String>,
}

impl CompressRequest {
    pub fn into_job_request(self) -> Result<CompressionRequest, &'static str> {
        self.validate().map_err(|_| MISSING_PARAMETERS)?;

        match (self.bucket_name, self.object_name) {
            (Some(bucket_name), Some(object_name)) => Ok(CompressionRequest {
                bucket_name,
                object_name,
            }),
            _ => Err(MISSING_PARAMETERS),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    pub original_file: String,
    pub compressed_file: String,
    pub bucket_name: String,
    pub processing_time_ms: u64,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Percent of the original size saved, one decimal.
    pub compression_ratio: f64,
}

impl From<CompressionResult> for CompressResponse {
    fn from(r: CompressionResult) -> Self {
        Self {
            original_file: r.original_file,
            compressed_file: r.compressed_file,
            bucket_name: r.bucket_name,
            processing_time_ms: r.processing_time_ms,
            original_size: r.original_size_bytes,
            compressed_size: r.compressed_size_bytes,
            compression_ratio: r.compression_ratio_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CompressRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn accepts_both_fields() {
        let req = parse(r#"{"bucketName":"videos","objectName":"a/clip.mov"}"#)
            .into_job_request()
            .unwrap();
        assert_eq!(req.bucket_name, "videos");
        assert_eq!(req.object_name, "a/clip.mov");
    }

    #[test]
    fn rejects_missing_or_empty_fields() {
        for body in [
            r#"{}"#,
            r#"{"bucketName":"videos"}"#,
            r#"{"objectName":"clip.mov"}"#,
            r#"{"bucketName":"","objectName":"clip.mov"}"#,
            r#"{"bucketName":"videos","objectName":null}"#,
        ] {
            assert_eq!(parse(body).into_job_request(), Err(MISSING_PARAMETERS), "{}", body);
        }
    }

    #[test]
    fn response_uses_camel_case_keys() {
        let json = serde_json::to_value(CompressResponse::from(CompressionResult {
            original_file: "clip.mov".into(),
            compressed_file: "clip_compressed.mp4".into(),
            bucket_name: "videos".into(),
            processing_time_ms: 12,
            original_size_bytes: 10,
            compressed_size_bytes: 6,
            compression_ratio_percent: 40.0,
        }))
        .unwrap();

        assert_eq!(json["compressedFile"], "clip_compressed.mp4");
        assert_eq!(json["processingTimeMs"], 12);
        assert_eq!(json["originalSize"], 10);
        assert_eq!(json["compressionRatio"], 40.0);
    }
}
