/// A validated compression request. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub bucket_name: String,
    pub object_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub original_file: String,
    pub compressed_file: String,
    pub bucket_name: String,
    pub processing_time_ms: u64,
    pub original_size_bytes: u64,
    pub compressed_size_bytes: u64,
    pub compression_ratio_percent: f64,
}

/// Share of the original size saved, in percent, rounded to one decimal.
/// An empty original has nothing to save and yields `0.0`.
pub fn compression_ratio_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }

    let saved = original as f64 - compressed as f64;
    (saved / original as f64 * 1000.0).round() / 10.0
}
