//! Error taxonomy shared by every stage of the download pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloadError>;

/// Base error kind for all download failures. Callers can match a single
/// variant or treat the whole enum as "download failed".
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("video not found: {0}")]
    VideoNotFound(String),

    #[error("video duration ({duration}s) exceeds limit ({limit}s)")]
    DurationExceeded { duration: u64, limit: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    #[error("failed to parse video info: {0}")]
    Extraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Extraction(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DownloadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Extraction(err.to_string())
    }
}
