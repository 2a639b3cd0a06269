use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub bvid: String,
    pub title: String,
    pub duration_seconds: u64,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub page: u32,
}

/// Outcome of a top-level download call. Failures are reported here rather
/// than as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub success: bool,
    pub message: String,
    pub file_path: Option<PathBuf>,
    pub duration_seconds: Option<u64>,
    pub video_info: Option<VideoInfo>,
}

impl DownloadResult {
    pub fn succeeded(file_path: PathBuf, info: VideoInfo) -> Self {
        Self {
            success: true,
            message: "download complete".into(),
            file_path: Some(file_path),
            duration_seconds: Some(info.duration_seconds),
            video_info: Some(info),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file_path: None,
            duration_seconds: None,
            video_info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationCheck {
    pub within_limit: bool,
    pub message: String,
    pub duration_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> VideoInfo {
        VideoInfo {
            bvid: "BV1xx411c7mD".into(),
            title: "title".into(),
            duration_seconds: 42,
            video_url: Some("V".into()),
            audio_url: Some("A".into()),
            page: 1,
        }
    }

    #[test]
    fn success_result_carries_info() {
        let result = DownloadResult::succeeded(PathBuf::from("out.mp3"), info());
        assert!(result.success);
        assert_eq!(result.duration_seconds, Some(42));
        assert_eq!(result.file_path, Some(PathBuf::from("out.mp3")));
        assert_eq!(result.video_info.unwrap().bvid, "BV1xx411c7mD");
    }

    #[test]
    fn failed_result_has_no_path() {
        let result = DownloadResult::failed("boom");
        assert!(!result.success);
        assert_eq!(result.message, "boom");
        assert!(result.file_path.is_none());
        assert!(result.video_info.is_none());
    }
}
