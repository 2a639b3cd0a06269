use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use unicode_normalization::UnicodeNormalization;

const MAX_TITLE_CHARS: usize = 50;
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces characters that are illegal in file names with `_` and caps the
/// result at 50 characters.
pub fn sanitize_title(title: &str) -> String {
    let title: String = title.nfc().collect();
    title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect()
}

pub fn output_file_name(title: &str, extension: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        sanitize_title(title),
        now.format("%Y%m%d_%H%M%S"),
        extension
    )
}

pub fn default_output_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    dir.join(output_file_name(title, extension, Local::now()))
}

/// Temporary stream file, unique per call so that two downloads of the same
/// video never share a path.
pub fn temp_stream_path(dir: &Path, kind: &str, bvid: &str) -> PathBuf {
    dir.join(format!(
        "temp_{}_{}_{}.m4s",
        kind,
        bvid,
        uuid::Uuid::new_v4().simple()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_replaces_each_forbidden_char() {
        for c in FORBIDDEN {
            let input = format!("test{}file", c);
            assert_eq!(sanitize_title(&input), "test_file", "char '{}'", c);
        }
    }

    #[test]
    fn sanitize_mixed_title() {
        assert_eq!(
            sanitize_title("Video: \"Best of 2024\" <HD> | 1080p"),
            "Video_ _Best of 2024_ _HD_ _ 1080p"
        );
    }

    #[test]
    fn sanitize_truncates_by_chars() {
        let long = "字".repeat(80);
        let result = sanitize_title(&long);
        assert_eq!(result.chars().count(), 50);
    }

    #[test]
    fn sanitize_unicode_nfc_normalization() {
        assert_eq!(sanitize_title("e\u{0301}"), "\u{00e9}");
    }

    #[test]
    fn output_name_has_timestamp_and_extension() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            output_file_name("a/b", "mp3", now),
            "a_b_20240309_070501.mp3"
        );
    }

    #[test]
    fn default_output_path_is_under_dir() {
        let path = default_output_path(Path::new("downloads"), "title", "mp4");
        assert!(path.starts_with("downloads"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
    }

    #[test]
    fn temp_paths_are_unique_per_call() {
        let dir = Path::new("downloads");
        let a = temp_stream_path(dir, "audio", "BV1xx411c7mD");
        let b = temp_stream_path(dir, "audio", "BV1xx411c7mD");
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("temp_audio_BV1xx411c7mD_"));
        assert!(name.ends_with(".m4s"));
    }
}
