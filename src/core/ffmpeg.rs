use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::error::{DownloadError, Result};

pub const FFMPEG_ENV: &str = "FFMPEG_PATH";

const COMMON_PATHS: &[&str] = &[
    "/usr/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
    "/opt/homebrew/bin/ffmpeg",
];

const STDERR_TAIL_LINES: usize = 5;

/// Process boundary for the external transcoder: run one argument list to
/// completion.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn run(&self, args: &[OsString]) -> Result<()>;

    async fn is_available(&self) -> bool {
        true
    }
}

pub struct FfmpegTranscoder {
    executable: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn is_available(&self) -> bool {
        is_ffmpeg_available(&self.executable).await
    }

    async fn run(&self, args: &[OsString]) -> Result<()> {
        tracing::debug!("[ffmpeg] {} {:?}", self.executable.display(), args);

        let output = crate::core::process::command(&self.executable)
            .args(args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                DownloadError::Ffmpeg(format!(
                    "failed to run {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Ffmpeg(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&stderr)
            )));
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}

/// Picks the ffmpeg executable: explicit override, then `FFMPEG_PATH` if it
/// points to an existing file, then well-known install locations, then the
/// search path. Falls back to a bare `ffmpeg`.
pub fn resolve_ffmpeg_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let env_value = std::env::var_os(FFMPEG_ENV).map(PathBuf::from);
    resolve_from(env_value, COMMON_PATHS, |p| p.exists())
}

fn resolve_from(
    env_value: Option<PathBuf>,
    candidates: &[&str],
    exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    if let Some(path) = env_value.filter(|p| exists(p)) {
        return path;
    }

    if let Some(found) = candidates.iter().map(Path::new).find(|p| exists(p)) {
        return found.to_path_buf();
    }

    which::which("ffmpeg").unwrap_or_else(|_| PathBuf::from("ffmpeg"))
}

pub async fn is_ffmpeg_available(executable: &Path) -> bool {
    crate::core::process::command(executable)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// `-y -i <input> [-acodec libmp3lame -ab 128k] <output>`. Only mp3 gets a
/// forced codec; other containers are left to ffmpeg's defaults.
pub fn audio_convert_args(input: &Path, output: &Path, format: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    if format.eq_ignore_ascii_case("mp3") {
        args.extend(["-acodec", "libmp3lame", "-ab", "128k"].map(OsString::from));
    }
    args.push(output.into());
    args
}

/// Stream-copy mux of one video and one audio track into a single container.
pub fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.into(),
        "-i".into(),
        audio.into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "copy".into(),
        output.into(),
    ]
}
