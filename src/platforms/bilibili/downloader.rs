use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::BilibiliExtractor;
use crate::core::direct_downloader;
use crate::core::error::{DownloadError, Result};
use crate::core::ffmpeg::{self, FfmpegTranscoder, Transcoder};
use crate::core::filename;
use crate::core::http_client;
use crate::core::progress;
use crate::models::media::{DownloadResult, DurationCheck, VideoInfo};
use crate::models::settings::DownloaderConfig;

/// Runs the whole pipeline for one video: metadata, duration check, stream
/// fetch, ffmpeg, cleanup. The configuration is fixed at construction.
pub struct BilibiliDownloader {
    config: Arc<DownloaderConfig>,
    client: reqwest::Client,
    extractor: BilibiliExtractor,
    transcoder: Arc<dyn Transcoder>,
}

impl BilibiliDownloader {
    pub fn new(config: DownloaderConfig) -> Result<Self> {
        let executable = ffmpeg::resolve_ffmpeg_path(config.ffmpeg_path.as_deref());
        tracing::debug!("[bilibili] using ffmpeg at {}", executable.display());
        Self::with_transcoder(config, Arc::new(FfmpegTranscoder::new(executable)))
    }

    pub fn with_transcoder(config: DownloaderConfig, transcoder: Arc<dyn Transcoder>) -> Result<Self> {
        std::fs::create_dir_all(&config.download_dir)?;
        if config.credentials.is_empty() {
            tracing::debug!("[bilibili] no credentials set, requests are anonymous");
        }

        let client = http_client::build_client(&config)?;
        let config = Arc::new(config);
        let extractor = BilibiliExtractor::new(client.clone(), config.clone());

        Ok(Self {
            config,
            client,
            extractor,
            transcoder,
        })
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolves title, duration and stream URLs. Unlike the download
    /// operations, errors are returned as-is.
    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        self.extractor.get_video_info(url).await
    }

    pub async fn check_duration(&self, url: &str) -> DurationCheck {
        let info = match self.get_video_info(url).await {
            Ok(info) => info,
            Err(e) => {
                return DurationCheck {
                    within_limit: false,
                    message: e.to_string(),
                    duration_seconds: 0,
                }
            }
        };

        match self.ensure_within_limit(&info) {
            Ok(()) => DurationCheck {
                within_limit: true,
                message: "ok".into(),
                duration_seconds: info.duration_seconds,
            },
            Err(e) => DurationCheck {
                within_limit: false,
                message: e.to_string(),
                duration_seconds: info.duration_seconds,
            },
        }
    }

    /// Downloads the audio track and converts it to `format` (mp3, m4a, wav,
    /// ...). `output` defaults to a timestamped name in the download dir.
    pub async fn download_audio(&self, url: &str, output: Option<&Path>, format: &str) -> DownloadResult {
        into_result(self.try_download_audio(url, output, format).await)
    }

    /// Downloads video and audio concurrently and muxes them without
    /// re-encoding.
    pub async fn download_video(&self, url: &str, output: Option<&Path>, format: &str) -> DownloadResult {
        into_result(self.try_download_video(url, output, format).await)
    }

    /// Runs [`Self::download_audio`] on a private runtime. Must not be called
    /// from inside a tokio runtime.
    pub fn download_audio_blocking(&self, url: &str, output: Option<&Path>, format: &str) -> DownloadResult {
        block_on(self.download_audio(url, output, format))
    }

    /// Runs [`Self::download_video`] on a private runtime. Must not be called
    /// from inside a tokio runtime.
    pub fn download_video_blocking(&self, url: &str, output: Option<&Path>, format: &str) -> DownloadResult {
        block_on(self.download_video(url, output, format))
    }

    fn ensure_within_limit(&self, info: &VideoInfo) -> Result<()> {
        if info.duration_seconds > self.config.max_duration_secs {
            return Err(DownloadError::DurationExceeded {
                duration: info.duration_seconds,
                limit: self.config.max_duration_secs,
            });
        }
        Ok(())
    }

    async fn ensure_transcoder(&self) -> Result<()> {
        if !self.transcoder.is_available().await {
            return Err(DownloadError::Ffmpeg("ffmpeg is not installed or not runnable".into()));
        }
        Ok(())
    }

    fn output_path(&self, output: Option<&Path>, info: &VideoInfo, extension: &str) -> PathBuf {
        match output {
            Some(path) => path.to_path_buf(),
            None => filename::default_output_path(&self.config.download_dir, &info.title, extension),
        }
    }

    async fn try_download_audio(&self, url: &str, output: Option<&Path>, format: &str) -> Result<DownloadResult> {
        let info = self.get_video_info(url).await?;
        self.ensure_within_limit(&info)?;
        self.ensure_transcoder().await?;

        let audio_url = stream_url(&info.audio_url, "audio")?;
        let output = self.output_path(output, &info, format);
        let temp_audio = filename::temp_stream_path(&self.config.download_dir, "audio", &info.bvid);

        tracing::info!("[bilibili] downloading audio of {} to {}", info.bvid, output.display());

        let outcome = async {
            let (tx, reporter) = progress::spawn_reporter("audio");
            let fetched = direct_downloader::download_stream(&self.client, audio_url, &temp_audio, tx).await;
            let _ = reporter.await;
            fetched?;
            ensure_parent(&output).await?;
            self.transcoder
                .run(&ffmpeg::audio_convert_args(&temp_audio, &output, format))
                .await
        }
        .await;

        remove_temp_files(&[&temp_audio]).await;
        outcome?;

        tracing::info!("[bilibili] audio saved to {}", output.display());
        Ok(DownloadResult::succeeded(output, info))
    }

    async fn try_download_video(&self, url: &str, output: Option<&Path>, format: &str) -> Result<DownloadResult> {
        let info = self.get_video_info(url).await?;
        self.ensure_within_limit(&info)?;
        self.ensure_transcoder().await?;

        let video_url = stream_url(&info.video_url, "video")?;
        let audio_url = stream_url(&info.audio_url, "audio")?;
        let output = self.output_path(output, &info, format);
        let dir = &self.config.download_dir;
        let temp_video = filename::temp_stream_path(dir, "video", &info.bvid);
        let temp_audio = filename::temp_stream_path(dir, "audio", &info.bvid);

        tracing::info!("[bilibili] downloading video of {} to {}", info.bvid, output.display());

        let outcome = async {
            // Both files exist before the join, so a fetch dropped mid-flight
            // cannot recreate one after cleanup.
            let video_file = tokio::fs::File::create(&temp_video).await?;
            let audio_file = tokio::fs::File::create(&temp_audio).await?;
            tokio::try_join!(
                self.fetch(video_url, video_file, "video"),
                self.fetch(audio_url, audio_file, "audio"),
            )?;
            ensure_parent(&output).await?;
            self.transcoder
                .run(&ffmpeg::mux_args(&temp_video, &temp_audio, &output))
                .await
        }
        .await;

        remove_temp_files(&[&temp_video, &temp_audio]).await;
        outcome?;

        tracing::info!("[bilibili] video saved to {}", output.display());
        Ok(DownloadResult::succeeded(output, info))
    }

    async fn fetch(&self, url: &str, file: tokio::fs::File, label: &'static str) -> Result<u64> {
        let (tx, reporter) = progress::spawn_reporter(label);
        let result = direct_downloader::download_into(&self.client, url, file, tx).await;
        let _ = reporter.await;
        result
    }
}

fn into_result(result: Result<DownloadResult>) -> DownloadResult {
    match result {
        Ok(done) => done,
        Err(e) => {
            tracing::warn!("[bilibili] download failed: {}", e);
            DownloadResult::failed(e.to_string())
        }
    }
}

fn block_on<F: std::future::Future<Output = DownloadResult>>(future: F) -> DownloadResult {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(future),
        Err(e) => DownloadResult::failed(format!("failed to start async runtime: {}", e)),
    }
}

fn stream_url<'a>(url: &'a Option<String>, kind: &str) -> Result<&'a str> {
    url.as_deref()
        .ok_or_else(|| DownloadError::extraction(format!("no {} stream URL", kind)))
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn remove_temp_files(paths: &[&Path]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!("[bilibili] removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("[bilibili] could not remove {}: {}", path.display(), e),
        }
    }
}
