//! Command-line front end.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::redirect;
use crate::models::media::DownloadResult;
use crate::models::settings::DownloaderConfig;
use crate::platforms::bilibili::BilibiliDownloader;
use crate::storage::config;

#[derive(Debug, Parser)]
#[command(name = "bilidown")]
#[command(about = "Download audio or video from Bilibili")]
#[command(version)]
pub struct Cli {
    /// Config file (default: <config dir>/bilidown/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Download directory
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Maximum allowed video duration in seconds
    #[arg(long, global = true)]
    pub max_duration: Option<u64>,

    /// Path to the ffmpeg executable
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show title, duration and stream URLs
    Info {
        /// Video URL or share text
        url: String,
    },

    /// Check the video duration against the limit
    Check {
        /// Video URL or share text
        url: String,
    },

    /// Download the audio track
    Audio {
        /// Video URL or share text
        url: String,

        /// Output file (default: title + timestamp in the download dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Audio format (mp3, m4a, wav, ...)
        #[arg(short, long, default_value = "mp3")]
        format: String,
    },

    /// Download video and audio and mux them
    Video {
        /// Video URL or share text
        url: String,

        /// Output file (default: title + timestamp in the download dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Container format
        #[arg(short, long, default_value = "mp4")]
        format: String,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut DownloaderConfig) {
        if let Some(dir) = &self.dir {
            config.download_dir = dir.clone();
        }
        if let Some(max) = self.max_duration {
            config.max_duration_secs = max;
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            config.ffmpeg_path = Some(ffmpeg.clone());
        }
    }

    fn url(&self) -> &str {
        match &self.command {
            Commands::Info { url }
            | Commands::Check { url }
            | Commands::Audio { url, .. }
            | Commands::Video { url, .. } => url,
        }
    }
}

/// Execute CLI command - separated for testing.
pub async fn run_cli(cli: Cli) -> Result<ExitCode> {
    tracing::debug!(?cli, "parsed arguments");

    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let downloader = BilibiliDownloader::new(config)?;

    let url = redirect::normalize_input(downloader.client(), cli.url()).await?;

    match &cli.command {
        Commands::Info { .. } => {
            let info = downloader.get_video_info(&url).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { .. } => {
            let check = downloader.check_duration(&url).await;
            if check.within_limit {
                println!("ok: {}s", check.duration_seconds);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("not downloadable: {}", check.message);
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Audio { output, format, .. } => {
            let result = downloader.download_audio(&url, output.as_deref(), format).await;
            Ok(report(&result))
        }
        Commands::Video { output, format, .. } => {
            let result = downloader.download_video(&url, output.as_deref(), format).await;
            Ok(report(&result))
        }
    }
}

fn report(result: &DownloadResult) -> ExitCode {
    match (&result.success, &result.file_path) {
        (true, Some(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("download failed: {}", result.message);
            ExitCode::FAILURE
        }
    }
}
