pub mod cli;
pub mod core;
pub mod models;
pub mod platforms;
pub mod storage;

pub use crate::core::error::{DownloadError, Result};
pub use crate::models::media::{DownloadResult, DurationCheck, VideoInfo};
pub use crate::models::settings::{Credentials, DownloaderConfig};
pub use crate::platforms::bilibili::BilibiliDownloader;

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(cli: cli::Cli) -> anyhow::Result<std::process::ExitCode> {
    cli::run_cli(cli).await
}
