pub mod api;
pub mod downloader;
pub mod parser;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{DownloadError, Result};
use crate::core::url_parser;
use crate::models::media::VideoInfo;
use crate::models::settings::DownloaderConfig;
use crate::platforms::traits::{PageContext, StreamLocators, StreamSource};

pub use downloader::BilibiliDownloader;

/// Streams from the `window.__playinfo__` blob embedded in the page.
pub struct EmbeddedPlayinfo;

#[async_trait]
impl StreamSource for EmbeddedPlayinfo {
    fn name(&self) -> &str {
        "playinfo"
    }

    async fn locate(&self, ctx: &PageContext<'_>) -> Result<Option<StreamLocators>> {
        match parser::extract_playinfo(ctx.body) {
            Some(blob) => parser::parse_playinfo(blob).map(Some),
            None => Ok(None),
        }
    }
}

/// Streams from the view + playurl API pair.
pub struct PlayurlApi {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl PlayurlApi {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            timeout,
        }
    }
}

#[async_trait]
impl StreamSource for PlayurlApi {
    fn name(&self) -> &str {
        "playurl-api"
    }

    async fn locate(&self, ctx: &PageContext<'_>) -> Result<Option<StreamLocators>> {
        let cid = api::fetch_cid(&self.client, &self.api_base, ctx.bvid, ctx.page, self.timeout).await?;
        tracing::debug!("[bilibili] {} resolved to cid {}", ctx.bvid, cid);
        api::fetch_playurl(&self.client, &self.api_base, ctx.bvid, cid, self.timeout)
            .await
            .map(Some)
    }
}

pub struct BilibiliExtractor {
    client: reqwest::Client,
    config: Arc<DownloaderConfig>,
    sources: Vec<Box<dyn StreamSource>>,
}

impl BilibiliExtractor {
    pub fn new(client: reqwest::Client, config: Arc<DownloaderConfig>) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let sources: Vec<Box<dyn StreamSource>> = vec![
            Box::new(EmbeddedPlayinfo),
            Box::new(PlayurlApi::new(client.clone(), config.api_base.clone(), timeout)),
        ];
        Self {
            client,
            config,
            sources,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        let (bvid, page) = url_parser::parse_bili_url(url);
        let bvid = bvid.ok_or_else(|| {
            DownloadError::VideoNotFound(format!("could not extract a BV id from URL: {}", url))
        })?;

        tracing::info!("[bilibili] fetching page for {} (part {})", bvid, page);
        let body = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let title = parser::extract_title(&body).unwrap_or_else(|| parser::fallback_title(&bvid));

        let ctx = PageContext {
            bvid: &bvid,
            page,
            body: &body,
        };
        let locators = self.locate_streams(&ctx).await?;

        Ok(VideoInfo {
            bvid,
            title,
            duration_seconds: locators.duration_seconds,
            video_url: Some(locators.video_url),
            audio_url: Some(locators.audio_url),
            page,
        })
    }

    async fn locate_streams(&self, ctx: &PageContext<'_>) -> Result<StreamLocators> {
        for source in &self.sources {
            if let Some(locators) = source.locate(ctx).await? {
                tracing::debug!("[bilibili] streams for {} found via {}", ctx.bvid, source.name());
                return Ok(locators);
            }
            tracing::debug!("[bilibili] {} had nothing for {}", source.name(), ctx.bvid);
        }
        Err(DownloadError::extraction(format!(
            "no stream source matched {}",
            ctx.bvid
        )))
    }
}
