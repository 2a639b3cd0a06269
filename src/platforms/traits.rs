use async_trait::async_trait;

use crate::core::error::Result;

/// Stream locations and duration resolved for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLocators {
    pub video_url: String,
    pub audio_url: String,
    pub duration_seconds: u64,
}

/// What a stream source gets to work with: the resolved id and the already
/// fetched page body.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub bvid: &'a str,
    pub page: u32,
    pub body: &'a str,
}

/// One way of finding the stream locators for a page. Sources are tried in
/// order; `Ok(None)` passes to the next one, an error stops the search.
#[async_trait]
pub trait StreamSource: Send + Sync {
    fn name(&self) -> &str;
    async fn locate(&self, ctx: &PageContext<'_>) -> Result<Option<StreamLocators>>;
}
