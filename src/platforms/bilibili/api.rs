use std::time::Duration;

use serde_json::Value;

use super::parser;
use crate::core::error::{DownloadError, Result};
use crate::platforms::traits::StreamLocators;

pub const VIEW_PATH: &str = "/x/web-interface/view";
pub const PLAYURL_PATH: &str = "/x/player/playurl";
const QUALITY: &str = "127";
const FNVAL_DASH: &str = "16";

async fn get_json(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
    timeout: Duration,
) -> Result<Value> {
    tracing::debug!("[api] GET {} {:?}", url, query);
    let text = client
        .get(url)
        .query(query)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(serde_json::from_str(&text)?)
}

pub async fn fetch_cid(
    client: &reqwest::Client,
    api_base: &str,
    bvid: &str,
    page: u32,
    timeout: Duration,
) -> Result<u64> {
    let url = format!("{}{}", api_base, VIEW_PATH);
    let view = get_json(client, &url, &[("bvid", bvid)], timeout).await?;

    if let Some((code, message)) = parser::api_failure(&view)? {
        return Err(DownloadError::VideoNotFound(format!(
            "API returned {}: {}",
            code, message
        )));
    }

    parser::parse_cid(&view, page)
}

pub async fn fetch_playurl(
    client: &reqwest::Client,
    api_base: &str,
    bvid: &str,
    cid: u64,
    timeout: Duration,
) -> Result<StreamLocators> {
    let url = format!("{}{}", api_base, PLAYURL_PATH);
    let cid = cid.to_string();
    let query = [
        ("bvid", bvid),
        ("cid", cid.as_str()),
        ("qn", QUALITY),
        ("fnval", FNVAL_DASH),
    ];
    let play = get_json(client, &url, &query, timeout).await?;

    if let Some((code, message)) = parser::api_failure(&play)? {
        return Err(DownloadError::extraction(format!(
            "failed to get play URL ({}): {}",
            code, message
        )));
    }

    parser::parse_playurl(&play)
}
