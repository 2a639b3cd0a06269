use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::core::error::{DownloadError, Result};
use crate::platforms::traits::StreamLocators;

pub struct TitlePattern {
    pub name: &'static str,
    regex: Regex,
}

impl TitlePattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    pub fn find(&self, body: &str) -> Option<String> {
        self.regex
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// Title sources in priority order.
pub static TITLE_PATTERNS: LazyLock<Vec<TitlePattern>> = LazyLock::new(|| {
    vec![
        TitlePattern::new("h1", r#"<h1 title="(.*?)" class="video-title""#),
        TitlePattern::new("title", r#"<title data-vue-meta="true">(.*?)</title>"#),
        TitlePattern::new(
            "meta-name",
            r#"<meta data-vue-meta="true" itemprop="name" name="title" content="(.*?)">"#,
        ),
        TitlePattern::new(
            "og-title",
            r#"<meta data-vue-meta="true" property="og:title" content="(.*?)">"#,
        ),
    ]
});

static PLAYINFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<script>window.__playinfo__=(.*?)</script>").unwrap());

pub fn extract_title(body: &str) -> Option<String> {
    TITLE_PATTERNS.iter().find_map(|p| p.find(body))
}

pub fn fallback_title(bvid: &str) -> String {
    bvid.to_string()
}

pub fn extract_playinfo(body: &str) -> Option<&str> {
    PLAYINFO_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn base_url(track: &Value) -> Option<&str> {
    track
        .get("base_url")
        .or_else(|| track.get("baseUrl"))
        .and_then(|v| v.as_str())
}

fn first_base_url(tracks: &[Value], kind: &str) -> Result<String> {
    tracks
        .first()
        .and_then(base_url)
        .map(str::to_string)
        .ok_or_else(|| DownloadError::extraction(format!("no {} track in dash data", kind)))
}

fn tracks<'a>(dash: &'a Value, kind: &str) -> Result<&'a [Value]> {
    dash.get(kind)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .ok_or_else(|| DownloadError::extraction(format!("dash.{} missing", kind)))
}

/// Lowest-bandwidth audio track; missing bandwidth counts as 0 and ties go to
/// the first track.
pub fn select_audio_url(audio: &[Value]) -> Result<String> {
    audio
        .iter()
        .min_by_key(|track| track.get("bandwidth").and_then(|b| b.as_u64()).unwrap_or(0))
        .and_then(base_url)
        .map(str::to_string)
        .ok_or_else(|| DownloadError::extraction("no audio track in dash data"))
}

/// Parses the `window.__playinfo__` blob. `timelength` is in milliseconds.
pub fn parse_playinfo(json: &str) -> Result<StreamLocators> {
    let playinfo: Value = serde_json::from_str(json)?;
    let data = playinfo
        .get("data")
        .ok_or_else(|| DownloadError::extraction("playinfo.data missing"))?;
    let dash = data
        .get("dash")
        .ok_or_else(|| DownloadError::extraction("playinfo.data.dash missing"))?;

    let video_url = first_base_url(tracks(dash, "video")?, "video")?;
    let audio_url = select_audio_url(tracks(dash, "audio")?)?;
    let duration_seconds = data.get("timelength").and_then(|v| v.as_u64()).unwrap_or(0) / 1000;

    Ok(StreamLocators {
        video_url,
        audio_url,
        duration_seconds,
    })
}

/// Non-zero `code` in an API envelope, with the API's message. An envelope
/// without an integer `code` is malformed.
pub fn api_failure(body: &Value) -> Result<Option<(i64, String)>> {
    let code = body
        .get("code")
        .and_then(|c| c.as_i64())
        .ok_or_else(|| DownloadError::extraction("API response code missing"))?;
    if code == 0 {
        return Ok(None);
    }
    let message = body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    Ok(Some((code, message)))
}

/// Content id from the view API. Multi-part uploads list one cid per part
/// under `data.pages`.
pub fn parse_cid(view: &Value, page: u32) -> Result<u64> {
    let data = view
        .get("data")
        .ok_or_else(|| DownloadError::extraction("view.data missing"))?;

    let part_cid = data
        .get("pages")
        .and_then(|p| p.as_array())
        .and_then(|pages| pages.get(page.saturating_sub(1) as usize))
        .and_then(|p| p.get("cid"))
        .and_then(|c| c.as_u64());

    part_cid
        .or_else(|| data.get("cid").and_then(|c| c.as_u64()))
        .ok_or_else(|| DownloadError::extraction("view.data.cid missing"))
}

/// Parses a play-address response. Its `duration` is already in seconds.
pub fn parse_playurl(play: &Value) -> Result<StreamLocators> {
    let dash = play
        .pointer("/data/dash")
        .ok_or_else(|| DownloadError::extraction("playurl.data.dash missing"))?;

    Ok(StreamLocators {
        video_url: first_base_url(tracks(dash, "video")?, "video")?,
        audio_url: first_base_url(tracks(dash, "audio")?, "audio")?,
        duration_seconds: dash.get("duration").and_then(|d| d.as_u64()).unwrap_or(0),
    })
}
