use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_DURATION_SECS: u64 = 10800;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Cookie-derived login tokens. All optional; anonymous requests get the
/// lower quality tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub sessdata: String,
    pub bili_jct: String,
    pub buvid3: String,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.sessdata.is_empty() && self.bili_jct.is_empty() && self.buvid3.is_empty()
    }

    /// Cookie header value built from the non-empty tokens, or `None` when
    /// nothing is set.
    pub fn cookie_header(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("SESSDATA", &self.sessdata),
            ("bili_jct", &self.bili_jct),
            ("buvid3", &self.buvid3),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    pub credentials: Credentials,
    pub download_dir: PathBuf,
    /// Explicit ffmpeg executable. When unset the path is resolved at
    /// downloader construction.
    pub ffmpeg_path: Option<PathBuf>,
    pub max_duration_secs: u64,
    pub request_timeout_secs: u64,
    pub web_base: String,
    pub api_base: String,
    pub user_agent: String,
    pub proxy: Option<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            download_dir: PathBuf::from("./downloads"),
            ffmpeg_path: None,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            request_timeout_secs: 10,
            web_base: "https://www.bilibili.com".into(),
            api_base: "https://api.bilibili.com".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            proxy: None,
        }
    }
}
