use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER, USER_AGENT};

use crate::core::error::{DownloadError, Result};
use crate::models::settings::DownloaderConfig;

/// Browser-like header set sent with every page, API and stream request.
pub fn default_headers(config: &DownloaderConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent)?);
    headers.insert(REFERER, header_value(&config.web_base)?);
    if let Some(cookie) = config.credentials.cookie_header() {
        headers.insert(COOKIE, header_value(&cookie)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| DownloadError::network(format!("invalid header value: {}", e)))
}

pub fn apply_proxy(builder: reqwest::ClientBuilder, proxy: Option<&str>) -> reqwest::ClientBuilder {
    let Some(proxy_url) = proxy.filter(|p| !p.is_empty()) else {
        return builder;
    };
    match reqwest::Proxy::all(proxy_url) {
        Ok(p) => builder.proxy(p),
        Err(e) => {
            tracing::warn!("Invalid proxy URL: {}", e);
            builder
        }
    }
}

/// Shared client for metadata and stream requests. No global timeout: only
/// metadata requests are bounded, per request.
pub fn build_client(config: &DownloaderConfig) -> Result<reqwest::Client> {
    let builder = reqwest::Client::builder()
        .default_headers(default_headers(config)?)
        .connect_timeout(std::time::Duration::from_secs(15));
    apply_proxy(builder, config.proxy.as_deref())
        .build()
        .map_err(|e| DownloadError::network(format!("failed to build HTTP client: {}", e)))
}
