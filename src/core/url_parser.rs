use regex::Regex;
use std::sync::LazyLock;

static BVID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"BV[0-9A-Za-z]+").unwrap());
static URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[\w\-]+\.[\w\-]+[/?\S]*").unwrap());

const SHORT_LINK_HOSTS: &[&str] = &["b23.tv", "bili2233.cn"];

/// Returns the BV id and the 1-based part number of a video URL.
pub fn parse_bili_url(url: &str) -> (Option<String>, u32) {
    (extract_bvid(url), extract_page_number(url))
}

pub fn extract_bvid(url: &str) -> Option<String> {
    BVID_RE.find(url).map(|m| m.as_str().to_string())
}

pub fn extract_page_number(url: &str) -> u32 {
    let Some((_, query)) = url.split_once('?') else {
        return 1;
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "p")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Pulls the first http(s) URL out of free text such as a share message.
pub fn extract_url_from_text(text: &str) -> Option<String> {
    URL_IN_TEXT_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn is_short_link(url_str: &str) -> bool {
    url::Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .is_some_and(|host| {
            SHORT_LINK_HOSTS
                .iter()
                .any(|s| host == *s || host.ends_with(&format!(".{}", s)))
        })
}
