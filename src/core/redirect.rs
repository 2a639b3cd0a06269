use crate::core::error::{DownloadError, Result};
use crate::core::url_parser;

/// Follows a share short link (b23.tv) to the video page it points at.
pub async fn resolve_short_link(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let final_url = response.url().to_string();

    if final_url == url {
        return Err(DownloadError::VideoNotFound(format!(
            "no redirect found for {}",
            url
        )));
    }

    tracing::debug!("[redirect] {} -> {}", url, final_url);
    Ok(final_url)
}

/// Turns free-form user input into a page URL: extracts the first link from
/// share text and expands short links. Plain URLs are returned untouched.
pub async fn normalize_input(client: &reqwest::Client, input: &str) -> Result<String> {
    let input = input.trim();
    let url = url_parser::extract_url_from_text(input).unwrap_or_else(|| input.to_string());

    if url_parser::extract_bvid(&url).is_none() && url_parser::is_short_link(&url) {
        return resolve_short_link(client, &url).await;
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn follows_redirect() {
        let server = MockServer::start().await;
        let target = format!("{}/video/BV1xx411c7mD", server.uri());
        Mock::given(method("GET"))
            .and(path("/abcdefg"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", target.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/video/BV1xx411c7mD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let resolved = resolve_short_link(&client, &format!("{}/abcdefg", server.uri()))
            .await
            .unwrap();
        assert_eq!(resolved, target);
    }

    #[tokio::test]
    async fn no_redirect_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/abcdefg", server.uri());
        let err = resolve_short_link(&client, &url).await.unwrap_err();
        assert!(matches!(err, DownloadError::VideoNotFound(_)));
    }

    #[tokio::test]
    async fn normal_urls_pass_through_without_requests() {
        let client = reqwest::Client::new();
        let url = normalize_input(
            &client,
            "  look https://www.bilibili.com/video/BV1xx411c7mD?p=2 ",
        )
        .await
        .unwrap();
        assert_eq!(url, "https://www.bilibili.com/video/BV1xx411c7mD?p=2");
    }
}
