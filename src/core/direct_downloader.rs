use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::core::error::{DownloadError, Result};

/// Write granularity. Progress is reported once per slice.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Streams `url` into `output`, overwriting it. Memory use is bounded by the
/// size of a single network chunk. A partially written file is left behind on
/// failure; removing it is the caller's job.
pub async fn download_stream(
    client: &reqwest::Client,
    url: &str,
    output: &Path,
    progress_tx: mpsc::Sender<f64>,
) -> Result<u64> {
    let response = request(client, url).await?;
    let file = tokio::fs::File::create(output).await?;
    let downloaded = write_body(response, file, progress_tx).await?;
    tracing::debug!("[fetch] wrote {} bytes to {}", downloaded, output.display());
    Ok(downloaded)
}

/// Like [`download_stream`], but writes into a file the caller already
/// created. Dropping this future never creates a file.
pub async fn download_into(
    client: &reqwest::Client,
    url: &str,
    file: tokio::fs::File,
    progress_tx: mpsc::Sender<f64>,
) -> Result<u64> {
    let response = request(client, url).await?;
    write_body(response, file, progress_tx).await
}

async fn request(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    tracing::debug!("[fetch] GET {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::network(format!("HTTP {} while downloading {}", status, url)));
    }
    Ok(response)
}

async fn write_body(
    response: reqwest::Response,
    mut file: tokio::fs::File,
    progress_tx: mpsc::Sender<f64>,
) -> Result<u64> {
    let total_size = response.content_length().filter(|len| *len > 0);
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::network(format!("stream interrupted: {}", e)))?;

        for slice in chunk.chunks(CHUNK_SIZE) {
            file.write_all(slice).await?;
            downloaded += slice.len() as u64;

            if let Some(total) = total_size {
                let _ = progress_tx.send(progress_percent(downloaded, total)).await;
            }
        }
    }

    file.flush().await?;
    Ok(downloaded)
}

pub fn progress_percent(downloaded: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (downloaded as f64 / total as f64) * 100.0
}
