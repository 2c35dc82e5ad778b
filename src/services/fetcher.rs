//! Mod package download.
//!
//! A single GET streamed to disk. There is no retry, resume or checksum; a failed
//! transfer may leave a partial file behind, which the next run overwrites.

use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::Utf8Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Downloads `url` into `dest`, truncating any existing file.
///
/// # Returns
///
/// The number of bytes written.
///
/// # Errors
///
/// - [`InstallError::Network`] if the request or body transfer fails
/// - [`InstallError::HttpStatus`] if the server answers with a non-success status
/// - an I/O error with the file path as context if the file cannot be written
pub async fn download_file(client: &reqwest::Client, url: &str, dest: &Utf8Path) -> Result<u64> {
    tracing::info!("Downloading {} to {}", url, dest);

    let network_error = |source| InstallError::Network {
        url: url.to_string(),
        source,
    };

    let mut response = client.get(url).send().await.map_err(network_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
        .into());
    }

    tracing::debug!("Content-Length: {:?}", response.content_length());

    let mut file = File::create(dest)
        .await
        .with_context(|| format!("error creating file {}", dest))?;

    let mut bytes_downloaded: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(network_error)? {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("error saving file {}", dest))?;
        bytes_downloaded += chunk.len() as u64;
    }

    file.flush()
        .await
        .with_context(|| format!("error saving file {}", dest))?;

    tracing::info!("File downloaded successfully to {} ({} bytes)", dest, bytes_downloaded);
    Ok(bytes_downloaded)
}
