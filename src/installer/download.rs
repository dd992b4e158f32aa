//! Streaming archive download.

use super::InstallError;
use crate::utils::progress::ProgressBar;
use futures::StreamExt;
use std::io::{Seek, SeekFrom};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Stream `url` into an anonymous temporary file and rewind it.
///
/// The body is never buffered whole in memory. The status code is checked
/// before any byte is written, so a 404 page is never mistaken for an
/// archive.
pub(crate) async fn download_archive(
    client: &reqwest::Client,
    url: &str,
    show_progress: bool,
) -> Result<std::fs::File, InstallError> {
    info!("Downloading {}", url);

    let response = client.get(url).send().await.map_err(|e| InstallError::FetchFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let progress = if show_progress {
        ProgressBar::download(response.content_length())
    } else {
        ProgressBar::hidden()
    };
    progress.set_prefix("Downloading");

    let spool = tempfile::tempfile().map_err(|e| {
        InstallError::io("create download buffer", std::env::temp_dir(), e)
    })?;
    let mut file = tokio::fs::File::from_std(spool);

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| InstallError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|e| InstallError::io("write download buffer", std::env::temp_dir(), e))?;
        progress.inc(chunk.len() as u64);
    }
    file.flush()
        .await
        .map_err(|e| InstallError::io("flush download buffer", std::env::temp_dir(), e))?;

    let received = progress.position();
    progress.finish_and_clear();
    debug!("Downloaded {} bytes from {}", received, url);

    let mut file = file.into_std().await;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| InstallError::io("rewind download buffer", std::env::temp_dir(), e))?;
    Ok(file)
}
