use futures::StreamExt;

use crate::core::error::{AppError, Result};
use crate::shared::constants::TRANSFER_CHUNK_SIZE;

/// Moves raw bytes between the client and presigned storage URLs,
/// reporting byte-level progress as chunks go over the wire.
pub struct ObjectTransfer {
    client: reqwest::Client,
}

impl Default for ObjectTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTransfer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Stream `data` to a presigned upload URL.
    ///
    /// `on_progress(loaded, total)` fires as each chunk is handed to the
    /// connection. The application server is bypassed entirely; only the
    /// confirm step afterwards creates the File record.
    pub async fn put(
        &self,
        upload_url: &str,
        data: Vec<u8>,
        content_type: &str,
        on_progress: impl Fn(u64, u64) + Send + Sync + 'static,
    ) -> Result<()> {
        let total = data.len() as u64;
        let chunks: Vec<Vec<u8>> = data
            .chunks(TRANSFER_CHUNK_SIZE)
            .map(|c| c.to_vec())
            .collect();

        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(sent, total);
            Ok::<Vec<u8>, std::io::Error>(chunk)
        });

        let response = self
            .client
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Transferred {} bytes to storage", total);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AppError::Server {
                status: status.as_u16(),
                message: format!("Storage rejected upload: {}", body),
            })
        }
    }

    /// Stream a download from a presigned URL into one in-memory buffer.
    ///
    /// `on_progress(loaded, total)` fires per received chunk; `total` is
    /// `None` when the response carries no content-length.
    pub async fn get(
        &self,
        download_url: &str,
        mut on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<Vec<u8>> {
        let response = self.client.get(download_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Server {
                status: status.as_u16(),
                message: format!("Storage rejected download: {}", body),
            });
        }

        let total = response.content_length();
        let mut buffer = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);
            on_progress(buffer.len() as u64, total);
        }

        tracing::debug!("Downloaded {} bytes from storage", buffer.len());
        Ok(buffer)
    }
}
