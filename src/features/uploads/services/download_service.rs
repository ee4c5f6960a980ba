use std::path::{Path, PathBuf};

use tokio::sync::watch;

use crate::core::error::{AppError, Result};
use crate::features::board::models::ShortFile;
use crate::modules::storage::ObjectTransfer;

/// Progress of a streamed download.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadProgress {
    #[default]
    Idle,
    /// The response carried a content-length.
    Determinate { percent: u8, loaded: u64, total: u64 },
    /// No content-length; only the byte count is known.
    Indeterminate { loaded: u64 },
    Done,
    Failed(String),
}

/// A fully assembled download, ready to hand to the user.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Streams a file from its time-limited download URL, accumulating chunks
/// into one buffer and reporting progress along the way. A failure is a
/// single terminal error; there is no resume or partial-download support.
pub struct DownloadService {
    transfer: ObjectTransfer,
    progress: watch::Sender<DownloadProgress>,
}

impl Default for DownloadService {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadService {
    pub fn new() -> Self {
        let (progress, _) = watch::channel(DownloadProgress::default());
        Self {
            transfer: ObjectTransfer::new(),
            progress,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DownloadProgress> {
        self.progress.subscribe()
    }

    /// Fetch a short's file. The signed URL may be absent when server-side
    /// signing failed; that is a validation error, not a transfer failure.
    pub async fn download(&self, file: &ShortFile) -> Result<DownloadedFile> {
        let url = file.download_url.as_deref().ok_or_else(|| {
            AppError::Validation(format!("No download link available for {}", file.file_name))
        })?;

        tracing::info!("Downloading {} ({} bytes)", file.file_name, file.file_size);

        let sender = self.progress.clone();
        let bytes = self
            .transfer
            .get(url, move |loaded, total| {
                let update = match total {
                    Some(total) if total > 0 => DownloadProgress::Determinate {
                        percent: ((loaded * 100) / total).min(100) as u8,
                        loaded,
                        total,
                    },
                    _ => DownloadProgress::Indeterminate { loaded },
                };
                sender.send_replace(update);
            })
            .await
            .map_err(|e| {
                self.progress
                    .send_replace(DownloadProgress::Failed(e.to_string()));
                e
            })?;

        self.progress.send_replace(DownloadProgress::Done);
        Ok(DownloadedFile {
            file_name: file.file_name.clone(),
            bytes,
        })
    }

    /// Save an assembled download under `dir` using its original file name.
    pub async fn save_to(&self, dir: &Path, file: &DownloadedFile) -> Result<PathBuf> {
        let path = dir.join(&file.file_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save {}: {}", path.display(), e)))?;
        tracing::debug!("Saved {} to {}", file.file_name, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::board::models::FileType;
    use crate::shared::test_helpers::file_of_type;
    use axum::routing::get;
    use axum::Router;

    async fn storage_server(payload: Vec<u8>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/object",
            get(move || {
                let payload = payload.clone();
                async move { payload }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/object", addr)
    }

    #[tokio::test]
    async fn test_download_assembles_buffer_and_finishes() {
        let payload = vec![5u8; 120_000];
        let url = storage_server(payload.clone()).await;

        let mut file = file_of_type(1, 1, FileType::FinalVideo);
        file.download_url = Some(url);

        let service = DownloadService::new();
        let result = service.download(&file).await.unwrap();

        assert_eq!(result.bytes, payload);
        assert_eq!(result.file_name, file.file_name);
        assert_eq!(*service.progress.borrow(), DownloadProgress::Done);
    }

    #[tokio::test]
    async fn test_missing_download_url_is_a_validation_error() {
        let mut file = file_of_type(1, 1, FileType::FinalVideo);
        file.download_url = None;

        let err = DownloadService::new().download(&file).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_save_to_writes_with_original_name() {
        let service = DownloadService::new();
        let downloaded = DownloadedFile {
            file_name: "final-cut.mp4".to_string(),
            bytes: vec![1, 2, 3, 4],
        };

        let dir = std::env::temp_dir();
        let path = service.save_to(&dir, &downloaded).await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![1, 2, 3, 4]);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
