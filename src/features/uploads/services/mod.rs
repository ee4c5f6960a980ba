mod download_service;
mod upload_service;

pub use download_service::{DownloadProgress, DownloadService, DownloadedFile};
pub use upload_service::{UploadJob, UploadPhase, UploadProgress, UploadService};
