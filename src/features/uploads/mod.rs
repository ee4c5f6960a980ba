//! The two-phase file transfer protocol: reserve a signed storage target,
//! stream the bytes, confirm so the server creates the File record.

pub mod dtos;
pub mod progress;
pub mod services;

pub use progress::BatchPlan;
pub use services::{
    DownloadProgress, DownloadService, DownloadedFile, UploadJob, UploadPhase, UploadProgress,
    UploadService,
};
