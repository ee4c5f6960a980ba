use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};
use validator::Validate;

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};
use crate::features::board::models::{FileType, Short, ShortFile};
use crate::features::uploads::dtos::{ConfirmUploadRequest, ReserveUploadRequest};
use crate::features::uploads::progress::BatchPlan;
use crate::modules::api::BoardApi;
use crate::modules::storage::ObjectTransfer;
use crate::shared::validation::FILE_NAME_REGEX;

/// One file in a submission batch.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub file_type: FileType,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadJob {
    fn reserve_request(&self) -> ReserveUploadRequest {
        ReserveUploadRequest {
            file_type: self.file_type,
            file_name: self.file_name.clone(),
            file_size: self.data.len() as u64,
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Where a submission currently is in the reserve-transfer-confirm protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Reserving,
    Transferring,
    Confirming,
    /// The transport failed after the bytes visibly finished transferring,
    /// so the confirm may have landed server-side anyway. Resolved by one
    /// reconciling read of the short before any error is surfaced.
    Ambiguous,
    Done,
    Failed(String),
}

/// Snapshot published on the coordinator's progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub phase: UploadPhase,
    pub percent: u8,
    pub current_file: Option<String>,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self {
            phase: UploadPhase::Idle,
            percent: 0,
            current_file: None,
        }
    }
}

/// Resets the busy flag when a submission ends, on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives the two-phase upload protocol for single- and multi-file
/// submissions.
///
/// Per file: reserve a signed target from the server, stream the bytes
/// directly to storage, then confirm so the server creates the File record.
/// A File row never exists before the confirm succeeds. Files in a batch
/// run strictly sequentially (one file's confirm completes before the next
/// file's reserve begins) so progress attribution stays unambiguous.
///
/// Single-flight per instance: a second submission while one is in flight
/// is rejected, enforced by a boolean busy flag rather than a queue.
pub struct UploadService<A: BoardApi> {
    api: Arc<A>,
    transfer: ObjectTransfer,
    config: UploadConfig,
    busy: AtomicBool,
    progress: watch::Sender<UploadProgress>,
    reload: Arc<Notify>,
}

impl<A: BoardApi> UploadService<A> {
    pub fn new(api: Arc<A>, config: UploadConfig, reload: Arc<Notify>) -> Self {
        let (progress, _) = watch::channel(UploadProgress::default());
        Self {
            api,
            transfer: ObjectTransfer::new(),
            config,
            busy: AtomicBool::new(false),
            progress,
            reload,
        }
    }

    /// Subscribe to progress snapshots for this coordinator.
    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// Run one submission batch. Returns the confirmed File records in
    /// batch order.
    pub async fn submit(&self, short_id: i64, jobs: Vec<UploadJob>) -> Result<Vec<ShortFile>> {
        if jobs.is_empty() {
            return Err(AppError::Validation("No files selected".to_string()));
        }
        for job in &jobs {
            self.validate_job(job)?;
        }

        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                AppError::Validation("Another upload is still in progress".to_string())
            })?;
        let _guard = BusyGuard(&self.busy);

        let sizes: Vec<u64> = jobs.iter().map(|j| j.data.len() as u64).collect();
        let plan = BatchPlan::new(&sizes);
        let batch_id = uuid::Uuid::new_v4();
        tracing::info!(
            "Starting upload batch {} for short {}: {} file(s), {} bytes",
            batch_id,
            short_id,
            plan.file_count(),
            plan.total_bytes()
        );

        let mut confirmed = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.into_iter().enumerate() {
            let file = self.run_job(short_id, index, &plan, job).await?;
            confirmed.push(file);
        }

        self.set_progress(UploadPhase::Done, 100, None);
        tracing::info!("Upload batch {} complete", batch_id);

        // Let the user see the completed state before the board reloads.
        tokio::time::sleep(self.config.success_hold()).await;
        self.reload.notify_one();

        Ok(confirmed)
    }

    /// One file through reserve → transfer → confirm.
    async fn run_job(
        &self,
        short_id: i64,
        index: usize,
        plan: &BatchPlan,
        job: UploadJob,
    ) -> Result<ShortFile> {
        let file_size = job.data.len() as u64;
        let file_name = job.file_name.clone();

        self.set_progress(
            UploadPhase::Reserving,
            plan.percent(index, 0),
            Some(file_name.clone()),
        );
        let ticket = match self.api.reserve_upload(short_id, job.reserve_request()).await {
            Ok(ticket) => ticket,
            Err(e) => return Err(self.fail(e)),
        };

        self.set_progress(
            UploadPhase::Transferring,
            plan.percent(index, 0),
            Some(file_name.clone()),
        );
        let transferred = Arc::new(AtomicU64::new(0));
        let transfer_result = {
            let sender = self.progress.clone();
            let plan = plan.clone();
            let name = file_name.clone();
            let transferred = transferred.clone();
            self.transfer
                .put(
                    &ticket.upload_url,
                    job.data,
                    &job.mime_type,
                    move |loaded, _total| {
                        transferred.store(loaded, Ordering::SeqCst);
                        sender.send_replace(UploadProgress {
                            phase: UploadPhase::Transferring,
                            percent: plan.percent(index, loaded),
                            current_file: Some(name.clone()),
                        });
                    },
                )
                .await
        };

        let confirm_request = ConfirmUploadRequest {
            file_type: job.file_type,
            storage_path: ticket.storage_path,
            file_name: file_name.clone(),
            file_size,
            mime_type: job.mime_type,
        };

        if let Err(e) = transfer_result {
            // A transport failure after the bytes visibly all went out is
            // ambiguous in the same way a lost confirm response is.
            let fully_transferred = transferred.load(Ordering::SeqCst) >= file_size;
            if e.is_ambiguous_transport() && fully_transferred {
                return self
                    .reconcile(short_id, index, plan, &confirm_request, e)
                    .await;
            }
            return Err(self.fail(e));
        }

        self.set_progress(
            UploadPhase::Confirming,
            plan.file_end_percent(index),
            Some(file_name.clone()),
        );
        match self.api.confirm_upload(short_id, confirm_request.clone()).await {
            Ok(file) => Ok(file),
            Err(e) if e.is_ambiguous_transport() => {
                self.reconcile(short_id, index, plan, &confirm_request, e)
                    .await
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// The confirm outcome is unknown: the server may have created the File
    /// row even though the client never saw the response. One verification
    /// read decides; only if the row is absent does the original error
    /// surface.
    async fn reconcile(
        &self,
        short_id: i64,
        index: usize,
        plan: &BatchPlan,
        request: &ConfirmUploadRequest,
        original: AppError,
    ) -> Result<ShortFile> {
        self.set_progress(
            UploadPhase::Ambiguous,
            plan.file_end_percent(index),
            Some(request.file_name.clone()),
        );
        tracing::warn!(
            "Upload confirm outcome unknown for {} on short {}, verifying",
            request.file_name,
            short_id
        );

        let short = match self.api.get_short(short_id).await {
            Ok(short) => short,
            Err(verify_err) => {
                tracing::warn!("Verification read failed: {}", verify_err);
                return Err(self.fail(original));
            }
        };

        match find_confirmed_file(&short, request) {
            Some(file) => {
                tracing::info!(
                    "Confirm for {} had succeeded server-side despite the transport failure",
                    request.file_name
                );
                Ok(file)
            }
            None => Err(self.fail(original)),
        }
    }

    fn validate_job(&self, job: &UploadJob) -> Result<()> {
        job.reserve_request()
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if !FILE_NAME_REGEX.is_match(&job.file_name) {
            return Err(AppError::Validation(format!(
                "File name '{}' contains unsupported characters",
                job.file_name
            )));
        }
        if job.data.len() as u64 > self.config.max_file_size {
            return Err(AppError::Validation(format!(
                "File '{}' exceeds the maximum upload size",
                job.file_name
            )));
        }
        Ok(())
    }

    fn set_progress(&self, phase: UploadPhase, percent: u8, current_file: Option<String>) {
        self.progress.send_replace(UploadProgress {
            phase,
            percent,
            current_file,
        });
    }

    fn fail(&self, err: AppError) -> AppError {
        let percent = self.progress.borrow().percent;
        self.progress.send_replace(UploadProgress {
            phase: UploadPhase::Failed(err.to_string()),
            percent,
            current_file: None,
        });
        tracing::error!("Upload failed: {}", err);
        err
    }
}

/// The File row matching a confirm request, if the server created it.
fn find_confirmed_file(short: &Short, request: &ConfirmUploadRequest) -> Option<ShortFile> {
    short
        .files
        .iter()
        .find(|f| {
            f.file_type == request.file_type
                && f.file_name == request.file_name
                && f.file_size == request.file_size
        })
        .cloned()
}
