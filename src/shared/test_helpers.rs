#[cfg(test)]
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use fake::faker::name::en::Name;
#[cfg(test)]
use fake::Fake;
#[cfg(test)]
use tokio::sync::Notify;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::board::dtos::AssignmentRequest;
#[cfg(test)]
use crate::features::board::models::{
    Assignment, AssignmentRole, ColumnType, FileType, Short, ShortFile, ShortStatus, User, UserRole,
};
#[cfg(test)]
use crate::features::uploads::dtos::{ConfirmUploadRequest, ReserveUploadRequest, UploadTicket};
#[cfg(test)]
use crate::modules::api::{AssignmentScope, BoardApi};

#[cfg(test)]
pub fn user_with_role(id: i64, role: UserRole) -> User {
    User {
        id,
        name: Name().fake(),
        role,
    }
}

#[cfg(test)]
pub fn short_in_column(id: i64, column: ColumnType) -> Short {
    Short {
        id,
        title: format!("Short {}", id),
        description: None,
        status: column.status(),
        script_writer: None,
        assignments: Vec::new(),
        files: Vec::new(),
        clips_completed_at: None,
        editing_completed_at: None,
        entered_clip_changes_at: None,
        entered_editing_changes_at: None,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
pub fn with_clips_complete(mut short: Short) -> Short {
    short.clips_completed_at = Some(Utc::now());
    short
}

#[cfg(test)]
pub fn with_editing_complete(mut short: Short) -> Short {
    short.editing_completed_at = Some(Utc::now());
    short
}

#[cfg(test)]
pub fn file_of_type(id: i64, short_id: i64, file_type: FileType) -> ShortFile {
    ShortFile {
        id,
        short_id,
        file_type,
        file_name: format!("{}-{}.bin", file_type, id),
        file_size: 1024,
        uploaded_at: Utc::now(),
        download_url: Some(format!("https://storage.test/{}/{}", short_id, id)),
        storage_path: format!("shorts/{}/{}", short_id, id),
    }
}

#[cfg(test)]
pub fn assignment_for(short_id: i64, role: AssignmentRole, user: User) -> Assignment {
    Assignment {
        short_id,
        user,
        role,
        rate: None,
        rate_description: None,
        due_date: None,
        completed_at: None,
    }
}

/// What the fake API does when an upload is confirmed.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmBehavior {
    #[default]
    Succeed,
    /// The confirm response is lost and the server never created the row.
    NetworkError,
    /// The confirm response is lost but the server did create the row;
    /// the coordinator's reconciling read should find it.
    NetworkErrorButPersisted,
}

/// In-memory [`BoardApi`] for exercising the coordinator and scheduler
/// without a server.
#[cfg(test)]
#[derive(Default)]
pub struct FakeBoardApi {
    pub shorts: Mutex<Vec<Short>>,
    pub upload_url: Mutex<String>,
    pub confirm_behavior: Mutex<ConfirmBehavior>,
    pub list_short_calls: AtomicUsize,
    pub confirmed: Mutex<Vec<ConfirmUploadRequest>>,
    pub status_updates: Mutex<Vec<(i64, ShortStatus)>>,
    pub deleted_files: Mutex<Vec<i64>>,
    pub clips_completed: Mutex<Vec<i64>>,
    pub next_file_id: AtomicI64,
    /// When set, `reserve_upload` blocks until notified.
    pub reserve_gate: Mutex<Option<Arc<Notify>>>,
}

#[cfg(test)]
impl FakeBoardApi {
    pub fn with_shorts(shorts: Vec<Short>) -> Self {
        let api = Self {
            next_file_id: AtomicI64::new(100),
            ..Default::default()
        };
        *api.shorts.lock().unwrap() = shorts;
        api
    }

    fn persist_file(&self, short_id: i64, req: &ConfirmUploadRequest) -> ShortFile {
        let file = ShortFile {
            id: self.next_file_id.fetch_add(1, Ordering::SeqCst),
            short_id,
            file_type: req.file_type,
            file_name: req.file_name.clone(),
            file_size: req.file_size,
            uploaded_at: Utc::now(),
            download_url: None,
            storage_path: req.storage_path.clone(),
        };
        let mut shorts = self.shorts.lock().unwrap();
        if let Some(short) = shorts.iter_mut().find(|s| s.id == short_id) {
            short.files.retain(|f| f.file_type != file.file_type);
            short.files.push(file.clone());
        }
        file
    }
}

#[cfg(test)]
#[async_trait]
impl BoardApi for FakeBoardApi {
    async fn list_shorts(&self, _assigned_only: bool) -> Result<Vec<Short>> {
        self.list_short_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.shorts.lock().unwrap().clone())
    }

    async fn get_short(&self, short_id: i64) -> Result<Short> {
        self.shorts
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == short_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Short {} not found", short_id)))
    }

    async fn update_status(&self, short_id: i64, status: ShortStatus) -> Result<()> {
        self.status_updates.lock().unwrap().push((short_id, status));
        if let Some(short) = self
            .shorts
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == short_id)
        {
            short.status = status;
        }
        Ok(())
    }

    async fn list_assignments(&self, _scope: AssignmentScope) -> Result<Vec<Assignment>> {
        Ok(Vec::new())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(Vec::new())
    }

    async fn replace_assignment(
        &self,
        short_id: i64,
        role: AssignmentRole,
        req: AssignmentRequest,
    ) -> Result<Assignment> {
        let user_role = match role {
            AssignmentRole::Clipper => UserRole::Clipper,
            AssignmentRole::Editor => UserRole::Editor,
        };
        let mut assignment = assignment_for(short_id, role, user_with_role(req.user_id, user_role));
        assignment.rate = req.rate;
        assignment.rate_description = req.rate_description;
        assignment.due_date = req.due_date;
        Ok(assignment)
    }

    async fn delete_assignment(&self, _short_id: i64, _role: AssignmentRole) -> Result<()> {
        Ok(())
    }

    async fn mark_clips_complete(&self, short_id: i64) -> Result<()> {
        self.clips_completed.lock().unwrap().push(short_id);
        if let Some(short) = self
            .shorts
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == short_id)
        {
            short.clips_completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_editing_complete(&self, short_id: i64) -> Result<()> {
        if let Some(short) = self
            .shorts
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == short_id)
        {
            short.editing_completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn reserve_upload(&self, short_id: i64, req: ReserveUploadRequest) -> Result<UploadTicket> {
        let gate = self.reserve_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(UploadTicket {
            upload_url: self.upload_url.lock().unwrap().clone(),
            storage_path: format!("shorts/{}/{}/{}", short_id, req.file_type, req.file_name),
        })
    }

    async fn confirm_upload(&self, short_id: i64, req: ConfirmUploadRequest) -> Result<ShortFile> {
        let behavior = *self.confirm_behavior.lock().unwrap();
        match behavior {
            ConfirmBehavior::Succeed => {
                let file = self.persist_file(short_id, &req);
                self.confirmed.lock().unwrap().push(req);
                Ok(file)
            }
            ConfirmBehavior::NetworkError => {
                Err(AppError::Network("connection reset before response".to_string()))
            }
            ConfirmBehavior::NetworkErrorButPersisted => {
                self.persist_file(short_id, &req);
                Err(AppError::Network("connection reset before response".to_string()))
            }
        }
    }

    async fn delete_file(&self, file_id: i64) -> Result<()> {
        self.deleted_files.lock().unwrap().push(file_id);
        for short in self.shorts.lock().unwrap().iter_mut() {
            short.files.retain(|f| f.id != file_id);
        }
        Ok(())
    }

    async fn delete_short(&self, short_id: i64) -> Result<()> {
        self.shorts.lock().unwrap().retain(|s| s.id != short_id);
        Ok(())
    }
}
