use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::board::dtos::AssignmentRequest;
use crate::features::board::models::{AssignmentRole, ColumnType, Short, User};
use crate::features::board::services::{
    CompletionStage, PermissionService, SyncHandle, TransitionService,
};
use crate::features::board::state::{reduce, BoardAction, ModalKind, SharedBoardState};
use crate::modules::api::BoardApi;

/// Controller tying user actions to the API and the shared board state.
///
/// Every mutation follows the same shape: check locally, persist through
/// [`BoardApi`], mirror the change into the reducer, then ask the sync
/// scheduler for a fresh snapshot so the board converges on server truth.
pub struct BoardService<A: BoardApi> {
    api: Arc<A>,
    state: SharedBoardState,
    sync: SyncHandle,
}

impl<A: BoardApi> BoardService<A> {
    pub fn new(api: Arc<A>, state: SharedBoardState, sync: SyncHandle) -> Self {
        Self { api, state, sync }
    }

    /// Handle a card drop.
    ///
    /// An illegal drop is not an error: the reducer leaves the state alone,
    /// nothing is persisted, and the caller simply re-renders the reverted
    /// card. Only legal moves reach the server.
    pub async fn move_card(&self, short_id: i64, target: ColumnType, actor: &User) -> Result<()> {
        let allowed = {
            let state = self.state.read().await;
            let short = state
                .short(short_id)
                .ok_or_else(|| AppError::NotFound(format!("Short {} not found", short_id)))?;
            TransitionService::can_move(short.column(), target, actor.is_admin(), short)
        };

        if !allowed {
            tracing::debug!("Dropped short {} on {} rejected", short_id, target);
            return Ok(());
        }

        self.api.update_status(short_id, target.status()).await?;
        self.dispatch(BoardAction::MoveRequested {
            short_id,
            target,
            is_admin: actor.is_admin(),
            at: Utc::now(),
        })
        .await;
        self.sync.reload_now();
        Ok(())
    }

    /// Whether the actor may open the content modal for this short.
    pub async fn can_edit(&self, short_id: i64, actor: &User) -> bool {
        let state = self.state.read().await;
        state
            .short(short_id)
            .map(|short| PermissionService::can_edit(short.column(), short, actor))
            .unwrap_or(false)
    }

    /// Assign (or re-assign) a role. The previous binding for the same
    /// (short, role) pair is replaced, never appended to.
    pub async fn replace_assignment(
        &self,
        short_id: i64,
        role: AssignmentRole,
        req: AssignmentRequest,
    ) -> Result<()> {
        req.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let assignment = self.api.replace_assignment(short_id, role, req).await?;
        self.dispatch(BoardAction::AssignmentReplaced(assignment)).await;
        self.sync.reload_now();
        Ok(())
    }

    pub async fn remove_assignment(&self, short_id: i64, role: AssignmentRole) -> Result<()> {
        self.api.delete_assignment(short_id, role).await?;
        self.dispatch(BoardAction::AssignmentRemoved { short_id, role })
            .await;
        self.sync.reload_now();
        Ok(())
    }

    /// Mark the clipping or editing stage complete, unlocking the forward
    /// transition out of the corresponding column.
    pub async fn mark_complete(&self, stage: CompletionStage, short_id: i64) -> Result<()> {
        {
            let state = self.state.read().await;
            let short = state
                .short(short_id)
                .ok_or_else(|| AppError::NotFound(format!("Short {} not found", short_id)))?;
            PermissionService::check_mark_complete(stage, short)?;
        }

        let at = Utc::now();
        match stage {
            CompletionStage::Clips => {
                self.api.mark_clips_complete(short_id).await?;
                self.dispatch(BoardAction::ClipsMarkedComplete { short_id, at })
                    .await;
            }
            CompletionStage::Editing => {
                self.api.mark_editing_complete(short_id).await?;
                self.dispatch(BoardAction::EditingMarkedComplete { short_id, at })
                    .await;
            }
        }
        self.sync.reload_now();
        Ok(())
    }

    /// Delete a file. Succeeds even when the row is already gone server-side.
    pub async fn delete_file(&self, file_id: i64) -> Result<()> {
        self.api.delete_file(file_id).await?;
        self.dispatch(BoardAction::FileDeleted { file_id }).await;
        self.sync.reload_now();
        Ok(())
    }

    pub async fn delete_short(&self, short_id: i64, actor: &User) -> Result<()> {
        if !actor.is_admin() {
            return Err(AppError::Permission(
                "Only admins can delete shorts".to_string(),
            ));
        }
        self.api.delete_short(short_id).await?;
        self.dispatch(BoardAction::ShortDeleted { short_id }).await;
        self.sync.reload_now();
        Ok(())
    }

    pub async fn open_modal(&self, kind: ModalKind) {
        self.dispatch(BoardAction::ModalOpened(kind)).await;
    }

    pub async fn close_modal(&self, kind: ModalKind) {
        self.dispatch(BoardAction::ModalClosed(kind)).await;
    }

    pub async fn select_short(&self, short_id: Option<i64>) {
        self.dispatch(BoardAction::ShortSelected(short_id)).await;
    }

    pub async fn short(&self, short_id: i64) -> Option<Short> {
        self.state.read().await.short(short_id).cloned()
    }

    async fn dispatch(&self, action: BoardAction) {
        let mut guard = self.state.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SyncConfig;
    use crate::features::board::models::{FileType, ShortStatus, UserRole};
    use crate::features::board::services::SyncService;
    use crate::features::board::state::BoardState;
    use crate::features::board::services::Viewer;
    use crate::shared::test_helpers::{
        assignment_for, file_of_type, short_in_column, user_with_role, with_clips_complete,
        FakeBoardApi,
    };
    use rust_decimal::Decimal;
    use tokio::sync::RwLock;

    fn controller(
        api: Arc<FakeBoardApi>,
        shorts: Vec<Short>,
    ) -> (BoardService<FakeBoardApi>, SharedBoardState) {
        let state: SharedBoardState = Arc::new(RwLock::new(BoardState {
            shorts,
            ..Default::default()
        }));
        // A scheduler that is never spawned still provides a reload handle.
        let sync = SyncService::new(
            api.clone(),
            state.clone(),
            Viewer { is_admin: true },
            SyncConfig::default(),
        )
        .handle();
        (BoardService::new(api, state.clone(), sync), state)
    }

    #[tokio::test]
    async fn test_legal_move_persists_and_mirrors() {
        let api = Arc::new(FakeBoardApi::default());
        let (service, state) = controller(api.clone(), vec![short_in_column(1, ColumnType::Idea)]);
        let writer = user_with_role(5, UserRole::ScriptWriter);

        service
            .move_card(1, ColumnType::Script, &writer)
            .await
            .unwrap();

        assert_eq!(
            *api.status_updates.lock().unwrap(),
            vec![(1, ShortStatus::Script)]
        );
        assert_eq!(state.read().await.short(1).unwrap().status, ShortStatus::Script);
    }

    #[tokio::test]
    async fn test_illegal_move_sends_nothing() {
        let api = Arc::new(FakeBoardApi::default());
        let (service, state) = controller(api.clone(), vec![short_in_column(1, ColumnType::Clips)]);
        let clipper = user_with_role(7, UserRole::Clipper);

        // Clips not marked complete, so editing is out of reach.
        service
            .move_card(1, ColumnType::Editing, &clipper)
            .await
            .unwrap();

        assert!(api.status_updates.lock().unwrap().is_empty());
        assert_eq!(state.read().await.short(1).unwrap().status, ShortStatus::Clips);
    }

    #[tokio::test]
    async fn test_fast_forward_skips_clip_changes_once_complete() {
        let api = Arc::new(FakeBoardApi::default());
        let (service, _) = controller(
            api.clone(),
            vec![with_clips_complete(short_in_column(1, ColumnType::Clips))],
        );
        let clipper = user_with_role(7, UserRole::Clipper);

        service
            .move_card(1, ColumnType::Editing, &clipper)
            .await
            .unwrap();

        assert_eq!(
            *api.status_updates.lock().unwrap(),
            vec![(1, ShortStatus::Editing)]
        );
    }

    #[tokio::test]
    async fn test_mark_complete_blocked_without_preconditions() {
        let api = Arc::new(FakeBoardApi::default());
        let (service, _) = controller(api.clone(), vec![short_in_column(1, ColumnType::Clips)]);

        let err = service
            .mark_complete(CompletionStage::Clips, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(api.clips_completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_complete_persists_and_stamps_state() {
        let mut short = short_in_column(1, ColumnType::Clips);
        short.files.push(file_of_type(1, 1, FileType::ClipsZip));
        let mut assignment =
            assignment_for(1, AssignmentRole::Clipper, user_with_role(7, UserRole::Clipper));
        assignment.rate = Some(Decimal::from(25));
        short.assignments.push(assignment);

        let api = Arc::new(FakeBoardApi::default());
        let (service, state) = controller(api.clone(), vec![short]);

        service.mark_complete(CompletionStage::Clips, 1).await.unwrap();

        assert_eq!(*api.clips_completed.lock().unwrap(), vec![1]);
        assert!(state.read().await.short(1).unwrap().clips_completed_at.is_some());
    }

    #[tokio::test]
    async fn test_replace_assignment_validates_then_replaces() {
        let api = Arc::new(FakeBoardApi::default());
        let (service, state) = controller(api.clone(), vec![short_in_column(1, ColumnType::Clips)]);

        let oversized = AssignmentRequest {
            user_id: 7,
            rate: None,
            rate_description: Some("x".repeat(300)),
            due_date: None,
        };
        let err = service
            .replace_assignment(1, AssignmentRole::Clipper, oversized)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let ok = AssignmentRequest {
            user_id: 7,
            rate: Some(Decimal::from(30)),
            rate_description: None,
            due_date: None,
        };
        service
            .replace_assignment(1, AssignmentRole::Clipper, ok)
            .await
            .unwrap();

        let snapshot = state.read().await;
        assert_eq!(snapshot.assignments.len(), 1);
        assert_eq!(snapshot.assignments[0].user.id, 7);
    }

    #[tokio::test]
    async fn test_delete_short_is_admin_only() {
        let api = Arc::new(FakeBoardApi::with_shorts(vec![short_in_column(
            1,
            ColumnType::Idea,
        )]));
        let (service, state) = controller(api.clone(), vec![short_in_column(1, ColumnType::Idea)]);

        let editor = user_with_role(9, UserRole::Editor);
        let err = service.delete_short(1, &editor).await.unwrap_err();
        assert!(matches!(err, AppError::Permission(_)));

        let admin = user_with_role(1, UserRole::Admin);
        service.delete_short(1, &admin).await.unwrap();
        assert!(state.read().await.shorts.is_empty());
        assert!(api.shorts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_can_edit_consults_assignment() {
        let mut short = short_in_column(1, ColumnType::Clips);
        short.assignments.push(assignment_for(
            1,
            AssignmentRole::Clipper,
            user_with_role(7, UserRole::Clipper),
        ));
        let api = Arc::new(FakeBoardApi::default());
        let (service, _) = controller(api, vec![short]);

        assert!(service.can_edit(1, &user_with_role(7, UserRole::Clipper)).await);
        assert!(!service.can_edit(1, &user_with_role(8, UserRole::Clipper)).await);
    }
}
