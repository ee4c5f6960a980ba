//! Board state held by a single controller, with all mutations expressed as
//! pure reducer transitions so transition and permission rules can be unit
//! tested without any rendering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::features::board::models::{
    Assignment, AssignmentRole, ColumnType, Short, ShortFile, User,
};
use crate::features::board::services::TransitionService;

/// Handle shared between the controller, the upload coordinator, and the
/// background sync scheduler.
pub type SharedBoardState = Arc<RwLock<BoardState>>;

/// Which modal is currently open. Any open modal suspends background sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Create,
    Content,
}

/// The full dashboard state: board data plus the transient flags the sync
/// scheduler reads its guard snapshot from.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub shorts: Vec<Short>,
    pub assignments: Vec<Assignment>,
    pub users: Vec<User>,
    pub create_modal_open: bool,
    pub content_modal_open: bool,
    pub loading: bool,
    pub selected_short_id: Option<i64>,
}

impl BoardState {
    /// Guard snapshot for the sync scheduler: polling is suspended while any
    /// modal is open (to avoid clobbering in-progress form state) or while a
    /// load is already in flight (to avoid overlapping requests).
    pub fn sync_may_run(&self) -> bool {
        !self.create_modal_open && !self.content_modal_open && !self.loading
    }

    pub fn short(&self, short_id: i64) -> Option<&Short> {
        self.shorts.iter().find(|s| s.id == short_id)
    }
}

/// Every mutation of the board state.
#[derive(Debug, Clone)]
pub enum BoardAction {
    ShortsLoaded(Vec<Short>),
    AssignmentsLoaded(Vec<Assignment>),
    UsersLoaded(Vec<User>),
    LoadStarted,
    LoadFinished,
    ModalOpened(ModalKind),
    ModalClosed(ModalKind),
    ShortSelected(Option<i64>),
    /// A card was dropped on `target`. Illegal drops leave the state
    /// untouched: the board reverts the card and nothing is sent upstream.
    MoveRequested {
        short_id: i64,
        target: ColumnType,
        is_admin: bool,
        at: DateTime<Utc>,
    },
    /// An assignment was created; any prior binding for the same
    /// (short, role) pair is replaced, never appended to.
    AssignmentReplaced(Assignment),
    AssignmentRemoved {
        short_id: i64,
        role: AssignmentRole,
    },
    /// Upload confirm succeeded; a file of the same type replaces the old one.
    FileConfirmed(ShortFile),
    FileDeleted {
        file_id: i64,
    },
    ShortDeleted {
        short_id: i64,
    },
    ClipsMarkedComplete {
        short_id: i64,
        at: DateTime<Utc>,
    },
    EditingMarkedComplete {
        short_id: i64,
        at: DateTime<Utc>,
    },
}

/// Pure reducer: `(state, action) -> state`.
pub fn reduce(mut state: BoardState, action: BoardAction) -> BoardState {
    match action {
        BoardAction::ShortsLoaded(shorts) => state.shorts = shorts,
        BoardAction::AssignmentsLoaded(assignments) => state.assignments = assignments,
        BoardAction::UsersLoaded(users) => state.users = users,
        BoardAction::LoadStarted => state.loading = true,
        BoardAction::LoadFinished => state.loading = false,
        BoardAction::ModalOpened(kind) => match kind {
            ModalKind::Create => state.create_modal_open = true,
            ModalKind::Content => state.content_modal_open = true,
        },
        BoardAction::ModalClosed(kind) => match kind {
            ModalKind::Create => state.create_modal_open = false,
            ModalKind::Content => state.content_modal_open = false,
        },
        BoardAction::ShortSelected(short_id) => state.selected_short_id = short_id,
        BoardAction::MoveRequested {
            short_id,
            target,
            is_admin,
            at,
        } => {
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == short_id) {
                let current = short.column();
                if TransitionService::can_move(current, target, is_admin, short) {
                    short.status = target.status();
                    match target {
                        ColumnType::ClipChanges => short.entered_clip_changes_at = Some(at),
                        ColumnType::EditingChanges => short.entered_editing_changes_at = Some(at),
                        _ => {}
                    }
                } else {
                    // Silent rejection, by contract: no error for an invalid drop.
                    tracing::debug!(
                        "Rejected move of short {} from {} to {}",
                        short_id,
                        current,
                        target
                    );
                }
            }
        }
        BoardAction::AssignmentReplaced(assignment) => {
            let (short_id, role) = (assignment.short_id, assignment.role);
            state
                .assignments
                .retain(|a| !(a.short_id == short_id && a.role == role));
            state.assignments.push(assignment.clone());
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == short_id) {
                short
                    .assignments
                    .retain(|a| !(a.short_id == short_id && a.role == role));
                short.assignments.push(assignment);
            }
        }
        BoardAction::AssignmentRemoved { short_id, role } => {
            state
                .assignments
                .retain(|a| !(a.short_id == short_id && a.role == role));
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == short_id) {
                short
                    .assignments
                    .retain(|a| !(a.short_id == short_id && a.role == role));
            }
        }
        BoardAction::FileConfirmed(file) => {
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == file.short_id) {
                short.files.retain(|f| f.file_type != file.file_type);
                short.files.push(file);
            }
        }
        BoardAction::FileDeleted { file_id } => {
            for short in &mut state.shorts {
                short.files.retain(|f| f.id != file_id);
            }
        }
        BoardAction::ShortDeleted { short_id } => {
            state.shorts.retain(|s| s.id != short_id);
            state.assignments.retain(|a| a.short_id != short_id);
            if state.selected_short_id == Some(short_id) {
                state.selected_short_id = None;
            }
        }
        BoardAction::ClipsMarkedComplete { short_id, at } => {
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == short_id) {
                short.clips_completed_at = Some(at);
            }
        }
        BoardAction::EditingMarkedComplete { short_id, at } => {
            if let Some(short) = state.shorts.iter_mut().find(|s| s.id == short_id) {
                short.editing_completed_at = Some(at);
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::board::models::{ShortStatus, UserRole};
    use crate::shared::test_helpers::{
        assignment_for, file_of_type, short_in_column, user_with_role, with_clips_complete,
    };

    fn state_with(shorts: Vec<Short>) -> BoardState {
        BoardState {
            shorts,
            ..Default::default()
        }
    }

    #[test]
    fn test_legal_move_rewrites_status() {
        let state = state_with(vec![short_in_column(1, ColumnType::Idea)]);
        let state = reduce(
            state,
            BoardAction::MoveRequested {
                short_id: 1,
                target: ColumnType::Script,
                is_admin: false,
                at: Utc::now(),
            },
        );

        assert_eq!(state.short(1).unwrap().status, ShortStatus::Script);
    }

    #[test]
    fn test_illegal_move_is_a_silent_no_op() {
        let state = state_with(vec![short_in_column(1, ColumnType::Clips)]);
        let state = reduce(
            state,
            BoardAction::MoveRequested {
                short_id: 1,
                target: ColumnType::Editing, // clips not complete
                is_admin: false,
                at: Utc::now(),
            },
        );

        assert_eq!(state.short(1).unwrap().status, ShortStatus::Clips);
    }

    #[test]
    fn test_move_into_changes_column_stamps_entry_time() {
        let at = Utc::now();
        let state = state_with(vec![with_clips_complete(short_in_column(
            1,
            ColumnType::Clips,
        ))]);
        let state = reduce(
            state,
            BoardAction::MoveRequested {
                short_id: 1,
                target: ColumnType::ClipChanges,
                is_admin: true,
                at,
            },
        );

        let short = state.short(1).unwrap();
        assert_eq!(short.status, ShortStatus::ClipChanges);
        assert_eq!(short.entered_clip_changes_at, Some(at));
    }

    #[test]
    fn test_assignment_replace_never_appends() {
        let state = state_with(vec![short_in_column(1, ColumnType::Clips)]);
        let first = assignment_for(1, AssignmentRole::Clipper, user_with_role(7, UserRole::Clipper));
        let second =
            assignment_for(1, AssignmentRole::Clipper, user_with_role(8, UserRole::Clipper));

        let state = reduce(state, BoardAction::AssignmentReplaced(first));
        let state = reduce(state, BoardAction::AssignmentReplaced(second));

        let active: Vec<_> = state
            .assignments
            .iter()
            .filter(|a| a.short_id == 1 && a.role == AssignmentRole::Clipper)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].user.id, 8);
        assert_eq!(state.short(1).unwrap().assignments.len(), 1);
    }

    #[test]
    fn test_file_confirm_replaces_same_type() {
        let state = state_with(vec![short_in_column(1, ColumnType::Script)]);
        let old = file_of_type(10, 1, crate::features::board::models::FileType::Script);
        let new = file_of_type(11, 1, crate::features::board::models::FileType::Script);

        let state = reduce(state, BoardAction::FileConfirmed(old));
        let state = reduce(state, BoardAction::FileConfirmed(new));

        let files = &state.short(1).unwrap().files;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, 11);
    }

    #[test]
    fn test_sync_guard_snapshot() {
        let mut state = BoardState::default();
        assert!(state.sync_may_run());

        state = reduce(state, BoardAction::ModalOpened(ModalKind::Content));
        assert!(!state.sync_may_run());

        state = reduce(state, BoardAction::ModalClosed(ModalKind::Content));
        state = reduce(state, BoardAction::LoadStarted);
        assert!(!state.sync_may_run());

        state = reduce(state, BoardAction::LoadFinished);
        assert!(state.sync_may_run());
    }

    #[test]
    fn test_short_delete_cascades_locally() {
        let mut state = state_with(vec![short_in_column(1, ColumnType::Clips)]);
        state.selected_short_id = Some(1);
        state.assignments.push(assignment_for(
            1,
            AssignmentRole::Clipper,
            user_with_role(7, UserRole::Clipper),
        ));

        let state = reduce(state, BoardAction::ShortDeleted { short_id: 1 });
        assert!(state.shorts.is_empty());
        assert!(state.assignments.is_empty());
        assert_eq!(state.selected_short_id, None);
    }
}
