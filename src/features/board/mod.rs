//! The kanban board: pipeline model, transition rules, permissions,
//! reducer-style state, and the background refresh scheduler.

pub mod dtos;
pub mod models;
pub mod services;
pub mod state;

pub use models::{
    Assignment, AssignmentRole, ColumnType, FileType, Short, ShortFile, ShortStatus, User, UserRole,
};
pub use services::{
    BoardService, CompletionStage, PermissionService, SyncHandle, SyncService, TransitionService,
    Viewer,
};
pub use state::{reduce, BoardAction, BoardState, ModalKind, SharedBoardState};
