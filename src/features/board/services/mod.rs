mod board_service;
mod permission_service;
mod sync_service;
mod transition_service;

pub use board_service::BoardService;
pub use permission_service::{CompletionStage, PermissionService};
pub use sync_service::{SyncHandle, SyncService, Viewer};
pub use transition_service::TransitionService;
