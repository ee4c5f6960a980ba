use std::collections::BTreeSet;

use crate::features::board::models::{ColumnType, Short};

/// Drag-and-drop transition rules for the pipeline.
///
/// The pipeline is linear; a card can always step one column backward. The
/// forward step and the two-column skips are gated:
/// - entering a "changes" column (`clip_changes`, `editing_changes`) from
///   its production column is an admin-only escalation,
/// - entering `editing` requires `clips_completed_at`, from either `clips`
///   (skipping `clip_changes`) or `clip_changes`,
/// - entering `ready_to_upload` requires `editing_completed_at`, from either
///   `editing` (skipping `editing_changes`) or `editing_changes`,
/// - `ready_to_upload` → `uploaded` is always available; publishing is a
///   manual action with no completion gate.
///
/// An invalid drop is rejected silently: the board reverts the card and no
/// request is sent. No error surfaces for this case.
pub struct TransitionService;

impl TransitionService {
    /// Columns the short may legally move to from `current`.
    pub fn valid_targets(current: ColumnType, is_admin: bool, short: &Short) -> BTreeSet<ColumnType> {
        let mut targets = BTreeSet::new();

        // One step backward is always allowed.
        if let Some(prev) = current.order().checked_sub(1).and_then(ColumnType::from_order) {
            targets.insert(prev);
        }

        let clips_done = short.clips_completed_at.is_some();
        let editing_done = short.editing_completed_at.is_some();

        match current {
            ColumnType::Idea => {
                targets.insert(ColumnType::Script);
            }
            ColumnType::Script => {
                targets.insert(ColumnType::Clips);
            }
            ColumnType::Clips => {
                if is_admin {
                    targets.insert(ColumnType::ClipChanges);
                }
                if clips_done {
                    targets.insert(ColumnType::Editing);
                }
            }
            ColumnType::ClipChanges => {
                if clips_done {
                    targets.insert(ColumnType::Editing);
                }
            }
            ColumnType::Editing => {
                if is_admin {
                    targets.insert(ColumnType::EditingChanges);
                }
                if editing_done {
                    targets.insert(ColumnType::ReadyToUpload);
                }
            }
            ColumnType::EditingChanges => {
                if editing_done {
                    targets.insert(ColumnType::ReadyToUpload);
                }
            }
            ColumnType::ReadyToUpload => {
                targets.insert(ColumnType::Uploaded);
            }
            ColumnType::Uploaded => {}
        }

        targets
    }

    /// Whether a single move is legal.
    pub fn can_move(current: ColumnType, target: ColumnType, is_admin: bool, short: &Short) -> bool {
        Self::valid_targets(current, is_admin, short).contains(&target)
    }
}
