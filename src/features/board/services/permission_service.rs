use crate::core::error::{AppError, Result};
use crate::features::board::models::{AssignmentRole, ColumnType, FileType, Short, User};

/// Pipeline stage that can be marked complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStage {
    Clips,
    Editing,
}

impl CompletionStage {
    fn role(&self) -> AssignmentRole {
        match self {
            CompletionStage::Clips => AssignmentRole::Clipper,
            CompletionStage::Editing => AssignmentRole::Editor,
        }
    }

    fn required_file(&self) -> FileType {
        match self {
            CompletionStage::Clips => FileType::ClipsZip,
            CompletionStage::Editing => FileType::FinalVideo,
        }
    }
}

/// Assignment- and authorship-based access rules for the content modals.
///
/// Actions an actor may not perform are not offered at all; this gate is
/// consulted before rendering an edit affordance, not after a click.
pub struct PermissionService;

impl PermissionService {
    /// Whether the actor may open the content modal for `column` on `short`.
    pub fn can_edit(column: ColumnType, short: &Short, actor: &User) -> bool {
        if actor.is_admin() {
            return true;
        }

        match column {
            ColumnType::Script => match &short.script_writer {
                Some(writer) => writer.id == actor.id,
                // Unclaimed script stage is open to anyone who writes scripts.
                None => actor.can_write_scripts(),
            },
            ColumnType::Clips | ColumnType::ClipChanges => short
                .active_assignment(AssignmentRole::Clipper)
                .map(|a| a.user.id == actor.id)
                .unwrap_or(false),
            ColumnType::Editing | ColumnType::EditingChanges => short
                .active_assignment(AssignmentRole::Editor)
                .map(|a| a.user.id == actor.id)
                .unwrap_or(false),
            // Remaining columns are view-only for non-admins.
            _ => false,
        }
    }

    /// Preconditions for marking a stage complete. Completion creates a
    /// payment record downstream, so the required artifact, an assignment,
    /// and a positive rate must all exist before the request is issued.
    pub fn check_mark_complete(stage: CompletionStage, short: &Short) -> Result<()> {
        let required = stage.required_file();
        if short.file_of_type(required).is_none() {
            return Err(AppError::Validation(match stage {
                CompletionStage::Clips => {
                    "Upload the clips archive before marking clipping complete".to_string()
                }
                CompletionStage::Editing => {
                    "Upload the final video before marking editing complete".to_string()
                }
            }));
        }

        let role = stage.role();
        let assignment = short.active_assignment(role).ok_or_else(|| {
            AppError::Validation(format!(
                "No {} is assigned to this short, assign one before marking complete",
                role
            ))
        })?;

        if !assignment.has_positive_rate() {
            return Err(AppError::Validation(format!(
                "Set a rate for the {} assignment first, completion creates a payment record",
                role
            )));
        }

        Ok(())
    }
}
