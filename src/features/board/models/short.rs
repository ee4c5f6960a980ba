use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::board::models::{Assignment, AssignmentRole, ColumnType, FileType, ShortFile, User};

/// Persisted pipeline status of a short.
///
/// `Clipping` and `Completed` are legacy aliases still present in old rows;
/// they are accepted on read and mapped to the `clips` / `ready_to_upload`
/// columns, but status writes always use the canonical value for the target
/// column. Unrecognized strings parse as `Idea`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ShortStatus {
    Idea,
    Script,
    Clipping,
    Clips,
    ClipChanges,
    Editing,
    EditingChanges,
    Completed,
    ReadyToUpload,
    Uploaded,
}

impl ShortStatus {
    /// All defined statuses, legacy aliases included.
    pub const ALL: [ShortStatus; 10] = [
        ShortStatus::Idea,
        ShortStatus::Script,
        ShortStatus::Clipping,
        ShortStatus::Clips,
        ShortStatus::ClipChanges,
        ShortStatus::Editing,
        ShortStatus::EditingChanges,
        ShortStatus::Completed,
        ShortStatus::ReadyToUpload,
        ShortStatus::Uploaded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShortStatus::Idea => "idea",
            ShortStatus::Script => "script",
            ShortStatus::Clipping => "clipping",
            ShortStatus::Clips => "clips",
            ShortStatus::ClipChanges => "clip_changes",
            ShortStatus::Editing => "editing",
            ShortStatus::EditingChanges => "editing_changes",
            ShortStatus::Completed => "completed",
            ShortStatus::ReadyToUpload => "ready_to_upload",
            ShortStatus::Uploaded => "uploaded",
        }
    }
}

impl From<String> for ShortStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "idea" => ShortStatus::Idea,
            "script" => ShortStatus::Script,
            "clipping" => ShortStatus::Clipping,
            "clips" => ShortStatus::Clips,
            "clip_changes" => ShortStatus::ClipChanges,
            "editing" => ShortStatus::Editing,
            "editing_changes" => ShortStatus::EditingChanges,
            "completed" => ShortStatus::Completed,
            "ready_to_upload" => ShortStatus::ReadyToUpload,
            "uploaded" => ShortStatus::Uploaded,
            other => {
                tracing::warn!("Unknown short status '{}', treating as idea", other);
                ShortStatus::Idea
            }
        }
    }
}

impl std::fmt::Display for ShortStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of production work: one short-form video moving through the
/// pipeline. Owns its assignments and files; users are referenced only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Short {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: ShortStatus,
    pub script_writer: Option<User>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub files: Vec<ShortFile>,
    pub clips_completed_at: Option<DateTime<Utc>>,
    pub editing_completed_at: Option<DateTime<Utc>>,
    pub entered_clip_changes_at: Option<DateTime<Utc>>,
    pub entered_editing_changes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Short {
    /// The board column this short currently renders in.
    pub fn column(&self) -> ColumnType {
        ColumnType::from_status(self.status)
    }

    /// The uploaded file of the given type, if present.
    pub fn file_of_type(&self, file_type: FileType) -> Option<&ShortFile> {
        self.files.iter().find(|f| f.file_type == file_type)
    }

    /// The active assignment for the given role. At most one exists per
    /// (short, role); assignment creation replaces any prior binding.
    pub fn active_assignment(&self, role: AssignmentRole) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.role == role)
    }
}
