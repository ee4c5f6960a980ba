use serde::{Deserialize, Serialize};

use crate::features::board::models::ShortStatus;

/// Visual board column a short belongs to, derived from its persisted status.
///
/// Columns carry a strict total order used for adjacency checks when a card
/// is dragged. Not persisted; writes go back through [`ColumnType::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Idea,
    Script,
    Clips,
    ClipChanges,
    Editing,
    EditingChanges,
    ReadyToUpload,
    Uploaded,
}

impl ColumnType {
    /// All columns in pipeline order.
    pub const ALL: [ColumnType; 8] = [
        ColumnType::Idea,
        ColumnType::Script,
        ColumnType::Clips,
        ColumnType::ClipChanges,
        ColumnType::Editing,
        ColumnType::EditingChanges,
        ColumnType::ReadyToUpload,
        ColumnType::Uploaded,
    ];

    /// Position of this column in the linear pipeline (0..7).
    pub fn order(&self) -> u8 {
        match self {
            ColumnType::Idea => 0,
            ColumnType::Script => 1,
            ColumnType::Clips => 2,
            ColumnType::ClipChanges => 3,
            ColumnType::Editing => 4,
            ColumnType::EditingChanges => 5,
            ColumnType::ReadyToUpload => 6,
            ColumnType::Uploaded => 7,
        }
    }

    /// Look up a column by its pipeline position.
    pub fn from_order(order: u8) -> Option<ColumnType> {
        ColumnType::ALL.get(order as usize).copied()
    }

    /// Map a persisted status to its column. Total: legacy statuses fold
    /// into their canonical column, anything unrecognized lands in `Idea`
    /// (handled upstream by the tolerant status parser).
    pub fn from_status(status: ShortStatus) -> ColumnType {
        match status {
            ShortStatus::Idea => ColumnType::Idea,
            ShortStatus::Script => ColumnType::Script,
            ShortStatus::Clipping | ShortStatus::Clips => ColumnType::Clips,
            ShortStatus::ClipChanges => ColumnType::ClipChanges,
            ShortStatus::Editing => ColumnType::Editing,
            ShortStatus::EditingChanges => ColumnType::EditingChanges,
            ShortStatus::Completed | ShortStatus::ReadyToUpload => ColumnType::ReadyToUpload,
            ShortStatus::Uploaded => ColumnType::Uploaded,
        }
    }

    /// Canonical status written back when a card lands in this column.
    /// Left-inverse of [`ColumnType::from_status`] over the column set.
    pub fn status(&self) -> ShortStatus {
        match self {
            ColumnType::Idea => ShortStatus::Idea,
            ColumnType::Script => ShortStatus::Script,
            ColumnType::Clips => ShortStatus::Clips,
            ColumnType::ClipChanges => ShortStatus::ClipChanges,
            ColumnType::Editing => ShortStatus::Editing,
            ColumnType::EditingChanges => ShortStatus::EditingChanges,
            ColumnType::ReadyToUpload => ShortStatus::ReadyToUpload,
            ColumnType::Uploaded => ShortStatus::Uploaded,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Idea => write!(f, "idea"),
            ColumnType::Script => write!(f, "script"),
            ColumnType::Clips => write!(f, "clips"),
            ColumnType::ClipChanges => write!(f, "clip_changes"),
            ColumnType::Editing => write!(f, "editing"),
            ColumnType::EditingChanges => write!(f, "editing_changes"),
            ColumnType::ReadyToUpload => write!(f, "ready_to_upload"),
            ColumnType::Uploaded => write!(f, "uploaded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_strict_and_total() {
        for (i, column) in ColumnType::ALL.iter().enumerate() {
            assert_eq!(column.order() as usize, i);
            assert_eq!(ColumnType::from_order(i as u8), Some(*column));
        }
        assert_eq!(ColumnType::from_order(8), None);
    }

    #[test]
    fn test_status_round_trips_for_every_column() {
        for column in ColumnType::ALL {
            assert_eq!(ColumnType::from_status(column.status()), column);
        }
    }

    #[test]
    fn test_from_status_is_stable_under_second_application() {
        for status in ShortStatus::ALL {
            let once = ColumnType::from_status(status);
            let twice = ColumnType::from_status(once.status());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_legacy_statuses_fold_into_canonical_columns() {
        assert_eq!(
            ColumnType::from_status(ShortStatus::Clipping),
            ColumnType::Clips
        );
        assert_eq!(
            ColumnType::from_status(ShortStatus::Completed),
            ColumnType::ReadyToUpload
        );
    }

    #[test]
    fn test_unknown_status_defaults_to_idea() {
        let status = ShortStatus::from("archived_2022".to_string());
        assert_eq!(ColumnType::from_status(status), ColumnType::Idea);
    }
}
