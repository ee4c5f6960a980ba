use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::features::board::models::User;

/// Role a user can be bound to a short for. Script writing is not an
/// assignment role; the script writer is stored directly on the short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    Clipper,
    Editor,
}

impl std::fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentRole::Clipper => write!(f, "clipper"),
            AssignmentRole::Editor => write!(f, "editor"),
        }
    }
}

/// Binds one user to one short for exactly one role.
///
/// At most one active assignment exists per (short, role): creating a new
/// one removes the prior binding first (replace, never append). Completion
/// creates a payment record downstream, which is why `rate` must be set
/// before a stage can be marked complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub short_id: i64,
    pub user: User,
    pub role: AssignmentRole,
    pub rate: Option<Decimal>,
    pub rate_description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Whether this assignment carries a payable rate.
    pub fn has_positive_rate(&self) -> bool {
        self.rate.map(|r| r > Decimal::ZERO).unwrap_or(false)
    }
}
