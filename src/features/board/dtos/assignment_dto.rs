use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for creating (replacing) an assignment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignmentRequest {
    pub user_id: i64,
    /// Payment rate for the role. Must be set (and positive) before the
    /// stage can be marked complete.
    pub rate: Option<Decimal>,
    #[validate(length(max = 256, message = "Rate description must not exceed 256 characters"))]
    pub rate_description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}
