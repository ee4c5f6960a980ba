use serde::{Deserialize, Serialize};

/// Site-wide role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    ScriptWriter,
    Clipper,
    Editor,
}

/// A user account, referenced (never owned) by shorts and assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: UserRole,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this user can pick up an unassigned script stage.
    pub fn can_write_scripts(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::ScriptWriter)
    }
}
