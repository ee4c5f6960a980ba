mod assignment;
mod column;
mod file;
mod short;
mod user;

pub use assignment::{Assignment, AssignmentRole};
pub use column::ColumnType;
pub use file::{FileType, ShortFile};
pub use short::{Short, ShortStatus};
pub use user::{User, UserRole};
