//! Client-side engine for the short-form video production board.
//!
//! Tracks shorts through the production pipeline (idea → script → clips →
//! clip changes → editing → editing changes → ready to upload → uploaded)
//! and coordinates role-scoped file handoffs between script writers,
//! clippers, editors, and administrators.
//!
//! The crate owns the pipeline state machine, the drag-and-drop transition
//! rules, the permission gate for content editing, the two-phase upload
//! protocol (reserve a signed target, stream bytes to storage, confirm),
//! the background board-refresh scheduler, and the streamed download path.
//! Persistence and URL signing live server-side and are reached through
//! the [`modules::api::BoardApi`] seam.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use crate::core::config::Config;
pub use crate::core::error::{AppError, Result};
