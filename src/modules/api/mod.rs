//! Board REST API seam.
//!
//! [`BoardApi`] abstracts every server call the board engine makes, so the
//! upload coordinator and the sync scheduler can be tested against an
//! in-memory fake. [`HttpBoardApi`] is the reqwest implementation.

mod client;

pub use client::{AssignmentScope, BoardApi, HttpBoardApi};
