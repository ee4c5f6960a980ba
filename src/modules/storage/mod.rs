//! Direct-to-storage byte transfers.
//!
//! The application server hands out presigned URLs; this module only moves
//! bytes to and from them with progress reporting. No signing happens here.

mod object_transfer;

pub use object_transfer::ObjectTransfer;
