// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Administrator role - full access to every board action
#[allow(dead_code)]
pub const ROLE_ADMIN: &str = "admin";

/// Script writer role - owns the script stage of assigned shorts
#[allow(dead_code)]
pub const ROLE_SCRIPT_WRITER: &str = "script_writer";

/// Clipper role - owns the clips / clip changes stages of assigned shorts
#[allow(dead_code)]
pub const ROLE_CLIPPER: &str = "clipper";

/// Editor role - owns the editing / editing changes stages of assigned shorts
#[allow(dead_code)]
pub const ROLE_EDITOR: &str = "editor";

// =============================================================================
// TRANSFER CONSTANTS
// =============================================================================

/// Chunk size for streamed byte transfers (upload and download)
pub const TRANSFER_CHUNK_SIZE: usize = 64 * 1024;
