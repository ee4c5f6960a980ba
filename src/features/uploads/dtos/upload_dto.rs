use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::board::models::FileType;

/// Step 1 request: ask the server for a signed upload target.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReserveUploadRequest {
    pub file_type: FileType,
    #[validate(length(min = 1, max = 256, message = "File name must be 1-256 characters"))]
    pub file_name: String,
    #[validate(range(min = 1, message = "File must not be empty"))]
    pub file_size: u64,
    #[validate(length(min = 1, message = "MIME type is required"))]
    pub mime_type: String,
}

/// Step 1 response: where to stream the bytes, and the storage path to
/// echo back in the confirm step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    pub upload_url: String,
    pub storage_path: String,
}

/// Step 3 request: the transfer finished, create the File record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmUploadRequest {
    pub file_type: FileType,
    pub storage_path: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_reserve_request_rejects_empty_file() {
        let req = ReserveUploadRequest {
            file_type: FileType::Script,
            file_name: "script.pdf".to_string(),
            file_size: 0,
            mime_type: "application/pdf".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reserve_request_rejects_empty_name() {
        let req = ReserveUploadRequest {
            file_type: FileType::Audio,
            file_name: String::new(),
            file_size: 1024,
            mime_type: "audio/mpeg".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reserve_request_accepts_valid_input() {
        let req = ReserveUploadRequest {
            file_type: FileType::ClipsZip,
            file_name: "clips.zip".to_string(),
            file_size: 50 * 1024 * 1024,
            mime_type: "application/zip".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
