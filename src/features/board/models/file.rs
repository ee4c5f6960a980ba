use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of artifact a file represents. One file of each type per short;
/// re-uploading replaces the previous file of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Script,
    Audio,
    ClipsZip,
    FinalVideo,
    ProfilePicture,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Script => "script",
            FileType::Audio => "audio",
            FileType::ClipsZip => "clips_zip",
            FileType::FinalVideo => "final_video",
            FileType::ProfilePicture => "profile_picture",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An uploaded artifact attached to a short.
///
/// Created only through the reserve-transfer-confirm protocol, never
/// mutated in place. `download_url` is time-limited and may be absent when
/// server-side signing failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortFile {
    pub id: i64,
    pub short_id: i64,
    pub file_type: FileType,
    pub file_name: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub download_url: Option<String>,
    pub storage_path: String,
}
