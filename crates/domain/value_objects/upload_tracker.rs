use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Completed rows stay visible this long before they start fading.
pub const COMPLETED_VISIBLE_MS: u64 = 2000;
/// Fade duration before a completed row is dropped.
pub const FADE_OUT_MS: u64 = 500;
/// Failed rows are dropped after this long if no new batch has replaced them.
pub const ERROR_RETENTION_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadStatus {
    Queued,
    Uploading { progress: u8 },
    Completed,
    Error { message: String },
}

impl UploadStatus {
    pub fn progress(&self) -> u8 {
        match self {
            UploadStatus::Queued | UploadStatus::Error { .. } => 0,
            UploadStatus::Uploading { progress } => *progress,
            UploadStatus::Completed => 100,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadEntry {
    pub id: Uuid,
    pub file_name: String,
    pub stored_name: String,
    pub status: UploadStatus,
    pub progress: u8,
    pub fading: bool,
}

impl UploadEntry {
    pub fn queued(file_name: String, stored_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            stored_name,
            status: UploadStatus::Queued,
            progress: 0,
            fading: false,
        }
    }

    pub fn set_status(&mut self, status: UploadStatus) {
        self.progress = status.progress();
        self.status = status;
    }
}
