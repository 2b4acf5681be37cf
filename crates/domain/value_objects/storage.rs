/// Presigned display URLs stay valid for one hour.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;
pub const DEFAULT_BUCKET: &str = "project-images";

const ORIGINAL_PREFIX: &str = "original";
const PROCESSED_PREFIX: &str = "processed";

pub fn original_key(file_name: &str) -> String {
    format!("{ORIGINAL_PREFIX}/{file_name}")
}

pub fn processed_key(file_name: &str) -> String {
    format!("{PROCESSED_PREFIX}/{file_name}")
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub size_bytes: i64,
}

/// Classified storage failure, carried inside `anyhow::Error`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    /// Message shown to the uploader for a failed upload.
    pub fn upload_message(&self) -> String {
        match self {
            StorageError::NotFound(_) => format!(
                "Storage bucket not found. Please ensure \"{DEFAULT_BUCKET}\" bucket exists."
            ),
            StorageError::PermissionDenied(_) => {
                "Upload permission denied. Please check your storage policies.".to_string()
            }
            other => format!("Upload failed: {other}"),
        }
    }
}
