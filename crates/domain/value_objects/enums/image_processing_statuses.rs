use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImageProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageProcessingStatus::Pending => "pending",
            ImageProcessingStatus::Processing => "processing",
            ImageProcessingStatus::Completed => "completed",
            ImageProcessingStatus::Failed => "failed",
        }
    }
}

impl Display for ImageProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
