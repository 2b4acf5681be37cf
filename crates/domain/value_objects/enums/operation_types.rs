use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Kind of work handed to the external image/video worker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    InitialProcessing,
    Tweak,
    VideoGeneration,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::InitialProcessing => "initial_processing",
            OperationType::Tweak => "tweak",
            OperationType::VideoGeneration => "video_generation",
        }
    }
}

impl Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
