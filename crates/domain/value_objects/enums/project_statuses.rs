use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Paid,
    Processing,
    Filming,
    Reviewing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Paid => "paid",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Filming => "filming",
            ProjectStatus::Reviewing => "reviewing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "draft" => ProjectStatus::Draft,
            "paid" => ProjectStatus::Paid,
            "processing" => ProjectStatus::Processing,
            "filming" => ProjectStatus::Filming,
            "reviewing" => ProjectStatus::Reviewing,
            "completed" => ProjectStatus::Completed,
            _ => ProjectStatus::Failed,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
