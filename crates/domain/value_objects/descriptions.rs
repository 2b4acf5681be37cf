use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionModel {
    pub project_name: Option<String>,
    pub address: Option<String>,
    pub global_instructions: Option<String>,
    pub image_count: Option<u32>,
}
