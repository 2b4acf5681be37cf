use serde::{Deserialize, Serialize};

use crate::domain::value_objects::uploads::sanitize_name;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadImagesModel {
    pub project_id: Option<String>,
}

/// `<sanitized project name>_images`
pub fn archive_folder(project_name: &str) -> String {
    format!("{}_images", sanitize_name(project_name))
}

/// `position` is the 1-based index within the qualifying images.
pub fn archive_entry_name(folder: &str, position: usize) -> String {
    format!("{folder}/image_{position:02}.jpg")
}

pub fn archive_file_name(folder: &str) -> String {
    format!("{folder}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_names_follow_project_name() {
        let folder = archive_folder("Villa Rosa");
        assert_eq!(folder, "Villa_Rosa_images");
        assert_eq!(archive_entry_name(&folder, 1), "Villa_Rosa_images/image_01.jpg");
        assert_eq!(archive_file_name(&folder), "Villa_Rosa_images.zip");
    }
}
