use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{
        image_processing_statuses::ImageProcessingStatus, packages::Package,
        project_statuses::ProjectStatus, video_statuses::VideoStatus,
    },
    projects::{ProjectDetailsModel, ProjectImageModel, ProjectModel},
};

/// Client-side cache of one project and its images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectView {
    pub project: ProjectModel,
    pub images: Vec<ProjectImageModel>,
}

impl From<ProjectDetailsModel> for ProjectView {
    fn from(value: ProjectDetailsModel) -> Self {
        Self {
            project: value.project,
            images: value.images,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectPatch {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_instructions: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_status: Option<VideoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_progress: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImagePatch {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_status: Option<ImageProcessingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweak_history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_prompt_used: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

fn changed<T: Clone + PartialEq>(old: &T, new: &T) -> Option<T> {
    (old != new).then(|| new.clone())
}

impl ProjectPatch {
    pub fn between(old: &ProjectModel, new: &ProjectModel) -> Option<Self> {
        let patch = Self {
            id: new.id,
            name: changed(&old.name, &new.name),
            address: changed(&old.address, &new.address),
            global_instructions: changed(&old.global_instructions, &new.global_instructions),
            ai_description: changed(&old.ai_description, &new.ai_description),
            status: changed(&old.status, &new.status),
            video_status: changed(&old.video_status, &new.video_status),
            video_url: changed(&old.video_url, &new.video_url),
            processing_progress: changed(&old.processing_progress, &new.processing_progress),
            package: changed(&old.package, &new.package),
            updated_at: changed(&old.updated_at, &new.updated_at),
        };

        (patch != Self { id: new.id, ..Default::default() }).then_some(patch)
    }

    fn merge_into(self, project: &mut ProjectModel) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(address) = self.address {
            project.address = address;
        }
        if let Some(global_instructions) = self.global_instructions {
            project.global_instructions = global_instructions;
        }
        if let Some(ai_description) = self.ai_description {
            project.ai_description = ai_description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(video_status) = self.video_status {
            project.video_status = video_status;
        }
        if let Some(video_url) = self.video_url {
            project.video_url = video_url;
        }
        if let Some(processing_progress) = self.processing_progress {
            project.processing_progress = processing_progress;
        }
        if let Some(package) = self.package {
            project.package = package;
        }
        if let Some(updated_at) = self.updated_at {
            project.updated_at = updated_at;
        }
    }
}

impl ImagePatch {
    pub fn between(old: &ProjectImageModel, new: &ProjectImageModel) -> Option<Self> {
        let patch = Self {
            id: new.id,
            processing_status: changed(&old.processing_status, &new.processing_status),
            processed_url: changed(&old.processed_url, &new.processed_url),
            aspect_ratio: changed(&old.aspect_ratio, &new.aspect_ratio),
            attempt_number: changed(&old.attempt_number, &new.attempt_number),
            tweak_history: changed(&old.tweak_history, &new.tweak_history),
            processed_at: changed(&old.processed_at, &new.processed_at),
            ai_prompt_used: changed(&old.ai_prompt_used, &new.ai_prompt_used),
            original_filename: changed(&old.original_filename, &new.original_filename),
        };

        (patch != Self { id: new.id, ..Default::default() }).then_some(patch)
    }

    fn merge_into(self, image: &mut ProjectImageModel) {
        if let Some(processing_status) = self.processing_status {
            image.processing_status = processing_status;
        }
        if let Some(processed_url) = self.processed_url {
            image.processed_url = processed_url;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            image.aspect_ratio = aspect_ratio;
        }
        if let Some(attempt_number) = self.attempt_number {
            image.attempt_number = attempt_number;
        }
        if let Some(tweak_history) = self.tweak_history {
            image.tweak_history = tweak_history;
        }
        if let Some(processed_at) = self.processed_at {
            image.processed_at = processed_at;
        }
        if let Some(ai_prompt_used) = self.ai_prompt_used {
            image.ai_prompt_used = ai_prompt_used;
        }
        if let Some(original_filename) = self.original_filename {
            image.original_filename = original_filename;
        }
    }
}

/// Result of comparing the cached view against a fresh read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewChanges {
    pub project: Option<ProjectPatch>,
    pub images: Vec<ImagePatch>,
    /// Images were added or removed; patches alone cannot express that.
    pub membership_changed: bool,
}

impl ViewChanges {
    pub fn is_empty(&self) -> bool {
        self.project.is_none() && self.images.is_empty() && !self.membership_changed
    }
}

impl ProjectView {
    /// Returns false when the patch targets another project.
    pub fn apply_project_patch(&mut self, patch: ProjectPatch) -> bool {
        if patch.id != self.project.id {
            return false;
        }
        patch.merge_into(&mut self.project);
        true
    }

    /// Returns false when no cached image has the patch's id.
    pub fn apply_image_patch(&mut self, patch: ImagePatch) -> bool {
        match self.images.iter_mut().find(|image| image.id == patch.id) {
            Some(image) => {
                patch.merge_into(image);
                true
            }
            None => false,
        }
    }

    pub fn diff(&self, fresh: &ProjectView) -> ViewChanges {
        let mut changes = ViewChanges {
            project: ProjectPatch::between(&self.project, &fresh.project),
            ..Default::default()
        };

        for image in &fresh.images {
            match self.images.iter().find(|cached| cached.id == image.id) {
                Some(cached) => changes.images.extend(ImagePatch::between(cached, image)),
                None => changes.membership_changed = true,
            }
        }
        if self.images.len() != fresh.images.len() {
            changes.membership_changed = true;
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: Uuid) -> ProjectModel {
        ProjectModel {
            id,
            user_id: Uuid::nil(),
            name: "Loft".into(),
            address: None,
            global_instructions: None,
            package: Package::Pro,
            status: ProjectStatus::Paid,
            ai_description: None,
            video_url: None,
            video_status: VideoStatus::Pending,
            processing_progress: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn image(id: Uuid, project_id: Uuid) -> ProjectImageModel {
        ProjectImageModel {
            id,
            project_id,
            original_filename: "Loft_01.jpg".into(),
            processed_url: None,
            aspect_ratio: None,
            attempt_number: 1,
            processing_status: ImageProcessingStatus::Pending,
            tweak_history: vec![String::new()],
            ai_prompt_used: None,
            processed_at: None,
            created_at: Utc::now(),
            display_url: None,
        }
    }

    #[test]
    fn image_patch_for_unknown_id_is_ignored() {
        let project_id = Uuid::new_v4();
        let mut view = ProjectView {
            project: project(project_id),
            images: vec![image(Uuid::new_v4(), project_id)],
        };
        let before = view.clone();

        let applied = view.apply_image_patch(ImagePatch {
            id: Uuid::new_v4(),
            processing_status: Some(ImageProcessingStatus::Completed),
            ..Default::default()
        });

        assert!(!applied);
        assert_eq!(view, before);
    }

    #[test]
    fn diff_produces_patches_that_reconcile_the_view() {
        let project_id = Uuid::new_v4();
        let image_id = Uuid::new_v4();
        let cached = ProjectView {
            project: project(project_id),
            images: vec![image(image_id, project_id)],
        };

        let mut fresh = cached.clone();
        fresh.project.status = ProjectStatus::Processing;
        fresh.images[0].processing_status = ImageProcessingStatus::Completed;
        fresh.images[0].processed_url = Some("Loft_01.jpg".into());

        let changes = cached.diff(&fresh);
        assert!(!changes.membership_changed);
        assert_eq!(changes.images.len(), 1);

        let mut view = cached.clone();
        assert!(view.apply_project_patch(changes.project.unwrap()));
        for patch in changes.images {
            assert!(view.apply_image_patch(patch));
        }
        assert_eq!(view, fresh);
    }

    #[test]
    fn patches_reconcile_every_mutable_column() {
        let project_id = Uuid::new_v4();
        let image_id = Uuid::new_v4();
        let cached = ProjectView {
            project: project(project_id),
            images: vec![image(image_id, project_id)],
        };

        let mut fresh = cached.clone();
        fresh.project.name = "Loft renamed".into();
        fresh.project.address = Some("1 High St".into());
        fresh.project.global_instructions = Some("warm light".into());
        fresh.project.ai_description = Some("Bright loft".into());
        fresh.project.package = Package::Unlimited;
        fresh.project.status = ProjectStatus::Completed;
        fresh.project.video_status = VideoStatus::Completed;
        fresh.project.video_url = Some("loft.mp4".into());
        fresh.project.processing_progress = 100;
        fresh.project.updated_at = Some(Utc::now());
        let fresh_image = &mut fresh.images[0];
        fresh_image.original_filename = "Loft_01_v2.jpg".into();
        fresh_image.processed_url = Some("Loft_01.jpg".into());
        fresh_image.aspect_ratio = Some("16:9".into());
        fresh_image.attempt_number = 2;
        fresh_image.processing_status = ImageProcessingStatus::Completed;
        fresh_image.tweak_history.push("brighter".into());
        fresh_image.ai_prompt_used = Some("enhance".into());
        fresh_image.processed_at = Some(Utc::now());

        let changes = cached.diff(&fresh);
        let mut view = cached.clone();
        assert!(view.apply_project_patch(changes.project.unwrap()));
        for patch in changes.images {
            assert!(view.apply_image_patch(patch));
        }
        assert_eq!(view, fresh);
    }

    #[test]
    fn updated_at_alone_is_a_change() {
        let project_id = Uuid::new_v4();
        let cached = ProjectView {
            project: project(project_id),
            images: vec![],
        };
        let mut fresh = cached.clone();
        fresh.project.updated_at = Some(Utc::now());

        let changes = cached.diff(&fresh);
        assert!(!changes.is_empty());
        assert_eq!(
            changes.project.map(|patch| patch.updated_at),
            Some(Some(fresh.project.updated_at))
        );
    }

    #[test]
    fn identical_views_have_no_changes() {
        let project_id = Uuid::new_v4();
        let view = ProjectView {
            project: project(project_id),
            images: vec![image(Uuid::new_v4(), project_id)],
        };

        assert!(view.diff(&view.clone()).is_empty());
    }

    #[test]
    fn new_image_flags_membership_change() {
        let project_id = Uuid::new_v4();
        let cached = ProjectView {
            project: project(project_id),
            images: vec![],
        };
        let mut fresh = cached.clone();
        fresh.images.push(image(Uuid::new_v4(), project_id));

        assert!(cached.diff(&fresh).membership_changed);
    }
}
