use uuid::Uuid;

use crate::domain::{
    entities::projects::ProjectEntity,
    value_objects::enums::{packages::Package, project_statuses::ProjectStatus},
};

pub const MAX_TWEAK_ATTEMPTS: i32 = 5;

/// Work a caller wants to queue for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOperation {
    GenerateAll { image_count: usize },
    Tweak { attempt_number: i32 },
    GenerateVideo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    NoImages,
    AttemptLimitReached,
    VideoNotIncluded,
}

impl GateRejection {
    pub fn message(&self) -> &'static str {
        match self {
            GateRejection::NoImages => "No images to process",
            GateRejection::AttemptLimitReached => "Maximum number of attempts reached for this image",
            GateRejection::VideoNotIncluded => {
                "video generation is not included in the starter package"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    RedirectToPayment { payment_path: String },
    Rejected(GateRejection),
}

#[derive(Debug, Clone, Copy)]
pub struct GateSubject {
    pub project_id: Uuid,
    pub status: ProjectStatus,
    pub package: Package,
}

impl From<&ProjectEntity> for GateSubject {
    fn from(project: &ProjectEntity) -> Self {
        Self {
            project_id: project.id,
            status: project.status(),
            package: project.package(),
        }
    }
}

pub fn payment_path(project_id: Uuid) -> String {
    format!("/payment/{project_id}")
}

/// Unpaid draft projects on a priced package must go through checkout first.
fn requires_payment(subject: &GateSubject) -> bool {
    subject.status == ProjectStatus::Draft && !subject.package.is_free_trial()
}

pub fn evaluate(subject: &GateSubject, operation: GateOperation) -> GateDecision {
    let redirect = || GateDecision::RedirectToPayment {
        payment_path: payment_path(subject.project_id),
    };

    match operation {
        GateOperation::GenerateAll { image_count } => {
            if image_count == 0 {
                return GateDecision::Rejected(GateRejection::NoImages);
            }
            if requires_payment(subject) {
                return redirect();
            }
        }
        GateOperation::Tweak { attempt_number } => {
            if attempt_number >= MAX_TWEAK_ATTEMPTS {
                return GateDecision::Rejected(GateRejection::AttemptLimitReached);
            }
            if requires_payment(subject) {
                return redirect();
            }
        }
        GateOperation::GenerateVideo => {
            if requires_payment(subject) {
                return redirect();
            }
            if !subject.package.includes_video() {
                return GateDecision::Rejected(GateRejection::VideoNotIncluded);
            }
        }
    }

    GateDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(status: ProjectStatus, package: Package) -> GateSubject {
        GateSubject {
            project_id: Uuid::nil(),
            status,
            package,
        }
    }

    #[test]
    fn unpaid_pro_draft_redirects_to_payment() {
        let decision = evaluate(
            &subject(ProjectStatus::Draft, Package::Pro),
            GateOperation::GenerateAll { image_count: 3 },
        );
        assert_eq!(
            decision,
            GateDecision::RedirectToPayment {
                payment_path: format!("/payment/{}", Uuid::nil())
            }
        );
    }

    #[test]
    fn starter_draft_is_free_to_process() {
        let decision = evaluate(
            &subject(ProjectStatus::Draft, Package::Starter),
            GateOperation::Tweak { attempt_number: 2 },
        );
        assert_eq!(decision, GateDecision::Allowed);
    }

    #[test]
    fn fifth_attempt_cannot_be_tweaked_again() {
        let decision = evaluate(
            &subject(ProjectStatus::Paid, Package::Pro),
            GateOperation::Tweak { attempt_number: 5 },
        );
        assert_eq!(
            decision,
            GateDecision::Rejected(GateRejection::AttemptLimitReached)
        );
    }

    #[test]
    fn empty_project_is_rejected_before_payment_check() {
        let decision = evaluate(
            &subject(ProjectStatus::Draft, Package::Pro),
            GateOperation::GenerateAll { image_count: 0 },
        );
        assert_eq!(decision, GateDecision::Rejected(GateRejection::NoImages));
    }

    #[test]
    fn starter_projects_cannot_generate_video() {
        let decision = evaluate(
            &subject(ProjectStatus::Processing, Package::Starter),
            GateOperation::GenerateVideo,
        );
        assert_eq!(decision, GateDecision::Rejected(GateRejection::VideoNotIncluded));

        let paid = evaluate(
            &subject(ProjectStatus::Paid, Package::Unlimited),
            GateOperation::GenerateVideo,
        );
        assert_eq!(paid, GateDecision::Allowed);
    }
}
