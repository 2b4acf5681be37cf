pub mod billing_statuses;
pub mod image_processing_statuses;
pub mod operation_types;
pub mod packages;
pub mod project_statuses;
pub mod transaction_types;
pub mod video_statuses;
