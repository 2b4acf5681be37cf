pub mod billing_log;
pub mod processing_queue;
pub mod project_images;
pub mod projects;
pub mod storage;
pub mod users;
