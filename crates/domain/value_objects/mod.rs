pub mod checkout;
pub mod confirmations;
pub mod descriptions;
pub mod downloads;
pub mod enums;
pub mod payment_gate;
pub mod processing;
pub mod projects;
pub mod realtime;
pub mod storage;
pub mod upload_tracker;
pub mod uploads;
