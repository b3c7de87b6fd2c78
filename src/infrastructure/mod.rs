pub mod notifications;
pub mod storage;
