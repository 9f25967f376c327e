pub mod config;
pub mod logger;
pub mod notification;
pub mod storage;
