// Shared utilities

pub mod constants;
pub mod files;
pub mod storage;
