pub mod cache_storage;
pub mod format;
pub mod manager;
