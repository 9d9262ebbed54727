pub mod app_config;
pub mod file_storage;

pub use app_config::Config;
pub use file_storage::{FileSessionStorage, StoreError};
