pub mod config_service;
pub mod file_session_store;
pub mod paths;
pub mod storage;
pub mod toml_preference_repository;

pub use crate::config_service::{API_URL_ENV, ConfigService};
pub use crate::file_session_store::FileSessionStore;
pub use crate::paths::{CareConnectPaths, PathError};
pub use crate::toml_preference_repository::TomlPreferenceRepository;
