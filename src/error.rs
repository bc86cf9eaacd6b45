//! Error types for userdata-rs

use thiserror::Error;

use crate::os::OsFamily;

/// Main error type for userdata-rs operations
#[derive(Error, Debug)]
pub enum UserDataError {
    #[error("unsupported OS for container-fleet user-data: {os}")]
    UnsupportedOs { os: OsFamily },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
