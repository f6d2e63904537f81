use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating domain profiles.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown profile '{name}' (built-in profiles: {available})")]
    UnknownProfile { name: String, available: String },

    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid profile '{profile}': {message}")]
    InvalidProfile { profile: String, message: String },
}

impl ModelError {
    pub(crate) fn invalid(profile: &str, message: impl Into<String>) -> Self {
        Self::InvalidProfile {
            profile: profile.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
