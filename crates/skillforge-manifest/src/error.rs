//! Error types for manifest parsing and discovery.

use std::path::PathBuf;

/// Manifest-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("skill manifest not found in `{0}`")]
    NotFound(PathBuf),

    #[error("invalid skill.toml in `{path}`: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("missing required field `{field}` in skill.toml at `{path}`")]
    MissingField { path: PathBuf, field: String },

    #[error("invalid variable name `{name}` in `{path}`: must be a valid environment identifier")]
    InvalidVariableName { path: PathBuf, name: String },

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ManifestError>;
