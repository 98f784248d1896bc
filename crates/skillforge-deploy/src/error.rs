//! Error types for the build and deploy pipeline.

use std::path::PathBuf;

/// Build/deploy errors.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The external compiler exited non-zero.  `output` carries the raw
    /// combined tool output verbatim, surfaced to the user for debugging.
    #[error("build failed")]
    BuildFailed { output: String },

    #[error("build produced no artifact at `{0}`")]
    MissingArtifact(PathBuf),

    #[error("failed to read binary `{path}`: {source}")]
    ReadBinary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy `{from}` to `{to}`: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DeployError>;
