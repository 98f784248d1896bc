//! Error types for command introspection.
//!
//! Per-command failures are swallowed by the introspector itself — these
//! errors surface only from [`run_help`](crate::runner::run_help) so callers
//! can decide how much of the tree to keep.

use std::path::PathBuf;

/// Introspection errors.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    #[error("failed to execute `{binary}`: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{binary}` exited with status {status}")]
    NonZeroExit { binary: PathBuf, status: i32 },

    #[error("help invocation for `{binary}` timed out after {secs}s")]
    Timeout { binary: PathBuf, secs: u64 },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, IntrospectError>;
