//! Build and deploy pipeline for SkillForge.
//!
//! - [`Builder`] — invokes the external compiler against a skill's source
//!   directory and stages the binary; failures carry the raw tool output.
//! - [`deploy`] — the ordered install steps: binary (remove-then-write),
//!   owner-only `.env`, copy rules and wrapper, introspected docs, staging
//!   cleanup.  No rollback on failure.
//! - [`docs`] — the documentation renderer (template + placeholders +
//!   generated metadata header).
//!
//! Both long-running operations (build, deploy) are plain async functions
//! designed to run as one-shot background tasks; all inputs are captured
//! by value in [`DeployRequest`] so nothing is shared with the caller.

pub mod builder;
pub mod deploy;
pub mod docs;
pub mod error;

pub use builder::{BuiltArtifact, Builder};
pub use deploy::{DeployRequest, artifact_exists, deploy, generate_env_file};
pub use docs::{render_commands, render_docs, strip_frontmatter};
pub use error::{DeployError, Result};
