//! Skill manifest parsing and registry discovery for SkillForge.
//!
//! This crate provides:
//!
//! - **Manifest types** — the `skill.toml` data model: identity, ordered
//!   configuration [`Variable`]s, build, deploy, and docs settings.
//!
//! - **Registry discovery** — [`discover_skills`] walks a directory tree
//!   and resolves every skill directory to exactly one outcome: a parsed
//!   [`Manifest`] or a collected [`SkillError`].  One bad entry never
//!   blocks discovery of the rest.
//!
//! The manifest is loaded once per skill directory and is immutable for
//! the wizard session.

pub mod error;
pub mod loader;
pub mod types;

pub use error::{ManifestError, Result};
pub use loader::{
    MANIFEST_FILE, default_skills_root, discover_skills, load_manifest, parse_manifest,
};
pub use types::{
    BuildConfig, DeployConfig, DocsConfig, Manifest, SkillError, Variable, VariableKind,
};
