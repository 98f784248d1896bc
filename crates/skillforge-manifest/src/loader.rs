//! Skill discovery — walks a directory tree and loads `skill.toml`
//! manifests.
//!
//! Each subdirectory containing a `skill.toml` resolves to exactly one
//! outcome: a parsed [`Manifest`] or a collected [`SkillError`].  A single
//! bad entry never aborts discovery of the others.

use std::path::{Path, PathBuf};

use crate::error::{ManifestError, Result};
use crate::types::{Manifest, SkillError};

/// Manifest filename expected in each skill directory.
pub const MANIFEST_FILE: &str = "skill.toml";

/// Discover all skills under the given root.
///
/// Skill directories are looked up in `<root>/skills/` when that directory
/// exists, otherwise directly under `root`.  Directories without a
/// `skill.toml` are silently skipped.  Parse failures are collected as
/// [`SkillError`] entries, not returned as errors.
///
/// Manifests and errors are each sorted by name for stable display order.
pub fn discover_skills(root: &Path) -> Result<(Vec<Manifest>, Vec<SkillError>)> {
    let dir = skills_dir(root);
    if !dir.exists() {
        tracing::debug!(path = %dir.display(), "skills directory does not exist");
        return Ok((Vec::new(), Vec::new()));
    }

    let mut manifests = Vec::new();
    let mut errors = Vec::new();

    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let manifest_path = path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            tracing::trace!(path = %path.display(), "no skill.toml, skipping");
            continue;
        }

        match load_manifest(&path) {
            Ok(manifest) => {
                tracing::info!(
                    name = %manifest.name,
                    variables = manifest.variables.len(),
                    "loaded skill"
                );
                manifests.push(manifest);
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load skill"
                );
                errors.push(SkillError {
                    name: dir_name(&path),
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    manifests.sort_by(|a, b| a.name.cmp(&b.name));
    errors.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(
        count = manifests.len(),
        errors = errors.len(),
        dir = %dir.display(),
        "skills discovered"
    );
    Ok((manifests, errors))
}

/// Load a single skill manifest from its directory.
pub fn load_manifest(dir: &Path) -> Result<Manifest> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(ManifestError::NotFound(dir.to_path_buf()));
    }

    let content = std::fs::read_to_string(&manifest_path)?;
    let mut manifest = parse_manifest(&content, &manifest_path)?;
    manifest.path = dir.to_path_buf();
    Ok(manifest)
}

/// Parse a manifest from its text content.
///
/// `source_path` is only used for error reporting.
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<Manifest> {
    let manifest: Manifest =
        toml::from_str(content).map_err(|e| ManifestError::InvalidFormat {
            path: source_path.to_path_buf(),
            reason: e.message().to_owned(),
        })?;

    if manifest.name.trim().is_empty() {
        return Err(ManifestError::MissingField {
            path: source_path.to_path_buf(),
            field: "name".into(),
        });
    }

    for v in &manifest.variables {
        if !is_env_identifier(&v.name) {
            return Err(ManifestError::InvalidVariableName {
                path: source_path.to_path_buf(),
                name: v.name.clone(),
            });
        }
    }

    Ok(manifest)
}

/// Return the skills root directory.
///
/// Priority:
/// 1. `$SKILLFORGE_ROOT` environment variable
/// 2. the current working directory
pub fn default_skills_root() -> PathBuf {
    if let Ok(dir) = std::env::var("SKILLFORGE_ROOT") {
        return PathBuf::from(dir);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// `<root>/skills` when present, otherwise `root` itself.
fn skills_dir(root: &Path) -> PathBuf {
    let nested = root.join("skills");
    if nested.is_dir() { nested } else { root.to_path_buf() }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Valid environment variable identifier: `[A-Za-z_][A-Za-z0-9_]*`.
fn is_env_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
