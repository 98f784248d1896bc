//! Skill manifest type definitions.
//!
//! A skill is a self-contained, buildable CLI tool described by a
//! `skill.toml` file in its source directory.  The manifest declares the
//! user-facing configuration variables, how to build the binary, what the
//! deploy step should copy, and how the documentation is generated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A fully parsed skill manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Unique skill name / slug (e.g. `habitwire`, `vikunja`).
    pub name: String,

    /// Short human-readable description of what the skill does.
    pub description: String,

    /// Longer description used in the generated documentation header.
    #[serde(default)]
    pub detailed_description: Option<String>,

    /// Semantic version string (e.g. `1.2.0`).
    #[serde(default)]
    pub version: Option<String>,

    /// Configuration variables the user supplies before deploy, in
    /// declaration order.
    #[serde(default)]
    pub variables: Vec<Variable>,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Deploy settings.
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Documentation settings.
    #[serde(default)]
    pub docs: DocsConfig,

    /// The skill source directory — attached after parsing.
    #[serde(skip)]
    pub path: PathBuf,
}

impl Manifest {
    /// The binary name for this skill: `build.binary` when set, otherwise
    /// the skill name.
    pub fn binary_name(&self) -> &str {
        match self.build.binary.as_deref() {
            Some(b) if !b.is_empty() => b,
            _ => &self.name,
        }
    }

    /// The description used in the generated docs header — the detailed
    /// description when present, otherwise the short one.
    pub fn docs_description(&self) -> &str {
        self.detailed_description.as_deref().unwrap_or(&self.description)
    }

    /// The directory the build runs in: `build.entry` joined onto the
    /// skill directory when set, otherwise the skill directory itself.
    pub fn source_dir(&self) -> PathBuf {
        match self.build.entry.as_deref() {
            Some(entry) if !entry.is_empty() => self.path.join(entry),
            _ => self.path.clone(),
        }
    }
}

/// A user-supplied configuration variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Environment variable identifier (e.g. `HABITWIRE_API_KEY`).
    pub name: String,

    /// Short display label shown next to the input field.
    pub label: String,

    /// Longer description of what the value is for.
    #[serde(default)]
    pub description: String,

    /// Whether the wizard refuses to advance without a value.
    #[serde(default)]
    pub required: bool,

    /// Placeholder text shown in an empty input.
    #[serde(default)]
    pub placeholder: Option<String>,

    /// Default value, used as placeholder when no placeholder is set.
    #[serde(default)]
    pub default: Option<String>,

    /// How the value is treated by the wizard and renderer.
    #[serde(default, rename = "type")]
    pub kind: VariableKind,
}

impl Variable {
    /// The placeholder shown in an empty input: explicit placeholder first,
    /// falling back to the default value.
    pub fn effective_placeholder(&self) -> Option<&str> {
        self.placeholder
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.default.as_deref())
    }
}

/// Variable value kinds.
///
/// `Secret` values are never echoed in plaintext beyond a short truncated
/// preview; `Json` values hold structured data consumed by the doc renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    Text,
    Secret,
    Json,
}

impl VariableKind {
    /// Whether input for this kind is masked on screen.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret)
    }
}

/// Build settings from the `[build]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Source entry path relative to the skill directory.  Empty means the
    /// skill directory itself.
    #[serde(default)]
    pub entry: Option<String>,

    /// Desired binary name.  Empty means the skill name.
    #[serde(default)]
    pub binary: Option<String>,
}

/// Deploy settings from the `[deploy]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Extra files copied from the skill directory into the deploy
    /// directory, relative paths.
    #[serde(default)]
    pub files: Vec<String>,

    /// Whether to generate a shell wrapper that execs the deployed binary.
    #[serde(default)]
    pub wrapper: bool,
}

/// Documentation settings from the `[docs]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Template filename inside the skill directory.
    #[serde(default = "default_template")]
    pub template: String,

    /// Output filename written at the deploy root.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            output: default_output(),
        }
    }
}

fn default_template() -> String {
    "SKILL.template.md".to_owned()
}

fn default_output() -> String {
    "SKILL.md".to_owned()
}

/// A skill directory that failed to parse.
///
/// Collected during discovery and shown in the wizard without blocking
/// other skills.
#[derive(Debug, Clone)]
pub struct SkillError {
    /// Skill identifier — the directory name.
    pub name: String,

    /// The skill directory.
    pub path: PathBuf,

    /// Human-readable failure reason.
    pub reason: String,
}
