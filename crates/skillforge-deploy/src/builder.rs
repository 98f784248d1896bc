//! Build orchestration — invokes the external compiler toolchain against a
//! skill's source directory and stages the resulting binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use skillforge_manifest::Manifest;

use crate::error::{DeployError, Result};

/// A successfully staged build.
#[derive(Debug, Clone)]
pub struct BuiltArtifact {
    /// The staged binary path.
    pub binary: PathBuf,

    /// The staging directory, removed after a successful deploy.
    pub staging: PathBuf,
}

/// Invokes the compiler and stages the output.
///
/// Skills are Rust crates: the default invocation is
/// `cargo build --release --target-dir <staging>` with the skill's source
/// directory as working directory.  No retry — a failed attempt is
/// terminal for that deploy attempt and the user re-triggers manually.
#[derive(Debug, Clone)]
pub struct Builder {
    /// Staging directory the artifact is written into.
    staging: PathBuf,

    /// Compiler program.  Overridable for tests.
    program: String,
}

impl Builder {
    /// Create a builder staging into the given directory.
    pub fn new(staging: impl Into<PathBuf>) -> Self {
        Self {
            staging: staging.into(),
            program: "cargo".to_owned(),
        }
    }

    /// Override the compiler program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The staging directory this builder writes into.
    pub fn staging(&self) -> &Path {
        &self.staging
    }

    /// Build the skill and return the staged artifact.
    ///
    /// On compiler failure the raw combined output is returned verbatim in
    /// [`DeployError::BuildFailed`].
    pub async fn build(&self, manifest: &Manifest) -> Result<BuiltArtifact> {
        let source_dir = manifest.source_dir();
        let binary_name = manifest.binary_name();

        std::fs::create_dir_all(&self.staging)?;

        tracing::info!(
            skill = %manifest.name,
            source = %source_dir.display(),
            staging = %self.staging.display(),
            "building"
        );

        let output = tokio::process::Command::new(&self.program)
            .arg("build")
            .arg("--release")
            .arg("--target-dir")
            .arg(&self.staging)
            .current_dir(&source_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DeployError::BuildFailed {
                output: format!("failed to spawn `{}`: {e}", self.program),
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            tracing::warn!(skill = %manifest.name, "build failed");
            return Err(DeployError::BuildFailed { output: combined });
        }

        let binary = self.staging.join("release").join(binary_name);
        if !binary.exists() {
            return Err(DeployError::MissingArtifact(binary));
        }

        tracing::info!(binary = %binary.display(), "build complete");
        Ok(BuiltArtifact {
            binary,
            staging: self.staging.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
