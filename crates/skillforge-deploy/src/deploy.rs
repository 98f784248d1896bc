//! Deploy orchestration — installs a staged binary into the deploy
//! directory with its environment file and generated documentation.
//!
//! Steps run strictly in order; the first failure aborts the remainder.
//! Completed steps are not rolled back: a partial deploy is an accepted
//! failure mode, surfaced to the user as a deploy error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use skillforge_introspect::introspect;
use skillforge_manifest::Manifest;

use crate::builder::BuiltArtifact;
use crate::docs::render_docs;
use crate::error::{DeployError, Result};

/// Everything a deploy needs, captured by value at dispatch time.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// The skill being deployed.
    pub manifest: Manifest,

    /// The staged build output.
    pub artifact: BuiltArtifact,

    /// Resolved deploy directory (base folder / skill folder name).
    pub deploy_dir: PathBuf,

    /// Finalized configuration values, variable name to value.
    pub values: BTreeMap<String, String>,
}

/// Check whether the deploy path already holds a built artifact.
///
/// Only the binary is probed; a partial prior deploy with docs but no
/// binary does not count as a conflict.
pub fn artifact_exists(deploy_dir: &Path, binary_name: &str) -> bool {
    deploy_dir.join("bin").join(binary_name).exists()
}

/// Run the full deploy.
pub async fn deploy(request: &DeployRequest) -> Result<()> {
    let manifest = &request.manifest;
    let deploy_dir = &request.deploy_dir;
    let binary_name = manifest.binary_name();

    tracing::info!(
        skill = %manifest.name,
        target = %deploy_dir.display(),
        "deploying"
    );

    // (a) Destination bin directory.
    let bin_dir = deploy_dir.join("bin");
    tokio::fs::create_dir_all(&bin_dir).await?;

    // (b) Binary: read fully, remove any existing destination, write fresh
    // bytes.  Remove-then-write avoids partially overwriting a binary that
    // a running process may have memory-mapped.
    let dst_binary = bin_dir.join(binary_name);
    let data = tokio::fs::read(&request.artifact.binary)
        .await
        .map_err(|e| DeployError::ReadBinary {
            path: request.artifact.binary.clone(),
            source: e,
        })?;
    let _ = tokio::fs::remove_file(&dst_binary).await;
    write_file(&dst_binary, &data, 0o755).await?;

    // (c) Environment file, owner-readable only.
    let env_path = bin_dir.join(".env");
    let env_content = generate_env_file(manifest, &request.values);
    write_file(&env_path, env_content.as_bytes(), 0o600).await?;

    // (d) Extra copy rules and optional wrapper script.
    copy_deploy_files(manifest, deploy_dir).await?;
    if manifest.deploy.wrapper {
        write_wrapper(manifest, deploy_dir).await?;
    }

    // (e) Docs: introspect the staged binary, render, write.
    let tree = introspect(&request.artifact.binary).await;
    let docs = render_docs(manifest, deploy_dir, &request.values, &tree);
    let docs_path = deploy_dir.join(&manifest.docs.output);
    write_file(&docs_path, docs.as_bytes(), 0o644).await?;

    // (f) Staging cleanup.
    if let Err(e) = tokio::fs::remove_dir_all(&request.artifact.staging).await {
        tracing::warn!(
            staging = %request.artifact.staging.display(),
            error = %e,
            "failed to remove staging directory"
        );
    }

    tracing::info!(skill = %manifest.name, "deploy complete");
    Ok(())
}

/// Build the `.env` content: `KEY=VALUE` per configured non-empty
/// variable, in manifest declaration order.
pub fn generate_env_file(manifest: &Manifest, values: &BTreeMap<String, String>) -> String {
    let mut out = String::from("# Generated by skillforge\n");
    for v in &manifest.variables {
        if let Some(value) = values.get(&v.name)
            && !value.is_empty()
        {
            out.push_str(&v.name);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

/// Copy `deploy.files` entries from the skill directory into the deploy
/// directory, creating parent directories as needed.
async fn copy_deploy_files(manifest: &Manifest, deploy_dir: &Path) -> Result<()> {
    for rule in &manifest.deploy.files {
        let from = manifest.path.join(rule);
        let to = deploy_dir.join(rule);
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&from, &to)
            .await
            .map_err(|e| DeployError::Copy {
                from: from.clone(),
                to: to.clone(),
                source: e,
            })?;
        tracing::debug!(from = %from.display(), to = %to.display(), "copied deploy file");
    }
    Ok(())
}

/// Write an exec wrapper at the deploy root that launches the deployed
/// binary.  The binary itself loads `bin/.env` at startup.
async fn write_wrapper(manifest: &Manifest, deploy_dir: &Path) -> Result<()> {
    let wrapper_path = deploy_dir.join(format!("{}.sh", manifest.name));
    let content = format!(
        "#!/bin/sh\nexec \"$(dirname \"$0\")/bin/{}\" \"$@\"\n",
        manifest.binary_name()
    );
    write_file(&wrapper_path, content.as_bytes(), 0o755).await
}

/// Write a file and set its mode (mode is a no-op off Unix).
async fn write_file(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|e| DeployError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .await
            .map_err(|e| DeployError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
