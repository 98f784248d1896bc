//! Help invocation — runs the target binary with `--help` and captures
//! its combined output.

use std::path::Path;
use std::process::Stdio;

use crate::error::{IntrospectError, Result};

/// Timeout for a single help invocation.  Help output is bounded and
/// local, so anything slower is treated as a failure.
const HELP_TIMEOUT_SECS: u64 = 10;

/// Run `<binary> [args..] --help` and return stdout and stderr combined.
///
/// A non-zero exit status is an error even when output was produced —
/// callers decide whether to swallow it.
pub async fn run_help(binary: &Path, args: &[&str]) -> Result<String> {
    tracing::debug!(binary = %binary.display(), args = ?args, "running help");

    let child = tokio::process::Command::new(binary)
        .args(args)
        .arg("--help")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| IntrospectError::Spawn {
            binary: binary.to_path_buf(),
            source: e,
        })?;

    // `wait_with_output` takes ownership, so on timeout the child is
    // dropped and killed via `kill_on_drop(true)`.
    let output = tokio::time::timeout(
        std::time::Duration::from_secs(HELP_TIMEOUT_SECS),
        child.wait_with_output(),
    )
    .await
    .map_err(|_| IntrospectError::Timeout {
        binary: binary.to_path_buf(),
        secs: HELP_TIMEOUT_SECS,
    })?
    .map_err(|e| IntrospectError::Spawn {
        binary: binary.to_path_buf(),
        source: e,
    })?;

    if !output.status.success() {
        return Err(IntrospectError::NonZeroExit {
            binary: binary.to_path_buf(),
            status: output.status.code().unwrap_or(-1),
        });
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("fake-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn captures_combined_output() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = write_script(tmp.path(), "echo out\necho err >&2");
        let output = run_help(&bin, &[]).await.unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = write_script(tmp.path(), "exit 3");
        let err = run_help(&bin, &[]).await.unwrap_err();
        assert!(matches!(err, IntrospectError::NonZeroExit { status: 3, .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let err = run_help(Path::new("/nonexistent/fake-cli"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, IntrospectError::Spawn { .. }));
    }
}
