//! Recursive command discovery.
//!
//! Walks the target binary's command surface by invoking it with `--help`
//! at each level.  Two levels of nesting are supported — the command
//! surfaces this tool targets are `group subcommand` shaped — and every
//! per-command failure omits that subtree instead of failing the caller.

use std::path::Path;

use crate::help::{parse_description, parse_flags, parse_subcommands, parse_usage};
use crate::runner::run_help;
use crate::types::{CommandNode, CommandTree};

/// Introspect a binary's full command tree.
///
/// Never fails: an unreadable top level yields an empty tree, and a failed
/// invocation for an individual command drops only that command.
pub async fn introspect(binary: &Path) -> CommandTree {
    let root_help = match run_help(binary, &[]).await {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(binary = %binary.display(), error = %e, "top-level help failed");
            return CommandTree::default();
        }
    };

    let top_level = parse_subcommands(&root_help);
    if top_level.is_empty() {
        tracing::debug!(binary = %binary.display(), "no subcommands found");
        return CommandTree::default();
    }

    let mut commands = Vec::new();

    for name in top_level {
        let help = match run_help(binary, &[&name]).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(command = %name, error = %e, "help failed, omitting command");
                continue;
            }
        };

        let second_level = parse_subcommands(&help);

        if second_level.is_empty() {
            commands.push(leaf_node(&name, &help));
            continue;
        }

        // Has subcommands: recurse exactly one more level and treat each
        // third-level name as a leaf.
        let mut children = Vec::new();
        for sub in second_level {
            match run_help(binary, &[&name, &sub]).await {
                Ok(sub_help) => children.push(leaf_node(&sub, &sub_help)),
                Err(e) => {
                    tracing::warn!(
                        command = %format!("{name} {sub}"),
                        error = %e,
                        "help failed, omitting subcommand"
                    );
                }
            }
        }

        commands.push(CommandNode {
            name,
            description: parse_description(&help),
            usage: parse_usage(&help),
            flags: Vec::new(),
            children,
        });
    }

    tracing::info!(
        binary = %binary.display(),
        commands = commands.len(),
        "introspection complete"
    );
    CommandTree { commands }
}

/// Build a leaf node from a command's help output.
fn leaf_node(name: &str, help: &str) -> CommandNode {
    CommandNode {
        name: name.to_owned(),
        description: parse_description(help),
        usage: parse_usage(help),
        flags: parse_flags(help),
        children: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A fake CLI that answers `--help` at three levels:
    /// root -> `habits` -> `add`/`list`, plus a leaf `version`.
    const FAKE_CLI: &str = r#"#!/bin/sh
if [ "$1" = "habits" ] && [ "$2" = "add" ]; then
cat <<'EOF'
Add a habit

Usage:
  demo habits add [flags]

Flags:
  -t, --title string   Habit title (required)
EOF
elif [ "$1" = "habits" ] && [ "$2" = "list" ]; then
cat <<'EOF'
List active habits

Usage:
  demo habits list [flags]

Flags:
  -c, --category string   Filter by category ID
EOF
elif [ "$1" = "habits" ]; then
cat <<'EOF'
Manage habits

Usage:
  demo habits [command]

Available Commands:
  add   Add a habit
  list  List active habits

Flags:
  -h, --help   help for habits
EOF
elif [ "$1" = "version" ]; then
cat <<'EOF'
Print the version

Usage:
  demo version
EOF
else
cat <<'EOF'
Demo CLI

Usage:
  demo [command]

Available Commands:
  completion  Generate shell completion
  habits      Manage habits
  help        Help about any command
  version     Print the version

Flags:
  -h, --help   help for demo
EOF
fi
"#;

    fn write_fake_cli(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("demo");
        std::fs::write(&path, FAKE_CLI).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn discovers_two_level_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = write_fake_cli(tmp.path());

        let tree = introspect(&bin).await;
        assert_eq!(tree.commands.len(), 2);

        let habits = &tree.commands[0];
        assert_eq!(habits.name, "habits");
        assert_eq!(habits.children.len(), 2);
        assert_eq!(habits.children[0].name, "add");
        assert_eq!(habits.children[0].flags.len(), 1);
        assert_eq!(habits.children[0].flags[0].names, "-t, --title");

        let version = &tree.commands[1];
        assert_eq!(version.name, "version");
        assert!(version.children.is_empty());
        assert_eq!(version.usage.as_deref(), Some("version"));
    }

    #[tokio::test]
    async fn leaves_carry_full_command_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = write_fake_cli(tmp.path());

        let tree = introspect(&bin).await;
        let paths: Vec<String> = tree.leaves().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["habits add", "habits list", "version"]);
    }

    #[tokio::test]
    async fn unrunnable_binary_yields_empty_tree() {
        let tree = introspect(Path::new("/nonexistent/demo")).await;
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn binary_without_subcommands_yields_empty_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flat");
        std::fs::write(&path, "#!/bin/sh\necho 'Usage:'\necho '  flat [flags]'\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tree = introspect(&path).await;
        assert!(tree.is_empty());
    }
}
