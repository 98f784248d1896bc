//! Documentation rendering — turns a template, the introspected command
//! tree, and the configured values into the final skill document.
//!
//! A template may carry a three-dash metadata header; it is stripped and a
//! freshly generated one is prepended, so re-rendering with unchanged
//! inputs is byte-identical.

use std::collections::BTreeMap;
use std::path::Path;

use skillforge_manifest::Manifest;
use skillforge_introspect::CommandTree;

/// Deploy-path placeholder.
pub const TOKEN_SKILL_PATH: &str = "{{SKILL_PATH}}";

/// Commands-documentation placeholder.
pub const TOKEN_COMMANDS: &str = "{{COMMANDS}}";

/// Domain-table placeholder, fed from a json-typed `PROJECT_IDS` value.
pub const TOKEN_PROJECT_IDS_TABLE: &str = "{{PROJECT_IDS_TABLE}}";

/// Render the final documentation text.
///
/// Starts from the manifest's template file when present, otherwise a
/// minimal generated skeleton; strips any pre-existing metadata header,
/// substitutes recognized placeholders (unrecognized ones are left
/// untouched), and prepends a freshly generated header.
pub fn render_docs(
    manifest: &Manifest,
    deploy_dir: &Path,
    values: &BTreeMap<String, String>,
    tree: &CommandTree,
) -> String {
    let template_path = manifest.path.join(&manifest.docs.template);

    let body = match std::fs::read_to_string(&template_path) {
        Ok(template) => {
            let stripped = strip_frontmatter(&template);
            replace_placeholders(stripped, manifest, deploy_dir, values, tree)
        }
        Err(_) => {
            tracing::debug!(
                path = %template_path.display(),
                "no template, generating basic docs"
            );
            basic_docs(manifest, deploy_dir, tree)
        }
    };

    let mut out = generate_frontmatter(manifest);
    out.push_str(&body);
    out
}

/// Generate the three-dash metadata header from the manifest.
fn generate_frontmatter(manifest: &Manifest) -> String {
    format!(
        "---\nname: {}\ndescription: {}\n---\n\n",
        manifest.name,
        manifest.docs_description()
    )
}

/// Remove a leading three-dash-delimited header, if present.
///
/// Templates without a header are returned verbatim.
pub fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    let Some(idx) = rest.find("\n---") else {
        return content;
    };
    rest[idx + 4..].trim_start_matches('\n')
}

/// Substitute recognized placeholders.  Unrecognized `{{...}}` tokens are
/// left untouched.
fn replace_placeholders(
    content: &str,
    manifest: &Manifest,
    deploy_dir: &Path,
    values: &BTreeMap<String, String>,
    tree: &CommandTree,
) -> String {
    let mut out = content.replace(TOKEN_SKILL_PATH, &deploy_dir.display().to_string());

    let table = match values.get("PROJECT_IDS").filter(|v| !v.is_empty()) {
        Some(json) => project_ids_table(json),
        None => "No project IDs configured.".to_owned(),
    };
    out = out.replacen(TOKEN_PROJECT_IDS_TABLE, &table, 1);

    let display_path = deployed_binary_path(manifest, deploy_dir);
    out = out.replacen(TOKEN_COMMANDS, &render_commands(tree, &display_path), 1);

    out
}

/// The deployed binary path shown in documentation examples.
fn deployed_binary_path(manifest: &Manifest, deploy_dir: &Path) -> String {
    deploy_dir
        .join("bin")
        .join(manifest.binary_name())
        .display()
        .to_string()
}

/// Minimal skeleton used when the skill ships no template.
fn basic_docs(manifest: &Manifest, deploy_dir: &Path, tree: &CommandTree) -> String {
    let display_path = deployed_binary_path(manifest, deploy_dir);
    format!(
        "# {}\n\n{}\n\n## Commands\n\n{}",
        manifest.name,
        manifest.description,
        render_commands(tree, &display_path)
    )
}

/// Render the introspected command tree as markdown.
///
/// An empty tree falls back to a generic `--help` instruction.
pub fn render_commands(tree: &CommandTree, display_path: &str) -> String {
    let leaves = tree.leaves();
    if leaves.is_empty() {
        return format!("Run `{display_path} --help` to see available commands.\n");
    }

    let mut out = String::new();
    for (path, node) in leaves {
        out.push_str(&format!("### {path}\n\n"));

        if let Some(desc) = &node.description {
            out.push_str(desc);
            out.push_str("\n\n");
        }

        if let Some(usage) = &node.usage {
            out.push_str(&format!("**Usage:** `{display_path} {usage}`\n\n"));
        }

        if !node.flags.is_empty() {
            out.push_str("**Flags:**\n");
            for flag in &node.flags {
                out.push_str("- `");
                out.push_str(&flag.names);
                out.push('`');
                if let Some(kind) = &flag.kind {
                    out.push_str(&format!(" ({kind})"));
                }
                if !flag.description.is_empty() {
                    out.push_str(": ");
                    out.push_str(&flag.description);
                }
                out.push('\n');
            }
            out.push('\n');
        }
    }

    out
}

/// Build a markdown table from a `{"Name": id, ...}` JSON object.
///
/// Rows are emitted in sorted key order so output is deterministic.
/// Unparseable input falls back to the raw string in a code span.
fn project_ids_table(json: &str) -> String {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(json)
    else {
        tracing::warn!("PROJECT_IDS is not a JSON object, falling back to raw value");
        return format!("Config: `{json}`");
    };

    let mut out = String::from("| ID | Project |\n|----|---------|\n");
    for (name, id) in &map {
        let id = match id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!("| {id} | {name} |\n"));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use skillforge_introspect::{CommandNode, FlagDescriptor};
    use skillforge_manifest::parse_manifest;

    fn test_manifest(path: &Path) -> Manifest {
        let mut m = parse_manifest(
            "name = \"demo\"\ndescription = \"A demo skill.\"\n",
            Path::new("t/skill.toml"),
        )
        .unwrap();
        m.path = path.to_path_buf();
        m
    }

    fn sample_tree() -> CommandTree {
        CommandTree {
            commands: vec![CommandNode {
                name: "add".into(),
                description: Some("Add a task".into()),
                usage: Some("add [flags]".into()),
                flags: vec![FlagDescriptor {
                    names: "-t, --title".into(),
                    kind: Some("string".into()),
                    description: "Task title (required)".into(),
                }],
                children: Vec::new(),
            }],
        }
    }

    #[test]
    fn strip_removes_exactly_the_header() {
        let content = "---\nname: old\n---\n\n# Body\n\nrest";
        assert_eq!(strip_frontmatter(content), "# Body\n\nrest");
    }

    #[test]
    fn strip_without_header_is_verbatim() {
        let content = "# No header\nJust markdown.";
        assert_eq!(strip_frontmatter(content), content);
    }

    #[test]
    fn strip_with_unclosed_header_is_verbatim() {
        let content = "---\nname: broken\nno closing";
        assert_eq!(strip_frontmatter(content), content);
    }

    #[test]
    fn commands_markdown_shape() {
        let md = render_commands(&sample_tree(), "/deploy/bin/demo");
        assert!(md.contains("### add"));
        assert!(md.contains("Add a task"));
        assert!(md.contains("**Usage:** `/deploy/bin/demo add [flags]`"));
        assert!(md.contains("- `-t, --title` (string): Task title (required)"));
    }

    #[test]
    fn empty_tree_falls_back_to_help_note() {
        let md = render_commands(&CommandTree::default(), "/deploy/bin/demo");
        assert_eq!(
            md,
            "Run `/deploy/bin/demo --help` to see available commands.\n"
        );
    }

    #[test]
    fn project_ids_table_from_json() {
        let table = project_ids_table(r#"{"Work": 12, "Home": 7}"#);
        assert!(table.starts_with("| ID | Project |"));
        // Sorted key order: Home before Work.
        let home = table.find("| 7 | Home |").unwrap();
        let work = table.find("| 12 | Work |").unwrap();
        assert!(home < work);
    }

    #[test]
    fn project_ids_fallback_for_bad_json() {
        assert_eq!(project_ids_table("not json"), "Config: `not json`");
    }

    #[test]
    fn render_with_template_substitutes_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("SKILL.template.md"),
            "---\nname: stale\n---\n# Demo\n\nPath: {{SKILL_PATH}}\n\n{{COMMANDS}}\n{{UNKNOWN}}\n",
        )
        .unwrap();

        let manifest = test_manifest(tmp.path());
        let deploy_dir = PathBuf::from("/deploy/demo");
        let values = BTreeMap::new();
        let out = render_docs(&manifest, &deploy_dir, &values, &sample_tree());

        assert!(out.starts_with("---\nname: demo\ndescription: A demo skill.\n---\n\n"));
        assert!(!out.contains("stale"));
        assert!(out.contains("Path: /deploy/demo"));
        assert!(out.contains("### add"));
        // Unrecognized placeholders are left untouched.
        assert!(out.contains("{{UNKNOWN}}"));
    }

    #[test]
    fn render_without_template_generates_skeleton() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = test_manifest(tmp.path());
        let out = render_docs(
            &manifest,
            Path::new("/deploy/demo"),
            &BTreeMap::new(),
            &CommandTree::default(),
        );
        assert!(out.contains("# demo"));
        assert!(out.contains("Run `/deploy/demo/bin/demo --help`"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("SKILL.template.md"),
            "# Demo\n\n{{COMMANDS}}\n\n{{PROJECT_IDS_TABLE}}\n",
        )
        .unwrap();

        let manifest = test_manifest(tmp.path());
        let mut values = BTreeMap::new();
        values.insert("PROJECT_IDS".to_owned(), r#"{"Work": 12}"#.to_owned());

        let deploy_dir = PathBuf::from("/deploy/demo");
        let tree = sample_tree();
        let first = render_docs(&manifest, &deploy_dir, &values, &tree);
        let second = render_docs(&manifest, &deploy_dir, &values, &tree);
        assert_eq!(first, second);
    }
}
