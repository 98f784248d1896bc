//! Command tree types produced by introspection.

use serde::Serialize;

/// The full introspected command surface of a binary.
///
/// Built fresh on every deploy; never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandTree {
    /// Top-level commands in discovery order.
    pub commands: Vec<CommandNode>,
}

impl CommandTree {
    /// Whether introspection found any documentable substructure.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All leaf commands in the tree, paired with their full command path
    /// (e.g. `habits add`), in discovery order.
    pub fn leaves(&self) -> Vec<(String, &CommandNode)> {
        let mut out = Vec::new();
        for cmd in &self.commands {
            if cmd.children.is_empty() {
                out.push((cmd.name.clone(), cmd));
            } else {
                for sub in &cmd.children {
                    out.push((format!("{} {}", cmd.name, sub.name), sub));
                }
            }
        }
        out
    }
}

/// One node in the command tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandNode {
    /// Command name as it appears in the commands list.
    pub name: String,

    /// One-line description, when the help text carried one.
    pub description: Option<String>,

    /// Usage pattern with the program-name token stripped
    /// (e.g. `habits add [flags]`).
    pub usage: Option<String>,

    /// Flags in declaration order.  Empty for non-leaf commands.
    pub flags: Vec<FlagDescriptor>,

    /// Immediate subcommands.  Empty for leaf commands.
    pub children: Vec<CommandNode>,
}

/// One flag parsed from a `Flags:` section line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagDescriptor {
    /// The flag names joined for display, e.g. `-t, --title`.
    pub names: String,

    /// Recognized type token (`string`, `int`, `bool`, ...), if any.
    pub kind: Option<String>,

    /// Remaining words of the line.  Required-ness is conventionally
    /// carried here as a `(required)` suffix.
    pub description: String,
}
