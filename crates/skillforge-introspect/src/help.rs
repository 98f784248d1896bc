//! Help-text parsing — pure functions from captured output to structure.
//!
//! The target binary exposes no machine-readable introspection, so the
//! command tree is reconstructed from conventional help text:
//!
//! ```text
//! Manage habits
//!
//! Usage:
//!   habitwire habits add [flags]
//!
//! Available Commands:
//!   add         Add a habit
//!   list        List active habits
//!
//! Flags:
//!   -t, --title string   Habit title (required)
//! ```
//!
//! The layout is a convention, not a contract, so every rule here is
//! permissive: a missing section degrades the output instead of failing.

use crate::types::FlagDescriptor;

/// Header that opens the subcommands section.
const COMMANDS_HEADER: &str = "Available Commands:";

/// Header that opens the flags section.
const FLAGS_HEADER: &str = "Flags:";

/// Subcommand names that are tooling artifacts, never domain commands.
const RESERVED_COMMANDS: &[&str] = &["help", "completion"];

/// Type tokens recognized in flag lines.
const FLAG_TYPES: &[&str] = &[
    "string",
    "int",
    "int64",
    "bool",
    "float64",
    "duration",
    "stringArray",
    "stringSlice",
    "intSlice",
];

/// Extract subcommand names from a help text.
///
/// The commands list begins after the `Available Commands:` header and ends
/// at the next line ending in `:`.  Each entry's first whitespace-delimited
/// token is the command name; `help` and `completion` are always excluded.
pub fn parse_subcommands(help: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_section = false;

    for line in help.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(COMMANDS_HEADER) {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.ends_with(':') {
            break;
        }

        if let Some(name) = trimmed.split_whitespace().next()
            && !RESERVED_COMMANDS.contains(&name)
        {
            commands.push(name.to_owned());
        }
    }

    commands
}

/// Extract the one-line description: the first non-blank line before the
/// `Usage:` line.
pub fn parse_description(help: &str) -> Option<String> {
    for line in help.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("Usage:") {
            break;
        }
        if !trimmed.is_empty() {
            return Some(trimmed.to_owned());
        }
    }
    None
}

/// Extract the usage pattern: the line immediately following the `Usage:`
/// header, with the leading program-name token stripped.
pub fn parse_usage(help: &str) -> Option<String> {
    let mut lines = help.lines();
    while let Some(line) = lines.next() {
        if !line.trim().starts_with("Usage:") {
            continue;
        }
        let usage = lines.next()?.trim();
        let mut parts = usage.split_whitespace();
        // Skip the program name, keep the command pattern.
        parts.next()?;
        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return None;
        }
        return Some(rest.join(" "));
    }
    None
}

/// Extract flags from the `Flags:` section.
///
/// Each line beginning with a dash token is parsed into flag names, an
/// optional recognized type token, and a description.  The universal
/// `--help` flag is dropped; malformed lines are ignored.
pub fn parse_flags(help: &str) -> Vec<FlagDescriptor> {
    let mut flags = Vec::new();
    let mut in_section = false;

    for line in help.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(FLAGS_HEADER) {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.ends_with(':') {
            break;
        }

        if !trimmed.starts_with('-') {
            continue;
        }

        if let Some(flag) = parse_flag_line(trimmed)
            && !flag.names.contains("--help")
        {
            flags.push(flag);
        }
    }

    flags
}

/// Parse one flag line: `-t, --title string   Task title (required)`.
fn parse_flag_line(line: &str) -> Option<FlagDescriptor> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let mut names: Vec<&str> = Vec::new();
    let mut i = 0;

    // Leading dash tokens are flag names; a bare comma is a separator.
    while i < parts.len() && (parts[i].starts_with('-') || parts[i] == ",") {
        if parts[i] != "," {
            names.push(parts[i].trim_end_matches(','));
        }
        i += 1;
    }

    if names.is_empty() {
        return None;
    }

    let kind = if i < parts.len() && FLAG_TYPES.contains(&parts[i]) {
        let k = parts[i].to_owned();
        i += 1;
        Some(k)
    } else {
        None
    };

    let description = parts[i..].join(" ");

    Some(FlagDescriptor {
        names: names.join(", "),
        kind,
        description,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
