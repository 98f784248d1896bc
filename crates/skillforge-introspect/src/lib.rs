//! Command introspection for SkillForge.
//!
//! Reconstructs a CLI binary's command tree purely by executing it with a
//! help flag and parsing the textual result — bytes in, [`CommandTree`]
//! out.  The narrow surface keeps the heuristic text scraping isolated:
//! if a target ever grows structured introspection, only this crate needs
//! replacing.
//!
//! - [`introspect`] — recursive discovery, two nesting levels, best-effort.
//! - [`help`] — the pure parsing functions, exposed for tests and reuse.
//!
//! Per-command invocation failures degrade the tree instead of failing the
//! caller: help output is never allowed to hard-fail a deploy.

pub mod error;
pub mod help;
pub mod introspect;
pub mod runner;
pub mod types;

pub use error::{IntrospectError, Result};
pub use help::{parse_description, parse_flags, parse_subcommands, parse_usage};
pub use introspect::introspect;
pub use runner::run_help;
pub use types::{CommandNode, CommandTree, FlagDescriptor};
