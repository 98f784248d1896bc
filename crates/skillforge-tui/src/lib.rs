//! Terminal wizard for building and deploying skills.
//!
//! This crate provides:
//!
//! - **Wizard state machine** — the multi-step flow from skill selection
//!   through variable entry, deploy-target entry, confirmation, background
//!   build/deploy, and the final result screen.
//!
//! - **Text input widget** — a single-line editor with cursor movement,
//!   placeholder text, and masked display for secrets.
//!
//! - **Rendering** — `ratatui` draw functions for every wizard screen.
//!
//! - **Event loop** — the raw-mode terminal loop that polls key events and
//!   drains background task completions.
//!
//! # Example
//!
//! ```rust,no_run
//! use skillforge_manifest::{default_skills_root, discover_skills};
//! use skillforge_deploy::Builder;
//! use skillforge_tui::{Wizard, run_tui};
//!
//! # async fn demo() -> skillforge_tui::Result<()> {
//! let root = default_skills_root();
//! let (manifests, errors) = discover_skills(&root).unwrap_or_default();
//! let builder = Builder::new(root.join("dist"));
//! let wizard = Wizard::new(manifests, errors, builder, "0.2.0");
//! run_tui(wizard).await
//! # }
//! ```

pub mod error;
pub mod input;
pub mod run;
pub mod ui;
pub mod wizard;

pub use error::{Result, TuiError};
pub use input::TextField;
pub use run::run_tui;
pub use wizard::{AppAction, Mode, Outcome, Wizard, WizardEvent};
