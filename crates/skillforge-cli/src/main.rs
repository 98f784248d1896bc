//! CLI entry point for SkillForge.
//!
//! This binary provides the `skillforge` command with subcommands for
//! launching the deploy wizard and listing discovered skills.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use skillforge_deploy::Builder;
use skillforge_manifest::{default_skills_root, discover_skills};
use skillforge_tui::{Wizard, run_tui};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// SkillForge — build and deploy CLI skills from an interactive wizard.
#[derive(Parser)]
#[command(
    name = "skillforge",
    version,
    about = "SkillForge — build and deploy CLI skills",
    long_about = "An interactive terminal wizard that compiles skill projects, collects their \
                  configuration, and deploys them with auto-generated documentation."
)]
struct Cli {
    /// Root directory containing skill projects (defaults to SKILLFORGE_ROOT
    /// or the current directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Write logs to this file instead of <root>/skillforge.log.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive deploy wizard (default).
    Run,

    /// List discovered skills and any manifest errors, then exit.
    List,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Run);

    let root = cli.root.clone().unwrap_or_else(default_skills_root);

    match command {
        Commands::Run => cmd_run(&cli, root).await,
        Commands::List => cmd_list(root),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: run
// ---------------------------------------------------------------------------

async fn cmd_run(cli: &Cli, root: PathBuf) -> Result<()> {
    // The TUI owns the terminal, so logs go to a file.
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| root.join("skillforge.log"));
    init_tracing_to_file("info", &log_path)?;

    info!(root = %root.display(), "starting skill wizard");

    let (manifests, errors) = discover_skills(&root).context("skill discovery failed")?;
    info!(
        skills = manifests.len(),
        errors = errors.len(),
        "skill discovery complete"
    );

    let builder = Builder::new(root.join("dist"));
    let wizard = Wizard::new(manifests, errors, builder, env!("CARGO_PKG_VERSION"));

    run_tui(wizard).await.context("wizard terminated")?;

    info!("wizard exited");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: list
// ---------------------------------------------------------------------------

fn cmd_list(root: PathBuf) -> Result<()> {
    init_tracing("warn");

    let (manifests, errors) = discover_skills(&root).context("skill discovery failed")?;

    println!();
    println!("  Skills in {}", root.display());
    println!();

    if manifests.is_empty() && errors.is_empty() {
        println!("  (none found — add a skill.toml to register one)");
        println!();
        return Ok(());
    }

    for manifest in &manifests {
        println!("  {:<20} {}", manifest.name, manifest.description);
    }

    if !errors.is_empty() {
        println!();
        println!("  Errors:");
        for err in &errors {
            println!("  {:<20} {}", err.name, err.reason);
        }
    }

    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber writing to stderr.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Initialize the tracing subscriber writing to a log file.  Used while the
/// wizard holds the terminal.
fn init_tracing_to_file(default_level: &str, path: &std::path::Path) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
