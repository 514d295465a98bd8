//! Skilldeck CLI
//!
//! Entry point: parses flags, loads config, performs the startup scan, and
//! dispatches the first matching primary action (or the dashboard when no
//! action is given). Exit codes: 0 on success, 130 on user interrupt, 1 on
//! any uncaught error.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skilldeck::config;
use skilldeck::manager::SkillManager;
use skilldeck::ui::prompt::TermPrompt;

/// Skilldeck -- local skill catalog and dashboard
#[derive(Parser, Debug)]
#[command(
    name = "skilldeck",
    version,
    about = "Central dashboard for locally stored skill packages",
    after_help = "Examples:
  # Show dashboard
  skilldeck

  # Add search path
  skilldeck --add-path ~/skills/output

  # Setup integrations and check quality
  skilldeck --quality-checker /opt/skill-quality-checker --check-quality

  # Check for updates
  skilldeck --updater /opt/skill-updater --check-updates

  # Generate report
  skilldeck --report skills_report.md"
)]
struct Cli {
    /// Add a search path for skills
    #[arg(long = "add-path", value_name = "PATH")]
    add_path: Option<String>,

    /// Rescan for skills
    #[arg(long)]
    scan: bool,

    /// Show details for a specific skill
    #[arg(long, value_name = "NAME")]
    skill: Option<String>,

    /// Check quality of all skills
    #[arg(long = "check-quality")]
    check_quality: bool,

    /// Check for updates on all skills
    #[arg(long = "check-updates")]
    check_updates: bool,

    /// Update all skills
    #[arg(long = "update-all")]
    update_all: bool,

    /// Initialize metadata for all skills
    #[arg(long = "init-metadata")]
    init_metadata: bool,

    /// Generate a Markdown report (to FILE, or stdout when omitted)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    report: Option<Option<String>>,

    /// Path to the skill quality checker executable
    #[arg(long = "quality-checker", value_name = "PATH")]
    quality_checker: Option<String>,

    /// Path to the skill updater executable
    #[arg(long, value_name = "PATH")]
    updater: Option<String>,

    /// Config file path (default: ~/.skilldeck/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Simulate operations without making changes
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Run the interactive dashboard
    #[arg(long, short)]
    interactive: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

/// Build the manager and dispatch the requested action. The first matching
/// primary action wins; with none, the dashboard is shown.
async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .as_deref()
        .map(|p| PathBuf::from(config::resolve_path(p)));

    let mut manager = SkillManager::new(config_path);

    if cli.quality_checker.is_some() || cli.updater.is_some() {
        manager.setup_integrations(
            cli.quality_checker
                .as_deref()
                .map(|p| PathBuf::from(config::resolve_path(p))),
            cli.updater
                .as_deref()
                .map(|p| PathBuf::from(config::resolve_path(p))),
        );
    }

    // Load existing skills before any action runs.
    manager.scan_for_skills();

    if let Some(path) = &cli.add_path {
        manager.add_search_path(path)?;
    } else if cli.scan {
        manager.scan_for_skills();
    } else if let Some(name) = &cli.skill {
        manager.show_skill_details(name);
    } else if cli.check_quality {
        manager.check_quality_all().await;
    } else if cli.check_updates {
        manager.check_updates_all().await;
    } else if cli.update_all {
        manager.update_all(cli.dry_run).await;
    } else if cli.init_metadata {
        manager.init_metadata_all().await;
    } else if let Some(report) = &cli.report {
        let output = report.as_deref().map(PathBuf::from);
        manager.generate_report(output.as_deref())?;
    } else if cli.interactive {
        let mut prompt = TermPrompt;
        manager.run_interactive(&mut prompt).await?;
    } else {
        manager.show_dashboard();
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("\n{} {:?}", "Error:".red(), e);
                1
            }
        },
        _ = signal::ctrl_c() => {
            println!("\n\nInterrupted by user");
            130
        }
    };

    std::process::exit(code);
}
