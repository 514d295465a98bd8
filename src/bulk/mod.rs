//! Bulk Operations
//!
//! Applies one external-tool invocation per skill: quality checks, update
//! checks, updates, and metadata initialization. Execution is strictly
//! sequential in input order with a hard per-action timeout, and a failure
//! on one skill never aborts the batch -- it is recorded in that skill's
//! outcome and the run moves on.

pub mod parse;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

use crate::skills::info::SkillInfo;

/// Per-action timeouts, in seconds.
const QUALITY_CHECK_TIMEOUT_SECS: u64 = 300;
const UPDATE_CHECK_TIMEOUT_SECS: u64 = 120;
const UPDATE_TIMEOUT_SECS: u64 = 600;
const INIT_METADATA_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Why a single tool invocation produced no usable output.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("timeout after {0}s")]
    Timeout(u64),
    #[error("failed to launch {0}: {1}")]
    Launch(String, std::io::Error),
}

/// Captured output of one completed tool invocation.
#[derive(Debug)]
struct ToolOutput {
    exit_ok: bool,
    stdout: String,
}

/// Per-skill record produced by each bulk action.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub skill: String,
    pub success: bool,
    pub score: Option<f64>,
    pub has_updates: bool,
    pub skipped: bool,
    pub error: Option<String>,
}

impl BulkOutcome {
    fn failed(skill: &str, error: String) -> Self {
        BulkOutcome {
            skill: skill.to_string(),
            error: Some(error),
            ..Default::default()
        }
    }

    fn skipped(skill: &str) -> Self {
        BulkOutcome {
            skill: skill.to_string(),
            skipped: true,
            ..Default::default()
        }
    }
}

/// Hard per-call timeouts for each action, in seconds.
#[derive(Debug, Clone, Copy)]
struct Timeouts {
    quality: u64,
    update_check: u64,
    update: u64,
    init: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            quality: QUALITY_CHECK_TIMEOUT_SECS,
            update_check: UPDATE_CHECK_TIMEOUT_SECS,
            update: UPDATE_TIMEOUT_SECS,
            init: INIT_METADATA_TIMEOUT_SECS,
        }
    }
}

/// Invokes the two configured external tools across a skill list.
pub struct BulkOperations {
    quality_checker: Option<PathBuf>,
    updater: Option<PathBuf>,
    timeouts: Timeouts,
}

// ---------------------------------------------------------------------------
// Batch actions
// ---------------------------------------------------------------------------

impl BulkOperations {
    pub fn new(quality_checker: Option<PathBuf>, updater: Option<PathBuf>) -> Self {
        BulkOperations {
            quality_checker,
            updater,
            timeouts: Timeouts::default(),
        }
    }

    /// Run the quality checker on every skill. Success per skill means the
    /// checker exited 0; the score is scraped from its stdout and may be
    /// absent even on success.
    pub async fn check_quality_all(&self, skills: &[SkillInfo]) -> Result<Vec<BulkOutcome>> {
        let checker = match &self.quality_checker {
            Some(p) => p.clone(),
            None => bail!("Quality checker path not configured"),
        };

        println!("\nRunning quality checks on {} skills...\n", skills.len());

        let mut results = Vec::new();

        for (i, skill) in skills.iter().enumerate() {
            print!("   [{}/{}] Checking {}...", i + 1, skills.len(), skill.name);

            let skill_path = skill.path.to_string_lossy();
            let run = run_tool(
                &checker,
                &[skill_path.as_ref(), "--skip-ai"],
                self.timeouts.quality,
            )
            .await;

            match run {
                Ok(output) => {
                    let score = parse::overall_score(&output.stdout);
                    match score {
                        Some(s) => println!(" {} Score: {}/10", "ok".green(), s),
                        None => println!(" {} Completed", "--".yellow()),
                    }
                    results.push(BulkOutcome {
                        skill: skill.name.clone(),
                        success: output.exit_ok,
                        score,
                        ..Default::default()
                    });
                }
                Err(e) => {
                    warn!("quality check failed for {}: {}", skill.name, e);
                    println!(" {} {}", "!!".red(), e);
                    results.push(BulkOutcome::failed(&skill.name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Ask the updater whether each skill has pending updates. Skills
    /// without metadata are skipped (the updater needs it to compare), and
    /// recorded as such. A run that completes counts as successful
    /// regardless of the updater's exit code.
    pub async fn check_updates_all(&self, skills: &[SkillInfo]) -> Result<Vec<BulkOutcome>> {
        let updater = match &self.updater {
            Some(p) => p.clone(),
            None => bail!("Updater path not configured"),
        };

        println!("\nChecking updates for {} skills...\n", skills.len());

        let mut results = Vec::new();

        for (i, skill) in skills.iter().enumerate() {
            if !skill.has_metadata() {
                println!(
                    "   [{}/{}] {} {}",
                    i + 1,
                    skills.len(),
                    skill.name,
                    "(no metadata, skipped)".dimmed()
                );
                results.push(BulkOutcome::skipped(&skill.name));
                continue;
            }

            print!("   [{}/{}] Checking {}...", i + 1, skills.len(), skill.name);

            let skill_path = skill.path.to_string_lossy();
            let run = run_tool(
                &updater,
                &[skill_path.as_ref(), "--check-updates"],
                self.timeouts.update_check,
            )
            .await;

            match run {
                Ok(output) => {
                    let has_updates = parse::updates_available(&output.stdout);
                    if has_updates {
                        println!(" {} Updates available", "->".cyan());
                    } else {
                        println!(" {} Up to date", "ok".green());
                    }
                    results.push(BulkOutcome {
                        skill: skill.name.clone(),
                        success: true,
                        has_updates,
                        ..Default::default()
                    });
                }
                Err(e) => {
                    warn!("update check failed for {}: {}", skill.name, e);
                    println!(" {} {}", "!!".red(), e);
                    results.push(BulkOutcome::failed(&skill.name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Apply updates to every skill that has metadata. With `dry_run` the
    /// updater is told to simulate and makes no changes.
    pub async fn update_all(&self, skills: &[SkillInfo], dry_run: bool) -> Result<Vec<BulkOutcome>> {
        let updater = match &self.updater {
            Some(p) => p.clone(),
            None => bail!("Updater path not configured"),
        };

        println!("\nUpdating {} skills...\n", skills.len());
        if dry_run {
            println!("   {}\n", "(dry run -- no actual changes)".yellow());
        }

        let mut results = Vec::new();

        for (i, skill) in skills.iter().enumerate() {
            if !skill.has_metadata() {
                println!(
                    "   [{}/{}] {} {}",
                    i + 1,
                    skills.len(),
                    skill.name,
                    "(no metadata, skipped)".dimmed()
                );
                continue;
            }

            println!("   [{}/{}] Updating {}...", i + 1, skills.len(), skill.name);

            let skill_path = skill.path.to_string_lossy().to_string();
            let mut args = vec![skill_path.as_str(), "--update"];
            if dry_run {
                args.push("--dry-run");
            }

            match run_tool(&updater, &args, self.timeouts.update).await {
                Ok(output) => {
                    if output.exit_ok {
                        println!("      {} Updated successfully", "ok".green());
                    } else {
                        println!("      {} Update failed", "!!".yellow());
                    }
                    results.push(BulkOutcome {
                        skill: skill.name.clone(),
                        success: output.exit_ok,
                        ..Default::default()
                    });
                }
                Err(e) => {
                    warn!("update failed for {}: {}", skill.name, e);
                    println!("      {} {}", "!!".red(), e);
                    results.push(BulkOutcome::failed(&skill.name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Initialize metadata for every skill that lacks it. Skills that
    /// already have metadata are not touched.
    pub async fn init_metadata_all(&self, skills: &[SkillInfo]) -> Result<Vec<BulkOutcome>> {
        let updater = match &self.updater {
            Some(p) => p.clone(),
            None => bail!("Updater path not configured"),
        };

        let targets: Vec<&SkillInfo> = skills.iter().filter(|s| !s.has_metadata()).collect();

        if targets.is_empty() {
            println!("\nAll skills already have metadata");
            return Ok(Vec::new());
        }

        println!("\nInitializing metadata for {} skills...\n", targets.len());

        let mut results = Vec::new();

        for (i, skill) in targets.iter().enumerate() {
            print!("   [{}/{}] {}...", i + 1, targets.len(), skill.name);

            let skill_path = skill.path.to_string_lossy();
            let run = run_tool(
                &updater,
                &[skill_path.as_ref(), "--init-metadata"],
                self.timeouts.init,
            )
            .await;

            match run {
                Ok(output) => {
                    println!(" {}", if output.exit_ok { "ok".green() } else { "!!".yellow() });
                    results.push(BulkOutcome {
                        skill: skill.name.clone(),
                        success: output.exit_ok,
                        ..Default::default()
                    });
                }
                Err(e) => {
                    warn!("metadata init failed for {}: {}", skill.name, e);
                    println!(" {}", "!!".red());
                    results.push(BulkOutcome::failed(&skill.name, e.to_string()));
                }
            }
        }

        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Process execution
// ---------------------------------------------------------------------------

/// Run one external tool with captured output and a hard timeout.
///
/// A non-zero exit is not an error here -- the caller decides what the exit
/// code means for its action. Only a timeout or a launch failure surfaces
/// as [`ToolError`].
async fn run_tool(program: &Path, args: &[&str], timeout_secs: u64) -> Result<ToolOutput, ToolError> {
    // kill_on_drop so an abandoned (timed-out) child does not linger.
    let fut = Command::new(program).args(args).kill_on_drop(true).output();

    let output = match timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ToolError::Launch(program.display().to_string(), e));
        }
        Err(_) => return Err(ToolError::Timeout(timeout_secs)),
    };

    Ok(ToolOutput {
        exit_ok: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
    })
}
