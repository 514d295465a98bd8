//! Skill Manager
//!
//! Top-level orchestrator: wires the registry, dashboard, and bulk layer
//! together and exposes the operations the CLI and the interactive menu
//! dispatch into. Also builds the Markdown report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;

use crate::bulk::BulkOperations;
use crate::config;
use crate::skills::registry::SkillRegistry;
use crate::ui::dashboard::{parse_choice, Dashboard, MenuAction};
use crate::ui::prompt::Prompt;

/// File the interactive menu writes its report to.
const REPORT_FILENAME: &str = "skill_report.md";

pub struct SkillManager {
    pub registry: SkillRegistry,
    pub dashboard: Dashboard,
    bulk: Option<BulkOperations>,
}

impl SkillManager {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        SkillManager {
            registry: SkillRegistry::new(config_path),
            dashboard: Dashboard::new(),
            bulk: None,
        }
    }

    /// Configure the external tool integrations. Without this, every bulk
    /// action prints a hint and does nothing.
    pub fn setup_integrations(
        &mut self,
        quality_checker: Option<PathBuf>,
        updater: Option<PathBuf>,
    ) {
        self.bulk = Some(BulkOperations::new(quality_checker, updater));
    }

    // -----------------------------------------------------------------------
    // Registry-facing operations
    // -----------------------------------------------------------------------

    /// Add a search path (with `~` expansion) and rescan. A nonexistent
    /// path is rejected with a console message, not an error.
    pub fn add_search_path(&mut self, path: &str) -> Result<()> {
        let resolved = config::resolve_path(path);
        println!("\nAdding search path: {}", resolved);

        if !Path::new(&resolved).exists() {
            println!("{} Path does not exist: {}", "!!".red(), resolved);
            return Ok(());
        }

        self.registry.add_search_path(&resolved)?;
        println!("{} Search path added", "ok".green());

        self.scan_for_skills();
        Ok(())
    }

    /// Rescan all search paths and list what was found.
    pub fn scan_for_skills(&mut self) {
        println!("\nScanning for skills...");

        self.registry.scan_for_skills();
        let skills = self.registry.all();

        println!("{} Found {} skills", "ok".green(), skills.len());

        if !skills.is_empty() {
            println!("\nSkills found:");
            for skill in skills {
                println!("   {}", skill.summary());
            }
        }
    }

    pub fn show_skill_details(&self, name: &str) {
        self.dashboard.show_skill_details(&self.registry, name);
    }

    pub fn show_dashboard(&self) {
        self.dashboard.show(&self.registry, false);
    }

    // -----------------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------------

    /// Run quality checks on every skill and print the checked count.
    pub async fn check_quality_all(&self) {
        let (bulk, total) = match self.bulk_ready("Set tool paths with --quality-checker and --updater") {
            Some(ready) => ready,
            None => return,
        };

        match bulk.check_quality_all(self.registry.all()).await {
            Ok(results) => {
                let successful = results.iter().filter(|r| r.success).count();
                println!("\n{} Checked {}/{} skills", "ok".green(), successful, total);
            }
            Err(e) => println!("\n{} {}", "!!".red(), e),
        }
    }

    /// Check every skill for pending updates and print how many have some.
    pub async fn check_updates_all(&self) {
        let (bulk, _) = match self.bulk_ready("Set updater path with --updater") {
            Some(ready) => ready,
            None => return,
        };

        match bulk.check_updates_all(self.registry.all()).await {
            Ok(results) => {
                let needs_update = results.iter().filter(|r| r.has_updates).count();
                println!("\n{} skills have updates available", needs_update);
            }
            Err(e) => println!("\n{} {}", "!!".red(), e),
        }
    }

    /// Apply updates to every skill with metadata.
    pub async fn update_all(&self, dry_run: bool) {
        let (bulk, total) = match self.bulk_ready("Set updater path with --updater") {
            Some(ready) => ready,
            None => return,
        };

        match bulk.update_all(self.registry.all(), dry_run).await {
            Ok(results) => {
                let successful = results.iter().filter(|r| r.success).count();
                println!("\n{} Updated {}/{} skills", "ok".green(), successful, total);
            }
            Err(e) => println!("\n{} {}", "!!".red(), e),
        }
    }

    /// Initialize metadata for skills lacking it.
    pub async fn init_metadata_all(&self) {
        let (bulk, _) = match self.bulk_ready("Set updater path with --updater") {
            Some(ready) => ready,
            None => return,
        };

        if let Err(e) = bulk.init_metadata_all(self.registry.all()).await {
            println!("\n{} {}", "!!".red(), e);
        }
    }

    /// Common guard for bulk actions: integrations configured and at least
    /// one skill known. Prints the reason and returns `None` otherwise.
    fn bulk_ready(&self, hint: &str) -> Option<(&BulkOperations, usize)> {
        let bulk = match &self.bulk {
            Some(b) => b,
            None => {
                println!("\n{} Bulk operations not configured", "!!".red());
                println!("   {}", hint);
                return None;
            }
        };

        let total = self.registry.all().len();
        if total == 0 {
            println!("\n{} No skills found", "!!".red());
            return None;
        }

        Some((bulk, total))
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------

    /// Build the Markdown report over the current registry state.
    pub fn render_report(&self) -> String {
        let stats = self.registry.statistics();

        let mut report = String::from("# Skilldeck Report\n\n");
        report.push_str(&format!(
            "**Generated**: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M")
        ));

        report.push_str("## Summary\n\n");
        report.push_str(&format!("- Total Skills: {}\n", stats.total));
        report.push_str(&format!("- With Metadata: {}\n", stats.with_metadata));
        report.push_str(&format!("- Without Metadata: {}\n", stats.without_metadata));
        report.push_str(&format!("- Avg Quality Score: {}/10\n", stats.avg_quality_score));
        report.push_str(&format!("- Outdated Skills: {}\n\n", stats.outdated));

        report.push_str("## Skills\n\n");
        for skill in self.registry.all() {
            report.push_str(&format!("### {}\n\n", skill.name));
            report.push_str(&format!("- Version: v{}\n", skill.version()));
            report.push_str(&format!("- Last Updated: {}\n", skill.last_updated()));

            if let Some(quality) = skill.quality_score() {
                report.push_str(&format!("- Quality Score: {}/10\n", quality));
            }

            report.push_str(&format!("- Status: {}\n\n", skill.status().label()));
        }

        report
    }

    /// Write the report to `output`, or print it to stdout when `None`.
    pub fn generate_report(&self, output: Option<&Path>) -> Result<()> {
        let report = self.render_report();

        match output {
            Some(path) => {
                fs::write(path, &report)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("{} Report saved to: {}", "ok".green(), path.display());
            }
            None => println!("{}", report),
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Interactive loop
    // -----------------------------------------------------------------------

    /// Run the interactive dashboard loop until the user exits or input
    /// ends. Action errors are printed and the loop continues; only a
    /// config-write failure from adding a search path is fatal.
    pub async fn run_interactive<P: Prompt>(&mut self, prompt: &mut P) -> Result<()> {
        loop {
            self.dashboard.show(&self.registry, true);

            let line = match prompt.read_line("Choose action (0-8)") {
                Ok(l) => l,
                Err(_) => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            };

            let action = match parse_choice(&line) {
                Some(a) => a,
                None => {
                    println!("\n{} Invalid choice. Try again.", "!!".red());
                    if prompt.pause().is_err() {
                        return Ok(());
                    }
                    continue;
                }
            };

            match action {
                MenuAction::Exit => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
                MenuAction::CheckUpdates => {
                    println!("\nChecking for updates...");
                    self.dashboard.add_activity("Checking for updates");
                    self.check_updates_all().await;
                }
                MenuAction::CheckQuality => {
                    println!("\nRunning quality checks...");
                    self.dashboard.add_activity("Running quality checks");
                    self.check_quality_all().await;
                }
                MenuAction::UpdateAll => {
                    println!("\nUpdating skills...");
                    self.dashboard.add_activity("Updating skills");
                    self.update_all(false).await;
                }
                MenuAction::InitMetadata => {
                    println!("\nInitializing metadata...");
                    self.dashboard.add_activity("Initializing metadata");
                    self.init_metadata_all().await;
                }
                MenuAction::GenerateReport => {
                    println!("\nGenerating report...");
                    self.dashboard.add_activity("Generated report");
                    if let Err(e) = self.generate_report(Some(Path::new(REPORT_FILENAME))) {
                        println!("\n{} {:#}", "!!".red(), e);
                    }
                }
                MenuAction::SkillDetails => {
                    let name = match prompt.read_line("Enter skill name") {
                        Ok(n) => n,
                        Err(_) => {
                            println!("\nGoodbye!");
                            return Ok(());
                        }
                    };
                    self.show_skill_details(name.trim());
                }
                MenuAction::Rescan => {
                    println!("\nRescanning for skills...");
                    self.dashboard.add_activity("Rescanned for skills");
                    self.scan_for_skills();
                }
                MenuAction::AddPath => {
                    let path = match prompt.read_line("Enter path to add") {
                        Ok(p) => p,
                        Err(_) => {
                            println!("\nGoodbye!");
                            return Ok(());
                        }
                    };
                    let path = path.trim().to_string();
                    self.add_search_path(&path)?;
                    self.dashboard.add_activity(&format!("Added path: {}", path));
                }
            }

            if prompt.pause().is_err() {
                return Ok(());
            }
        }
    }
}
