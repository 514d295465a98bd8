//! Dashboard
//!
//! Renders registry state as formatted terminal text: the skills table,
//! aggregate statistics, actionable insights, and a recent-activity tail.
//! Holds no state of its own beyond the capped activity log. The
//! interactive dispatch loop lives in the manager; this module supplies the
//! menu model (`MenuAction`) and all rendering.

use chrono::Local;
use colored::Colorize;

use crate::skills::info::SkillInfo;
use crate::skills::registry::{SkillRegistry, OUTDATED_THRESHOLD_DAYS};
use crate::ui::format;

/// Maximum activity entries retained; display shows the most recent 5.
const ACTIVITY_CAP: usize = 20;
const ACTIVITY_SHOWN: usize = 5;

/// Skill names wider than this are truncated in the table.
const NAME_WIDTH: usize = 25;

const RULE: &str =
    "======================================================================";

// ---------------------------------------------------------------------------
// Menu model
// ---------------------------------------------------------------------------

/// One entry of the interactive quick-action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Exit,
    CheckUpdates,
    CheckQuality,
    UpdateAll,
    InitMetadata,
    GenerateReport,
    SkillDetails,
    Rescan,
    AddPath,
}

/// Map a line of user input to a menu action. Anything but the digits
/// `0`-`8` (after trimming) is invalid.
pub fn parse_choice(input: &str) -> Option<MenuAction> {
    match input.trim() {
        "0" => Some(MenuAction::Exit),
        "1" => Some(MenuAction::CheckUpdates),
        "2" => Some(MenuAction::CheckQuality),
        "3" => Some(MenuAction::UpdateAll),
        "4" => Some(MenuAction::InitMetadata),
        "5" => Some(MenuAction::GenerateReport),
        "6" => Some(MenuAction::SkillDetails),
        "7" => Some(MenuAction::Rescan),
        "8" => Some(MenuAction::AddPath),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Dashboard {
    activity: Vec<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard::default()
    }

    /// Append a timestamped activity entry, dropping the oldest once the
    /// cap is exceeded.
    pub fn add_activity(&mut self, description: &str) {
        let timestamp = Local::now().format("%H:%M");
        self.activity.push(format!("{} - {}", timestamp, description));

        if self.activity.len() > ACTIVITY_CAP {
            let excess = self.activity.len() - ACTIVITY_CAP;
            self.activity.drain(..excess);
        }
    }

    #[cfg(test)]
    pub(crate) fn activity(&self) -> &[String] {
        &self.activity
    }

    /// Render the full dashboard. In interactive mode the quick-action menu
    /// is appended.
    pub fn show(&self, registry: &SkillRegistry, interactive: bool) {
        clear_screen();
        print_header();
        print_skills_table(registry);
        print_statistics(registry);
        print_insights(registry);
        self.print_activity();

        if interactive {
            print_menu();
        }

        println!();
    }

    fn print_activity(&self) {
        println!("\nRecent Activity:\n");

        if self.activity.is_empty() {
            println!("   No recent activity");
            return;
        }

        let start = self.activity.len().saturating_sub(ACTIVITY_SHOWN);
        for entry in &self.activity[start..] {
            println!("   • {}", entry);
        }
    }

    /// Render the detail view for one skill, looked up by exact name.
    /// An unknown name prints a not-found message and returns.
    pub fn show_skill_details(&self, registry: &SkillRegistry, name: &str) {
        let skill = match registry.get_by_name(name) {
            Some(s) => s,
            None => {
                println!("\n{} Skill '{}' not found", "!!".red(), name);
                return;
            }
        };

        println!("\n{}", RULE);
        println!("Skill Details: {}", skill.name.bold());
        println!("{}", RULE);

        println!("\nGeneral:");
        println!("   Name: {}", skill.name);
        println!("   Version: v{}", skill.version());
        println!("   Path: {}", skill.path.display());
        println!("   Last Updated: {}", skill.last_updated());

        if let Some(age) = skill.age_days() {
            println!("   Age: {} days", age);
            if age > OUTDATED_THRESHOLD_DAYS {
                println!(
                    "   {}",
                    format!("Warning: skill is outdated (>{} days)", OUTDATED_THRESHOLD_DAYS)
                        .yellow()
                );
            }
        }

        let stats = skill.stats();
        println!("\nStatistics:");
        println!("   Total Pages: {}", stats.total_pages);
        println!("   Total Links: {}", stats.total_links);
        println!("   Code Blocks: {}", stats.total_code_blocks);

        if let Some(quality) = stats.quality_score {
            println!("   Quality Score: {}/10", quality);
            println!("   {}", format::quality_tier(quality));
        }

        println!("\nStatus:");
        println!(
            "   Has Metadata: {}",
            if skill.has_metadata() { "yes".green() } else { "no".red() }
        );
        println!("   Status: {} {}", skill.status().marker(), skill.status().label());

        println!("{}", RULE);
    }
}

// ---------------------------------------------------------------------------
// Rendering blocks
// ---------------------------------------------------------------------------

fn clear_screen() {
    // ANSI clear + cursor home.
    print!("\x1b[2J\x1b[H");
}

fn print_header() {
    println!("\n{}", RULE);
    println!("{}", "SKILLDECK DASHBOARD".bold());
    println!("{}", RULE);
    println!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{}", RULE);
}

fn print_skills_table(registry: &SkillRegistry) {
    let skills = registry.all();

    if skills.is_empty() {
        println!("\nNo skills found.");
        println!("   Add search paths with: skilldeck --add-path /path/to/skills");
        return;
    }

    println!("\nYour Skills ({} total)\n", skills.len());
    println!("{}", RULE);

    for (i, skill) in skills.iter().enumerate() {
        let quality_str = match skill.quality_score() {
            Some(q) => format!("{:.1}/10", q),
            None => "No score".to_string(),
        };
        let metadata_icon = if skill.has_metadata() {
            "meta".green()
        } else {
            "----".red()
        };

        println!(
            "{:2}. {} {:<width$} v{:<8} {:>10} {}  {}",
            i + 1,
            skill.status().marker(),
            format::truncate(&skill.name, NAME_WIDTH),
            skill.version(),
            quality_str,
            metadata_icon,
            format::format_age(skill.age_days()),
            width = NAME_WIDTH,
        );
    }

    println!("{}", RULE);
}

fn print_statistics(registry: &SkillRegistry) {
    let stats = registry.statistics();
    let skills = registry.all();

    let total_pages: u64 = skills.iter().map(|s| s.stats().total_pages).sum();
    let total_links: u64 = skills.iter().map(|s| s.stats().total_links).sum();
    let total_code: u64 = skills.iter().map(|s| s.stats().total_code_blocks).sum();

    println!("\nStatistics:\n");
    println!("   Content:");
    println!("      • Total Skills: {}", stats.total);
    println!("      • Total Pages: {}", format::group_thousands(total_pages));
    if total_links > 0 {
        println!("      • Total Links: {}", format::group_thousands(total_links));
    }
    if total_code > 0 {
        println!("      • Code Examples: {}", format::group_thousands(total_code));
    }

    println!("\n   Health:");
    println!("      • With Metadata: {}/{}", stats.with_metadata, stats.total);

    if stats.avg_quality_score > 0.0 {
        println!("      • Avg Quality: {}/10", stats.avg_quality_score);
    }
    if stats.outdated > 0 {
        println!(
            "      • Outdated: {} (>{} days)",
            stats.outdated, OUTDATED_THRESHOLD_DAYS
        );
    }

    print_quality_distribution(skills, stats.total);
}

fn print_quality_distribution(skills: &[SkillInfo], total: usize) {
    let excellent = skills
        .iter()
        .filter(|s| matches!(s.quality_score(), Some(q) if q >= 9.0))
        .count();
    let good = skills
        .iter()
        .filter(|s| matches!(s.quality_score(), Some(q) if (7.0..9.0).contains(&q)))
        .count();
    let needs_work = skills
        .iter()
        .filter(|s| matches!(s.quality_score(), Some(q) if q < 7.0))
        .count();

    if excellent + good + needs_work == 0 {
        return;
    }

    println!("\n   Quality Distribution:");
    if excellent > 0 {
        println!(
            "      Excellent (9-10) {} {} skill{}",
            format::progress_bar(excellent, total, 10),
            excellent,
            plural(excellent)
        );
    }
    if good > 0 {
        println!(
            "      Good (7-9)       {} {} skill{}",
            format::progress_bar(good, total, 10),
            good,
            plural(good)
        );
    }
    if needs_work > 0 {
        println!(
            "      Needs Work (<7)  {} {} skill{}",
            format::progress_bar(needs_work, total, 10),
            needs_work,
            plural(needs_work)
        );
    }
}

fn print_insights(registry: &SkillRegistry) {
    let skills = registry.all();

    let no_metadata = registry.without_metadata().len();
    let outdated = registry.outdated(OUTDATED_THRESHOLD_DAYS).len();
    let no_score = skills.iter().filter(|s| s.quality_score().is_none()).count();

    let mut actions = Vec::new();
    if no_metadata > 0 {
        actions.push(format!(
            "{} skill{} missing metadata -> run --init-metadata",
            no_metadata,
            plural(no_metadata)
        ));
    }
    if outdated > 0 {
        actions.push(format!(
            "{} skill{} need update (>{} days) -> run --check-updates",
            outdated,
            plural(outdated),
            OUTDATED_THRESHOLD_DAYS
        ));
    }
    if no_score > 0 {
        actions.push(format!(
            "{} skill{} need quality check -> run --check-quality",
            no_score,
            plural(no_score)
        ));
    }

    if actions.is_empty() {
        println!("\n{}", "All good! No actions required.".green());
    } else {
        println!("\n{}\n", "Action Required:".yellow());
        for action in actions {
            println!("   {}", action);
        }
    }
}

fn print_menu() {
    println!("\nQuick Actions:\n");
    println!("   [1] Check all for updates     [2] Run quality checks");
    println!("   [3] Update outdated skills    [4] Init metadata for all");
    println!("   [5] Generate report           [6] Show skill details");
    println!("   [7] Rescan for skills         [8] Add search path");
    println!("   [0] Exit");
    println!();
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
