//! Skill Registry
//!
//! Owns the live list of discovered skills and the configured search paths.
//! Every filtering, sorting, and statistics query used by the dashboard and
//! the bulk layer goes through here. Search-path mutations persist the
//! config immediately so they survive a crash before the next scan.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::config::{self, ManagerConfig};
use crate::skills::discovery;
use crate::skills::info::SkillInfo;

/// Default threshold, in days, past which a skill counts as outdated.
pub const OUTDATED_THRESHOLD_DAYS: i64 = 30;

/// Aggregate statistics over the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryStats {
    pub total: usize,
    pub with_metadata: usize,
    pub without_metadata: usize,
    /// Mean quality score over skills that have one, rounded to one
    /// decimal; 0.0 when no skill has a score.
    pub avg_quality_score: f64,
    /// Count of skills older than [`OUTDATED_THRESHOLD_DAYS`].
    pub outdated: usize,
}

pub struct SkillRegistry {
    config_path: PathBuf,
    pub search_paths: Vec<String>,
    skills: Vec<SkillInfo>,
}

impl SkillRegistry {
    /// Create a registry, loading search paths from the config file at
    /// `config_path` (or the per-user default). A missing or corrupt config
    /// yields an empty path list.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(config::default_config_path);
        let config = config::load_config(&config_path);

        SkillRegistry {
            config_path,
            search_paths: config.search_paths,
            skills: Vec::new(),
        }
    }

    /// Add a search path, deduplicated by exact string match, and persist
    /// the config immediately.
    pub fn add_search_path(&mut self, path: &str) -> Result<()> {
        if self.search_paths.iter().any(|p| p == path) {
            return Ok(());
        }

        self.search_paths.push(path.to_string());
        self.save_config()
    }

    /// Replace the entire skill list with a fresh discovery pass over all
    /// search paths. A registry with no search paths is left untouched.
    pub fn scan_for_skills(&mut self) {
        if self.search_paths.is_empty() {
            return;
        }

        self.skills = discovery::discover_all(&self.search_paths);
        info!("scan complete: {} skill(s)", self.skills.len());
    }

    pub fn all(&self) -> &[SkillInfo] {
        &self.skills
    }

    /// Look up a skill by exact name.
    pub fn get_by_name(&self, name: &str) -> Option<&SkillInfo> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Skills whose known age exceeds `max_age_days`. Skills with unknown
    /// age are not considered outdated.
    pub fn outdated(&self, max_age_days: i64) -> Vec<&SkillInfo> {
        self.skills
            .iter()
            .filter(|s| matches!(s.age_days(), Some(age) if age > max_age_days))
            .collect()
    }

    /// Skills with no metadata sidecar.
    pub fn without_metadata(&self) -> Vec<&SkillInfo> {
        self.skills.iter().filter(|s| !s.has_metadata()).collect()
    }

    /// Aggregate statistics at the fixed 30-day outdated threshold.
    pub fn statistics(&self) -> RegistryStats {
        let total = self.skills.len();
        let with_metadata = self.skills.iter().filter(|s| s.has_metadata()).count();

        let scores: Vec<f64> = self.skills.iter().filter_map(|s| s.quality_score()).collect();
        let avg_quality_score = if scores.is_empty() {
            0.0
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        RegistryStats {
            total,
            with_metadata,
            without_metadata: total - with_metadata,
            avg_quality_score,
            outdated: self.outdated(OUTDATED_THRESHOLD_DAYS).len(),
        }
    }

    /// Sort skills in place by age. Unknown age sorts as oldest.
    pub fn sort_by_age(&mut self, descending: bool) {
        self.skills.sort_by_key(|s| s.age_days().unwrap_or(i64::MAX));
        if descending {
            self.skills.reverse();
        }
    }

    /// Sort skills in place by quality score; unknown scores as 0.
    /// Descending (best first) is the usual order.
    pub fn sort_by_quality(&mut self, descending: bool) {
        self.skills.sort_by(|a, b| {
            let qa = a.quality_score().unwrap_or(0.0);
            let qb = b.quality_score().unwrap_or(0.0);
            qa.partial_cmp(&qb).unwrap_or(std::cmp::Ordering::Equal)
        });
        if descending {
            self.skills.reverse();
        }
    }

    /// Sort skills in place by name, ascending.
    pub fn sort_by_name(&mut self) {
        self.skills.sort_by(|a, b| a.name.cmp(&b.name));
    }

    fn save_config(&self) -> Result<()> {
        let config = ManagerConfig {
            search_paths: self.search_paths.clone(),
            last_scan: None,
        };
        config::save_config(&self.config_path, &config)
    }

    /// Replace the skill list directly. Test seam; scanning is the normal
    /// way skills enter the registry.
    #[cfg(test)]
    pub(crate) fn set_skills(&mut self, skills: Vec<SkillInfo>) {
        self.skills = skills;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::info::{SkillMetadata, SkillStats};
    use chrono::{Duration, Local};

    fn registry_at(dir: &tempfile::TempDir) -> SkillRegistry {
        SkillRegistry::new(Some(dir.path().join("config.json")))
    }

    fn skill(name: &str, quality: Option<f64>, age_days: Option<i64>) -> SkillInfo {
        let metadata = match (quality, age_days) {
            (None, None) => None,
            _ => Some(SkillMetadata {
                last_updated: age_days.map(|d| {
                    (Local::now().naive_local() - Duration::days(d))
                        .format("%Y-%m-%dT%H:%M:%S")
                        .to_string()
                }),
                stats: quality.map(|q| SkillStats {
                    quality_score: Some(q),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        };

        SkillInfo {
            name: name.to_string(),
            path: std::path::PathBuf::from(format!("/skills/{}", name)),
            metadata,
            manifest_size: 0,
            manifest_modified: None,
            reference_count: 0,
        }
    }

    #[test]
    fn test_add_search_path_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);

        registry.add_search_path("/skills").unwrap();
        registry.add_search_path("/skills").unwrap();
        assert_eq!(registry.search_paths, vec!["/skills"]);

        // Persisted immediately: a fresh registry sees the path.
        let reloaded = registry_at(&dir);
        assert_eq!(reloaded.search_paths, vec!["/skills"]);
    }

    #[test]
    fn test_scan_with_no_paths_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.scan_for_skills();
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_statistics_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![
            skill("a", Some(9.5), Some(5)),
            skill("b", None, None),
            skill("c", Some(6.0), Some(100)),
        ]);

        let stats = registry.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_metadata, 2);
        assert_eq!(stats.without_metadata, 1);
        assert_eq!(stats.avg_quality_score, 7.8); // (9.5 + 6.0) / 2 rounded
        assert_eq!(stats.outdated, 1);
    }

    #[test]
    fn test_outdated_excludes_unknown_age() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![
            skill("fresh", None, Some(10)),
            skill("old", None, Some(45)),
            skill("mystery", None, None),
        ]);

        let outdated: Vec<_> = registry.outdated(30).iter().map(|s| s.name.clone()).collect();
        assert_eq!(outdated, vec!["old"]);
    }

    #[test]
    fn test_without_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![skill("a", Some(8.0), Some(1)), skill("b", None, None)]);

        let missing: Vec<_> = registry
            .without_metadata()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(missing, vec!["b"]);
    }

    #[test]
    fn test_sort_by_age_unknown_last() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![
            skill("mystery", None, None),
            skill("old", None, Some(50)),
            skill("fresh", None, Some(2)),
        ]);

        registry.sort_by_age(false);
        let names: Vec<_> = registry.all().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["fresh", "old", "mystery"]);
    }

    #[test]
    fn test_sort_by_quality_best_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![
            skill("mid", Some(7.0), None),
            skill("none", None, None),
            skill("top", Some(9.9), None),
        ]);

        registry.sort_by_quality(true);
        let names: Vec<_> = registry.all().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["top", "mid", "none"]);
    }

    #[test]
    fn test_sort_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![skill("zeta", None, None), skill("alpha", None, None)]);

        registry.sort_by_name();
        let names: Vec<_> = registry.all().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_get_by_name_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_at(&dir);
        registry.set_skills(vec![skill("rust-book", None, None)]);

        assert!(registry.get_by_name("rust-book").is_some());
        assert!(registry.get_by_name("rust").is_none());
    }
}
