//! Skill Info
//!
//! A fully-typed view of one skill directory on disk: its metadata sidecar
//! (`.skill_metadata.json`) plus the filesystem facts captured at discovery
//! time. Every derived getter falls back to a documented default when the
//! sidecar is missing or malformed; none of them can fail.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name of the optional metadata sidecar inside a skill directory.
pub const METADATA_FILENAME: &str = ".skill_metadata.json";

/// File name of the required manifest inside a skill directory.
pub const MANIFEST_FILENAME: &str = "SKILL.md";

/// Name of the required references subdirectory.
pub const REFERENCES_DIRNAME: &str = "references";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Content statistics stored under the sidecar's `stats` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillStats {
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub total_links: u64,
    #[serde(default)]
    pub total_code_blocks: u64,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

/// Deserialized metadata sidecar. All fields are optional; unknown keys in
/// the file are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillMetadata {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub stats: Option<SkillStats>,
}

/// Tri-state health classification by age since last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStatus {
    /// Updated within the last 30 days.
    Healthy,
    /// More than 30 days old.
    Attention,
    /// More than 90 days old.
    Critical,
    /// No usable `last_updated` timestamp.
    Unknown,
}

impl SkillStatus {
    /// Colored one-character terminal marker.
    pub fn marker(&self) -> String {
        match self {
            SkillStatus::Healthy => "●".green().to_string(),
            SkillStatus::Attention => "●".yellow().to_string(),
            SkillStatus::Critical => "●".red().to_string(),
            SkillStatus::Unknown => "?".yellow().to_string(),
        }
    }

    /// Plain-text label, used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SkillStatus::Healthy => "healthy",
            SkillStatus::Attention => "needs attention",
            SkillStatus::Critical => "critical",
            SkillStatus::Unknown => "unknown",
        }
    }
}

/// One skill directory plus everything known about it.
#[derive(Debug, Clone)]
pub struct SkillInfo {
    /// Directory name; the skill's identity.
    pub name: String,
    /// Absolute path to the skill directory.
    pub path: PathBuf,
    /// Parsed sidecar, or `None` when absent/unreadable/empty.
    pub metadata: Option<SkillMetadata>,
    /// Size of `SKILL.md` in bytes.
    pub manifest_size: u64,
    /// Manifest mtime as an ISO-8601 string, when the filesystem provides it.
    pub manifest_modified: Option<String>,
    /// Number of `*.md` files directly under `references/`.
    pub reference_count: usize,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl SkillInfo {
    /// Build a `SkillInfo` from a skill directory, reading the manifest
    /// facts and loading the metadata sidecar. Never fails: missing pieces
    /// simply leave their defaults.
    pub fn from_dir(path: &Path) -> SkillInfo {
        let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        let name = abs
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut manifest_size = 0;
        let mut manifest_modified = None;
        if let Ok(meta) = fs::metadata(abs.join(MANIFEST_FILENAME)) {
            manifest_size = meta.len();
            if let Ok(mtime) = meta.modified() {
                let dt: DateTime<Local> = mtime.into();
                manifest_modified = Some(dt.to_rfc3339());
            }
        }

        let reference_count = count_reference_files(&abs.join(REFERENCES_DIRNAME));
        let metadata = load_metadata(&abs);

        SkillInfo {
            name,
            path: abs,
            metadata,
            manifest_size,
            manifest_modified,
            reference_count,
        }
    }
}

/// Load the metadata sidecar from a skill directory.
///
/// Returns `None` for a missing file, unreadable file, invalid JSON, a
/// non-object document, or the empty object `{}` -- all of which count as
/// "no metadata".
pub fn load_metadata(skill_dir: &Path) -> Option<SkillMetadata> {
    let sidecar = skill_dir.join(METADATA_FILENAME);
    if !sidecar.exists() {
        return None;
    }

    let contents = fs::read_to_string(&sidecar).ok()?;

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            debug!("malformed metadata in {}: {}", sidecar.display(), e);
            return None;
        }
    };

    match value.as_object() {
        Some(map) if !map.is_empty() => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Count Markdown files directly under `references/` (no recursion).
fn count_reference_files(references_dir: &Path) -> usize {
    let entries = match fs::read_dir(references_dir) {
        Ok(e) => e,
        Err(_) => return 0,
    };

    entries
        .flatten()
        .filter(|e| {
            let path = e.path();
            path.is_file() && path.extension().and_then(|x| x.to_str()) == Some("md")
        })
        .count()
}

// ---------------------------------------------------------------------------
// Derived getters
// ---------------------------------------------------------------------------

impl SkillInfo {
    /// Metadata `version`, or the literal `"Unknown"`.
    pub fn version(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| m.version.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// `last_updated` reformatted as `YYYY-MM-DD`, or `"Unknown"` when
    /// missing or unparseable.
    pub fn last_updated(&self) -> String {
        self.last_updated_timestamp()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Whole days between now and `last_updated`; `None` when missing or
    /// unparseable.
    pub fn age_days(&self) -> Option<i64> {
        let dt = self.last_updated_timestamp()?;
        Some((Local::now().naive_local() - dt).num_days())
    }

    /// Health classification by age. See [`SkillStatus`] for the bands.
    pub fn status(&self) -> SkillStatus {
        match self.age_days() {
            None => SkillStatus::Unknown,
            Some(age) if age > 90 => SkillStatus::Critical,
            Some(age) if age > 30 => SkillStatus::Attention,
            Some(_) => SkillStatus::Healthy,
        }
    }

    /// `stats.quality_score`, when present.
    pub fn quality_score(&self) -> Option<f64> {
        self.metadata
            .as_ref()
            .and_then(|m| m.stats.as_ref())
            .and_then(|s| s.quality_score)
    }

    /// True iff a non-empty metadata sidecar was loaded.
    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// Normalized content statistics, with zero / `None` defaults.
    pub fn stats(&self) -> SkillStats {
        self.metadata
            .as_ref()
            .and_then(|m| m.stats.clone())
            .unwrap_or_default()
    }

    /// One-line summary for scan listings.
    pub fn summary(&self) -> String {
        let age_str = match self.age_days() {
            Some(age) => format!("{}d ago", age),
            None => "Unknown age".to_string(),
        };
        let quality_str = match self.quality_score() {
            Some(q) => format!("{}/10", q),
            None => "No score".to_string(),
        };

        format!(
            "{} {} (v{}) - {} - Updated {}",
            self.status().marker(),
            self.name,
            self.version(),
            quality_str,
            age_str,
        )
    }

    /// Parse `last_updated` as a naive local timestamp.
    ///
    /// Accepts full RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` form, or a
    /// bare `YYYY-MM-DD` date (midnight).
    fn last_updated_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.metadata.as_ref()?.last_updated.as_deref()?;
        parse_iso_timestamp(raw)
    }
}

/// Lenient ISO-8601 parser covering the forms the sidecars actually use.
pub fn parse_iso_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::fs;

    /// A SkillInfo with no on-disk backing, for getter tests.
    fn bare_skill(metadata: Option<SkillMetadata>) -> SkillInfo {
        SkillInfo {
            name: "test-skill".to_string(),
            path: PathBuf::from("/tmp/test-skill"),
            metadata,
            manifest_size: 0,
            manifest_modified: None,
            reference_count: 0,
        }
    }

    fn metadata_updated_days_ago(days: i64) -> SkillMetadata {
        let ts = Local::now().naive_local() - Duration::days(days);
        SkillMetadata {
            last_updated: Some(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_without_metadata() {
        let skill = bare_skill(None);
        assert!(!skill.has_metadata());
        assert_eq!(skill.version(), "Unknown");
        assert_eq!(skill.last_updated(), "Unknown");
        assert_eq!(skill.age_days(), None);
        assert_eq!(skill.quality_score(), None);
        assert_eq!(skill.stats().total_pages, 0);
        assert_eq!(skill.status(), SkillStatus::Unknown);
    }

    #[test]
    fn test_last_updated_reformats_to_date() {
        let skill = bare_skill(Some(SkillMetadata {
            last_updated: Some("2025-06-15T10:30:00".to_string()),
            ..Default::default()
        }));
        assert_eq!(skill.last_updated(), "2025-06-15");
    }

    #[test]
    fn test_unparseable_last_updated_is_unknown() {
        let skill = bare_skill(Some(SkillMetadata {
            last_updated: Some("next tuesday".to_string()),
            ..Default::default()
        }));
        assert_eq!(skill.last_updated(), "Unknown");
        assert_eq!(skill.age_days(), None);
    }

    #[test]
    fn test_age_days() {
        let skill = bare_skill(Some(metadata_updated_days_ago(5)));
        assert_eq!(skill.age_days(), Some(5));
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(
            bare_skill(Some(metadata_updated_days_ago(30))).status(),
            SkillStatus::Healthy
        );
        assert_eq!(
            bare_skill(Some(metadata_updated_days_ago(31))).status(),
            SkillStatus::Attention
        );
        assert_eq!(
            bare_skill(Some(metadata_updated_days_ago(90))).status(),
            SkillStatus::Attention
        );
        assert_eq!(
            bare_skill(Some(metadata_updated_days_ago(91))).status(),
            SkillStatus::Critical
        );
        assert_eq!(bare_skill(None).status(), SkillStatus::Unknown);
    }

    #[test]
    fn test_summary_renders_zero_age_and_zero_score() {
        let skill = bare_skill(Some(SkillMetadata {
            last_updated: Some(
                Local::now()
                    .naive_local()
                    .format("%Y-%m-%dT%H:%M:%S")
                    .to_string(),
            ),
            stats: Some(SkillStats {
                quality_score: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        }));

        // A known age of 0 and a literal 0.0 score are real values, not
        // missing data, and render as such.
        let summary = skill.summary();
        assert!(summary.contains("0/10"));
        assert!(summary.contains("Updated 0d ago"));
    }

    #[test]
    fn test_quality_score_from_stats() {
        let skill = bare_skill(Some(SkillMetadata {
            stats: Some(SkillStats {
                quality_score: Some(8.5),
                ..Default::default()
            }),
            ..Default::default()
        }));
        assert_eq!(skill.quality_score(), Some(8.5));
    }

    #[test]
    fn test_load_metadata_empty_object_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILENAME), "{}").unwrap();
        assert!(load_metadata(dir.path()).is_none());
    }

    #[test]
    fn test_load_metadata_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILENAME), "{broken").unwrap();
        assert!(load_metadata(dir.path()).is_none());
    }

    #[test]
    fn test_load_metadata_valid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILENAME),
            r#"{"version": "1.2.0", "stats": {"total_pages": 42, "quality_score": 9.1}}"#,
        )
        .unwrap();

        let metadata = load_metadata(dir.path()).unwrap();
        assert_eq!(metadata.version.as_deref(), Some("1.2.0"));
        let stats = metadata.stats.unwrap();
        assert_eq!(stats.total_pages, 42);
        assert_eq!(stats.quality_score, Some(9.1));
    }

    #[test]
    fn test_parse_iso_timestamp_forms() {
        assert!(parse_iso_timestamp("2025-06-15T10:30:00").is_some());
        assert!(parse_iso_timestamp("2025-06-15T10:30:00.123456").is_some());
        assert!(parse_iso_timestamp("2025-06-15T10:30:00+02:00").is_some());
        assert!(parse_iso_timestamp("2025-06-15").is_some());
        assert!(parse_iso_timestamp("not a date").is_none());
    }
}
