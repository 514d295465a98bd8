//! Skill Discovery
//!
//! Walks configured search paths looking for valid skill directories. The
//! walk is fixed at two levels: a root is checked for validity itself; if it
//! is not a skill, each of its immediate children is checked. Nothing
//! deeper is ever visited.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::skills::info::{SkillInfo, MANIFEST_FILENAME, REFERENCES_DIRNAME};

/// A directory is a valid skill iff it directly contains the `SKILL.md`
/// manifest and a `references` subdirectory.
pub fn is_skill_dir(path: &Path) -> bool {
    path.join(MANIFEST_FILENAME).exists() && path.join(REFERENCES_DIRNAME).exists()
}

/// Scan one root for skills.
///
/// A nonexistent or non-directory root yields no results and no error. If
/// the root is itself a valid skill, only it is returned; otherwise each
/// immediate child directory is checked. Children are visited in name
/// order so output is deterministic for fixed filesystem state.
pub fn scan_root(root: &Path) -> Vec<SkillInfo> {
    if !root.is_dir() {
        debug!("skipping non-directory search path {}", root.display());
        return Vec::new();
    }

    if is_skill_dir(root) {
        return vec![SkillInfo::from_dir(root)];
    }

    let entries = match fs::read_dir(root) {
        Ok(e) => e,
        Err(e) => {
            debug!("failed to read {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut children: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    children.sort();

    children
        .iter()
        .filter(|p| is_skill_dir(p))
        .map(|p| SkillInfo::from_dir(p))
        .collect()
}

/// Discover all skills under the given search paths, in configured order.
pub fn discover_all(search_paths: &[String]) -> Vec<SkillInfo> {
    let mut all = Vec::new();

    for path in search_paths {
        let found = scan_root(Path::new(path));
        debug!("{}: {} skill(s)", path, found.len());
        all.extend(found);
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Create a valid skill directory under `root` and return its path.
    fn make_skill(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("references")).unwrap();
        fs::write(dir.join("SKILL.md"), "# skill\n").unwrap();
        dir
    }

    #[test]
    fn test_is_skill_dir_requires_both_parts() {
        let tmp = tempfile::tempdir().unwrap();

        let manifest_only = tmp.path().join("a");
        fs::create_dir_all(&manifest_only).unwrap();
        fs::write(manifest_only.join("SKILL.md"), "x").unwrap();
        assert!(!is_skill_dir(&manifest_only));

        let references_only = tmp.path().join("b");
        fs::create_dir_all(references_only.join("references")).unwrap();
        assert!(!is_skill_dir(&references_only));

        let full = make_skill(tmp.path(), "c");
        assert!(is_skill_dir(&full));
    }

    #[test]
    fn test_scan_root_missing_path() {
        assert!(scan_root(Path::new("/no/such/path")).is_empty());
    }

    #[test]
    fn test_scan_root_that_is_itself_a_skill() {
        let tmp = tempfile::tempdir().unwrap();
        let skill = make_skill(tmp.path(), "solo");

        let found = scan_root(&skill);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "solo");
    }

    #[test]
    fn test_scan_root_checks_children_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        make_skill(tmp.path(), "zeta");
        make_skill(tmp.path(), "alpha");
        fs::create_dir_all(tmp.path().join("not-a-skill")).unwrap();

        let found = scan_root(tmp.path());
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_no_recursion_below_two_levels() {
        let tmp = tempfile::tempdir().unwrap();
        // A valid skill nested one level too deep must not be found.
        let mid = tmp.path().join("group");
        fs::create_dir_all(&mid).unwrap();
        make_skill(&mid, "hidden");

        assert!(scan_root(tmp.path()).is_empty());
    }

    #[test]
    fn test_malformed_metadata_still_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        let skill = make_skill(tmp.path(), "broken-meta");
        fs::write(skill.join(".skill_metadata.json"), "{oops").unwrap();

        let found = scan_root(tmp.path());
        assert_eq!(found.len(), 1);
        assert!(!found[0].has_metadata());
    }

    #[test]
    fn test_reference_count_and_manifest_size() {
        let tmp = tempfile::tempdir().unwrap();
        let skill = make_skill(tmp.path(), "docs");
        fs::write(skill.join("references/a.md"), "a").unwrap();
        fs::write(skill.join("references/b.md"), "b").unwrap();
        fs::write(skill.join("references/notes.txt"), "x").unwrap();

        let found = scan_root(tmp.path());
        assert_eq!(found[0].reference_count, 2);
        assert!(found[0].manifest_size > 0);
    }

    #[test]
    fn test_discover_all_keeps_root_order() {
        let tmp_a = tempfile::tempdir().unwrap();
        let tmp_b = tempfile::tempdir().unwrap();
        make_skill(tmp_a.path(), "from-a");
        make_skill(tmp_b.path(), "from-b");

        let paths = vec![
            tmp_b.path().to_string_lossy().to_string(),
            tmp_a.path().to_string_lossy().to_string(),
        ];
        let names: Vec<_> = discover_all(&paths)
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["from-b", "from-a"]);
    }
}
