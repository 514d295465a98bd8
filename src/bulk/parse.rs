//! External-tool output parsing.
//!
//! The quality checker and updater communicate results through their exit
//! code plus one documented stdout line each. The scraping lives behind
//! these two functions so the text contract can be swapped for a structured
//! format without touching the callers.

use regex::Regex;

/// Extract the score from a stdout line of the form `Overall Score: X/10`.
///
/// Returns `None` when the marker is absent or the number does not parse.
pub fn overall_score(stdout: &str) -> Option<f64> {
    let re = Regex::new(r"Overall Score:\s*([0-9]+(?:\.[0-9]+)?)\s*/").ok()?;

    for line in stdout.lines() {
        if let Some(caps) = re.captures(line) {
            if let Ok(score) = caps[1].parse::<f64>() {
                return Some(score);
            }
        }
    }

    None
}

/// The updater signals pending updates with this exact stdout substring.
pub fn updates_available(stdout: &str) -> bool {
    stdout.contains("Updates available")
}
