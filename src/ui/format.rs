//! Display Formatting
//!
//! Pure string helpers for the dashboard and report: relative-age bands,
//! proportional bars, name truncation, quality tiers, thousands grouping.
//! Kept free of color so the tests assert plain strings.

/// Relative-age string for a skill's last update.
///
/// Bands: 0 -> `Today`; 1 -> `Yesterday`; 2-6 -> `Nd ago`; 7-29 -> `Nw ago`
/// (whole weeks); >= 30 -> `Nmo ago` (whole 30-day months); unknown ->
/// `No data`.
pub fn format_age(age_days: Option<i64>) -> String {
    match age_days {
        None => "No data".to_string(),
        Some(0) => "Today".to_string(),
        Some(1) => "Yesterday".to_string(),
        Some(age) if age < 7 => format!("{}d ago", age),
        Some(age) if age < 30 => format!("{}w ago", age / 7),
        Some(age) => format!("{}mo ago", age / 30),
    }
}

/// Proportional bar of `width` cells plus a right-aligned percentage.
/// A zero total renders an all-empty bar.
pub fn progress_bar(value: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }

    let filled = value * width / total;
    let percentage = value * 100 / total;

    format!(
        "{}{} {:3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        percentage
    )
}

/// Truncate a name to at most `max` characters.
pub fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

/// Qualitative label for a quality score.
pub fn quality_tier(score: f64) -> &'static str {
    if score >= 9.0 {
        "Excellent quality"
    } else if score >= 7.0 {
        "Good quality"
    } else {
        "Needs improvement"
    }
}

/// Group a count with thousands separators: `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
