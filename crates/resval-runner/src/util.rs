use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").with_context(|| format!("invalid date `{s}` (expected YYYY-MM-DD)"))
}

/// Expand `~` and resolve relative paths against `base`.
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).to_string());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_days() {
        assert_eq!(parse_day(" 2025-02-28 ").unwrap(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert!(parse_day("2025-02-30").is_err());
        assert!(parse_day("28/02/2025").is_err());
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        assert_eq!(resolve_path(Path::new("/repo"), "data/r.json"), PathBuf::from("/repo/data/r.json"));
        assert_eq!(resolve_path(Path::new("/repo"), "/abs/r.json"), PathBuf::from("/abs/r.json"));
    }
}
