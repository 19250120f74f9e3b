use anyhow::{anyhow, Context, Result};

use crate::{CompaniesKind, Runner};

/// Check that the configured record source and directory are usable.
/// Returns one line per passed check; the first failing check is the error.
pub fn doctor(runner: &Runner) -> Result<Vec<String>> {
    let mut ok = vec![];

    let records = runner
        .source
        .load_resolutions()
        .with_context(|| format!("record source {} is not readable", runner.source.describe()))?;
    ok.push(format!("record source {}: {} loaded", runner.source.describe(), records.len()));

    match (&runner.directory, runner.cfg.companies_kind()?) {
        (Some(_), _) => ok.push("company directory: configured".to_string()),
        (None, CompaniesKind::None) => ok.push("company directory: disabled (references assumed valid)".to_string()),
        (None, CompaniesKind::Source) => {
            ok.push("company directory: source lists no companies (references assumed valid)".to_string())
        }
        (None, kind) => return Err(anyhow!("company directory {:?} configured but not opened", kind)),
    }

    match runner.today {
        Some(d) => ok.push(format!("evaluation date pinned to {d}")),
        None => ok.push("evaluation date: today (UTC)".to_string()),
    }

    let root = runner.cfg.artifact_root(&runner.repo_root);
    ok.push(format!("artifact root: {}", root.display()));
    Ok(ok)
}
