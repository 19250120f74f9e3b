use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use resval_core::Report;
use resval_validate::NoProgress;
use serde::Deserialize;

use crate::{parse_day, Overrides, Runner};

#[derive(Debug, Deserialize)]
pub struct ScenarioExpected {
    pub scenario_id: String,
    pub today: String,
    pub total_records: usize,
    pub success_score: u8,
    /// Company directory file inside the scenario directory, if any.
    #[serde(default)]
    pub companies: Option<String>,
    pub findings: Vec<ExpectedFinding>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectedFinding {
    pub id: String,
    #[serde(default)]
    pub affected_ids: Vec<String>,
}

#[derive(Debug)]
pub struct ScenarioResult {
    pub report: Report,
    /// Empty when the report matches expectations.
    pub mismatches: Vec<String>,
}

pub fn load_expected(dir: &Path) -> Result<ScenarioExpected> {
    let p = dir.join("expected.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read expected.yaml: {}", p.display()))?;
    let exp: ScenarioExpected = serde_yaml::from_str(&s).with_context(|| "parse expected.yaml")?;
    Ok(exp)
}

fn records_file(dir: &Path) -> Result<PathBuf> {
    ["records.json", "records.yaml", "records.yml"]
        .iter()
        .map(|n| dir.join(n))
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("no records file in {}", dir.display()))
}

/// Run a fixture dataset through the full runner with the scenario's pinned
/// date, then diff the report against `expected.yaml`.
///
/// Finding order must match; affected ids are compared as sets.
pub fn simulate(dir: &Path) -> Result<ScenarioResult> {
    let exp = load_expected(dir)?;
    let overrides = Overrides {
        records: Some(records_file(dir)?),
        companies: exp.companies.as_ref().map(|c| dir.join(c)),
        today: Some(parse_day(&exp.today)?),
    };
    let runner = Runner::open(dir.to_path_buf(), overrides)?;
    let report = runner.validate(&NoProgress)?;

    let mut mismatches = vec![];
    if report.total_records != exp.total_records {
        mismatches.push(format!("total_records: expected {}, got {}", exp.total_records, report.total_records));
    }
    if report.success_score != exp.success_score {
        mismatches.push(format!("success_score: expected {}, got {}", exp.success_score, report.success_score));
    }
    let got_ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    let want_ids: Vec<&str> = exp.findings.iter().map(|f| f.id.as_str()).collect();
    if got_ids != want_ids {
        mismatches.push(format!("findings: expected {:?}, got {:?}", want_ids, got_ids));
    } else {
        for (want, got) in exp.findings.iter().zip(&report.findings) {
            let want_set: BTreeSet<&str> = want.affected_ids.iter().map(String::as_str).collect();
            let got_set: BTreeSet<&str> = got.affected_ids.iter().map(|i| i.as_str()).collect();
            if want_set != got_set {
                mismatches.push(format!("{}: expected affected {:?}, got {:?}", want.id, want_set, got_set));
            }
        }
    }

    tracing::debug!(scenario = %exp.scenario_id, mismatches = mismatches.len(), "scenario checked");
    Ok(ScenarioResult { report, mismatches })
}
