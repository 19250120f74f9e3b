use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{model::*, types::Finding};

/// Aggregated, scored output of one validation run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_records: usize,
    pub validators_run: usize,
    pub critical_errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub successes: usize,
    pub success_score: u8,
    pub elapsed_seconds: f64,
    pub validated_at: NaiveDate,
    pub input_digest: String,
    pub findings: Vec<Finding>,
}

impl Report {
    /// Derive counts and score from `findings`, which must already be in run order.
    pub fn assemble(
        total_records: usize,
        validators_run: usize,
        findings: Vec<Finding>,
        validated_at: NaiveDate,
        input_digest: String,
        elapsed_seconds: f64,
    ) -> Self {
        let count = |kind: FindingKind| findings.iter().filter(|f| f.kind == kind).count();
        let critical_errors = count(FindingKind::Error);
        let warnings = count(FindingKind::Warning);
        Self {
            total_records,
            validators_run,
            critical_errors,
            warnings,
            infos: count(FindingKind::Info),
            successes: count(FindingKind::Success),
            success_score: success_score(total_records, critical_errors, warnings),
            elapsed_seconds,
            validated_at,
            input_digest,
            findings,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.critical_errors > 0
    }

    pub fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }

    pub fn filter(&self, query: &ReportQuery) -> Vec<&Finding> {
        self.findings.iter().filter(|f| query.matches(f)).collect()
    }

    /// Findings ordered Critical first; run order is kept within a severity.
    pub fn ranked(&self) -> Vec<&Finding> {
        let mut out: Vec<&Finding> = self.findings.iter().collect();
        out.sort_by_key(|f| f.severity);
        out
    }

    /// Non-empty categories in declaration order.
    pub fn group_by_category(&self) -> Vec<(Category, Vec<&Finding>)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.findings.iter().filter(|f| f.category == *c).collect::<Vec<_>>()))
            .filter(|(_, fs)| !fs.is_empty())
            .collect()
    }

    pub fn summary_by_category(&self) -> BTreeMap<Category, usize> {
        let mut out = BTreeMap::new();
        for f in &self.findings {
            *out.entry(f.category).or_insert(0) += 1;
        }
        out
    }
}

/// Error findings cost two points, warnings one, against two points per record.
pub fn success_score(total_records: usize, errors: usize, warnings: usize) -> u8 {
    if total_records == 0 {
        return 100;
    }
    let ceiling = 2.0 * total_records as f64;
    let penalty = 2.0 * errors as f64 + warnings as f64;
    let score = ((ceiling - penalty) / ceiling * 100.0).round();
    score.clamp(0.0, 100.0) as u8
}

/// Conjunctive filter over findings. Unset criteria match everything.
#[derive(Clone, Debug, Default)]
pub struct ReportQuery {
    pub kind: Option<FindingKind>,
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    pub text: Option<String>,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: FindingKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.category.is_none() && self.severity.is_none() && self.text.is_none()
    }

    pub fn matches(&self, f: &Finding) -> bool {
        if self.kind.is_some_and(|k| k != f.kind) {
            return false;
        }
        if self.category.is_some_and(|c| c != f.category) {
            return false;
        }
        if self.severity.is_some_and(|s| s != f.severity) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => {
                let needle = t.to_lowercase();
                f.title.to_lowercase().contains(&needle) || f.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Single finding as a standalone downloadable document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindingExport {
    pub finding: Finding,
    pub exported_at: DateTime<Utc>,
}

impl FindingExport {
    pub fn new(finding: Finding, exported_at: DateTime<Utc>) -> Self {
        Self { finding, exported_at }
    }
}
