use resval_core::{Category, Finding, FindingKind, ResolutionId, Severity};

use super::resolutions;
use crate::types::{finding_ids, ValidateError, ValidateInput, Validator};

/// Vigency range sanity and expired-but-active records.
pub struct TemporalValidator;

impl Validator for TemporalValidator {
    fn id(&self) -> &str {
        "temporal"
    }

    fn phase(&self) -> &str {
        "Checking vigency dates"
    }

    fn category(&self) -> Category {
        Category::Dates
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError> {
        let mut bad_range: Vec<ResolutionId> = vec![];
        let mut expired_active: Vec<ResolutionId> = vec![];

        for r in input.records {
            if let (Some(start), Some(end)) = (r.vigency_start, r.vigency_end) {
                if start >= end {
                    bad_range.push(r.id.clone());
                }
            }
            if r.vigency_end.is_some_and(|end| end < input.today) && r.is_active() {
                expired_active.push(r.id.clone());
            }
        }

        let mut findings = vec![];
        if !bad_range.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::INVALID_VIGENCY_RANGE,
                    FindingKind::Error,
                    self.category(),
                    Severity::High,
                    "Invalid vigency range",
                    format!("{} have a vigency start on or after their end", resolutions(bad_range.len())),
                )
                .affecting(bad_range)
                .suggest("Correct the vigency start and end dates"),
            );
        }
        if !expired_active.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::EXPIRED_ACTIVE,
                    FindingKind::Warning,
                    self.category(),
                    Severity::Medium,
                    "Expired resolutions still active",
                    format!(
                        "{} are marked ACTIVE but their vigency ended before {}",
                        resolutions(expired_active.len()),
                        input.today
                    ),
                )
                .affecting(expired_active)
                .suggest("Mark the resolutions as EXPIRED")
                .auto_fixable(true),
            );
        }
        Ok(findings)
    }
}
