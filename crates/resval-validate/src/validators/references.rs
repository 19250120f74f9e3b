use std::collections::HashSet;

use resval_core::{Category, CompanyId, Finding, FindingKind, ResolutionId, Severity};

use super::resolutions;
use crate::types::{finding_ids, ValidateError, ValidateInput, Validator};

/// Companies referenced by resolutions must exist in the company directory.
///
/// Without a directory, or when the directory cannot answer for a company,
/// the company is assumed to exist.
pub struct ExternalReferenceValidator;

impl Validator for ExternalReferenceValidator {
    fn id(&self) -> &str {
        "references"
    }

    fn phase(&self) -> &str {
        "Checking external references"
    }

    fn category(&self) -> Category {
        Category::References
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError> {
        let Some(directory) = input.companies else {
            tracing::debug!("no company directory configured; skipping existence checks");
            return Ok(vec![]);
        };

        let mut distinct: Vec<&CompanyId> = vec![];
        let mut queued: HashSet<&CompanyId> = HashSet::new();
        for c in input.records.iter().filter_map(|r| r.company()) {
            if queued.insert(c) {
                distinct.push(c);
            }
        }

        let mut missing: HashSet<&CompanyId> = HashSet::new();
        for company in distinct {
            match directory.exists(company) {
                Ok(true) => {}
                Ok(false) => {
                    missing.insert(company);
                }
                Err(e) => {
                    tracing::warn!(company = %company, error = %e, "company lookup failed; assuming it exists");
                }
            }
        }
        if missing.is_empty() {
            return Ok(vec![]);
        }

        let affected: Vec<ResolutionId> = input
            .records
            .iter()
            .filter(|r| r.company().is_some_and(|c| missing.contains(c)))
            .map(|r| r.id.clone())
            .collect();

        Ok(vec![Finding::new(
            finding_ids::MISSING_COMPANIES,
            FindingKind::Error,
            self.category(),
            Severity::High,
            "References to missing companies",
            format!(
                "{} reference {} compan{} not found in the company directory",
                resolutions(affected.len()),
                missing.len(),
                if missing.len() == 1 { "y" } else { "ies" }
            ),
        )
        .affecting(affected)
        .suggest("Register the company or reassign the resolutions to an existing one")])
    }
}
