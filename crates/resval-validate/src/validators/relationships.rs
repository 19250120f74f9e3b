use std::collections::HashSet;

use resval_core::{Category, Finding, FindingKind, ResolutionId, Severity};

use super::resolutions;
use crate::cycle::find_cycles;
use crate::types::{finding_ids, ValidateError, ValidateInput, Validator};

/// Dangling parent references and circular parent chains.
pub struct RelationshipValidator;

impl Validator for RelationshipValidator {
    fn id(&self) -> &str {
        "relationships"
    }

    fn phase(&self) -> &str {
        "Checking relationships"
    }

    fn category(&self) -> Category {
        Category::Relationships
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError> {
        let known: HashSet<&ResolutionId> = input.records.iter().map(|r| &r.id).collect();
        let orphans: Vec<ResolutionId> = input
            .records
            .iter()
            .filter(|r| r.parent().is_some_and(|p| !known.contains(p)))
            .map(|r| r.id.clone())
            .collect();

        let mut findings = vec![];
        if !orphans.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::ORPHAN_REFERENCES,
                    FindingKind::Error,
                    self.category(),
                    Severity::High,
                    "Orphan parent references",
                    format!("{} reference a parent resolution that does not exist", resolutions(orphans.len())),
                )
                .affecting(orphans)
                .suggest("Point the parent reference at an existing resolution or clear it"),
            );
        }

        let cyclic = find_cycles(input.records);
        if !cyclic.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::CIRCULAR_REFERENCES,
                    FindingKind::Error,
                    self.category(),
                    Severity::Critical,
                    "Circular parent references",
                    format!("{} form a circular parent chain", resolutions(cyclic.len())),
                )
                .affecting(cyclic)
                .suggest("Break the chain by clearing the parent reference of one resolution"),
            );
        }
        Ok(findings)
    }
}
