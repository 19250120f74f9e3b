use std::collections::HashMap;

use resval_core::{Category, Finding, FindingKind, ResolutionId, Severity};

use super::resolutions;
use crate::types::{finding_ids, ValidateError, ValidateInput, Validator};

/// Uniqueness of resolution numbers and ids.
pub struct ConsistencyValidator;

impl Validator for ConsistencyValidator {
    fn id(&self) -> &str {
        "consistency"
    }

    fn phase(&self) -> &str {
        "Checking consistency"
    }

    fn category(&self) -> Category {
        Category::Consistency
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError> {
        // Exact string key; whitespace and case are not normalised.
        let mut by_number: HashMap<&str, Vec<&ResolutionId>> = HashMap::new();
        let mut number_order: Vec<&str> = vec![];
        let mut id_counts: HashMap<&ResolutionId, usize> = HashMap::new();
        let mut id_order: Vec<&ResolutionId> = vec![];

        for r in input.records {
            if let Some(n) = r.number() {
                let members = by_number.entry(n).or_default();
                if members.is_empty() {
                    number_order.push(n);
                }
                members.push(&r.id);
            }
            let count = id_counts.entry(&r.id).or_insert(0);
            if *count == 0 {
                id_order.push(&r.id);
            }
            *count += 1;
        }

        let duplicate_numbers: Vec<ResolutionId> = number_order
            .iter()
            .filter_map(|n| by_number.get(n))
            .filter(|members| members.len() > 1)
            .flat_map(|members| members.iter().map(|id| (*id).clone()))
            .collect();
        let duplicate_ids: Vec<ResolutionId> = id_order
            .into_iter()
            .filter(|id| id_counts.get(id).is_some_and(|c| *c > 1))
            .cloned()
            .collect();

        let mut findings = vec![];
        if !duplicate_numbers.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::DUPLICATE_NUMBERS,
                    FindingKind::Error,
                    self.category(),
                    Severity::Critical,
                    "Duplicate resolution numbers",
                    format!("{} share a resolution number with another resolution", resolutions(duplicate_numbers.len())),
                )
                .affecting(duplicate_numbers)
                .suggest("Renumber the duplicates so every resolution number is unique")
                .auto_fixable(true),
            );
        }
        if !duplicate_ids.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::DUPLICATE_IDS,
                    FindingKind::Error,
                    self.category(),
                    Severity::Critical,
                    "Duplicate resolution ids",
                    format!("{} ids are used by more than one record", duplicate_ids.len()),
                )
                .affecting(duplicate_ids)
                .suggest("Remove or re-key the duplicated records"),
            );
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use resval_core::Resolution;

    fn run(records: &[Resolution]) -> Vec<Finding> {
        ConsistencyValidator.eval(&ValidateInput::new(records, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())).unwrap()
    }

    fn ids(v: &[&str]) -> Vec<ResolutionId> {
        v.iter().map(|s| ResolutionId::from_str(*s)).collect()
    }

    #[test]
    fn shared_number_flags_both_records() {
        let findings = run(&[
            Resolution::new("1").with_number("R-0001-2025"),
            Resolution::new("2").with_number("R-0001-2025"),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "duplicate-numbers");
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].auto_fixable);
        assert_eq!(findings[0].affected_ids, ids(&["1", "2"]));
    }

    #[test]
    fn several_groups_fold_into_one_finding() {
        let findings = run(&[
            Resolution::new("a").with_number("X"),
            Resolution::new("b").with_number("Y"),
            Resolution::new("c").with_number("X"),
            Resolution::new("d").with_number("Y"),
            Resolution::new("e").with_number("Z"),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_ids, ids(&["a", "c", "b", "d"]));
    }

    #[test]
    fn numbers_compare_exactly_and_blanks_are_ignored() {
        assert!(run(&[
            Resolution::new("1").with_number("R-0001-2025"),
            Resolution::new("2").with_number("r-0001-2025"),
            Resolution::new("3").with_number("R-0001-2025 "),
            Resolution::new("4").with_number(""),
            Resolution::new("5").with_number("  "),
        ])
        .is_empty());
    }

    #[test]
    fn repeated_id_is_reported_once() {
        let findings = run(&[Resolution::new("x"), Resolution::new("x"), Resolution::new("x"), Resolution::new("y")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "duplicate-ids");
        assert_eq!(findings[0].affected_ids, ids(&["x"]));
    }
}
