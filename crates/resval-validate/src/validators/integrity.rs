use std::sync::OnceLock;

use regex::Regex;
use resval_core::{Category, Finding, FindingKind, Severity};

use super::resolutions;
use crate::types::{finding_ids, ValidateError, ValidateInput, Validator};

/// `R-nnnn-yyyy`, ASCII digits only.
const NUMBER_PATTERN: &str = r"^R-[0-9]{4}-[0-9]{4}$";

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("number pattern compiles"))
}

pub fn is_well_formed_number(number: &str) -> bool {
    number_pattern().is_match(number)
}

/// Required fields, number format and required company association.
pub struct IntegrityValidator;

impl Validator for IntegrityValidator {
    fn id(&self) -> &str {
        "integrity"
    }

    fn phase(&self) -> &str {
        "Checking data integrity"
    }

    fn category(&self) -> Category {
        Category::Data
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError> {
        let mut missing_number = vec![];
        let mut bad_format = vec![];
        let mut missing_company = vec![];

        for r in input.records {
            match r.number() {
                None => missing_number.push(r.id.clone()),
                Some(n) if !is_well_formed_number(n) => bad_format.push(r.id.clone()),
                Some(_) => {}
            }
            if r.company().is_none() {
                missing_company.push(r.id.clone());
            }
        }

        let mut findings = vec![];
        if !missing_number.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::MISSING_NUMBER,
                    FindingKind::Error,
                    self.category(),
                    Severity::Critical,
                    "Resolutions without number",
                    format!("{} have an empty resolution number", resolutions(missing_number.len())),
                )
                .affecting(missing_number)
                .suggest("Assign a number following the R-nnnn-yyyy pattern")
                .auto_fixable(true),
            );
        }
        if !bad_format.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::INVALID_NUMBER_FORMAT,
                    FindingKind::Warning,
                    self.category(),
                    Severity::Medium,
                    "Malformed resolution numbers",
                    format!("{} have a number that does not match R-nnnn-yyyy", resolutions(bad_format.len())),
                )
                .affecting(bad_format)
                .suggest("Rewrite the number as R-nnnn-yyyy")
                .auto_fixable(true),
            );
        }
        if !missing_company.is_empty() {
            findings.push(
                Finding::new(
                    finding_ids::MISSING_COMPANY,
                    FindingKind::Error,
                    self.category(),
                    Severity::High,
                    "Resolutions without company",
                    format!("{} are not associated with a company", resolutions(missing_company.len())),
                )
                .affecting(missing_company)
                .suggest("Associate each resolution with its owning company"),
            );
        }
        Ok(findings)
    }
}
