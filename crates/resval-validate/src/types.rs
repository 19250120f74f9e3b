use chrono::NaiveDate;
use resval_core::{Category, CompanyDirectory, Finding, Resolution};
use thiserror::Error;

/// Immutable view handed to every validator for one run.
#[derive(Clone, Copy)]
pub struct ValidateInput<'a> {
    pub records: &'a [Resolution],
    /// Evaluation date, sampled once per run.
    pub today: NaiveDate,
    pub companies: Option<&'a dyn CompanyDirectory>,
}

impl<'a> ValidateInput<'a> {
    pub fn new(records: &'a [Resolution], today: NaiveDate) -> Self {
        Self { records, today, companies: None }
    }

    pub fn with_companies(mut self, companies: &'a dyn CompanyDirectory) -> Self {
        self.companies = Some(companies);
        self
    }
}

/// Run-level failures. Data-quality problems are findings, never errors.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("validator `{validator}` failed: {message}")]
    Failed { validator: String, message: String },
    #[error("validation cancelled after {completed} of {total} validators")]
    Cancelled { completed: usize, total: usize },
    #[error("could not digest input records: {0}")]
    Digest(#[from] serde_json::Error),
}

/// One independent check pass over the full record set.
pub trait Validator: Send + Sync {
    fn id(&self) -> &str;
    /// Human-readable phase label for progress reporting.
    fn phase(&self) -> &str;
    fn category(&self) -> Category;
    fn eval(&self, input: &ValidateInput<'_>) -> Result<Vec<Finding>, ValidateError>;
}

/// Stable slugs for every rule.
pub mod finding_ids {
    pub const MISSING_NUMBER: &str = "missing-number";
    pub const INVALID_NUMBER_FORMAT: &str = "invalid-number-format";
    pub const MISSING_COMPANY: &str = "missing-company";
    pub const ORPHAN_REFERENCES: &str = "orphan-references";
    pub const CIRCULAR_REFERENCES: &str = "circular-references";
    pub const INVALID_VIGENCY_RANGE: &str = "invalid-vigency-range";
    pub const EXPIRED_ACTIVE: &str = "expired-active";
    pub const MISSING_COMPANIES: &str = "missing-companies";
    pub const DUPLICATE_NUMBERS: &str = "duplicate-numbers";
    pub const DUPLICATE_IDS: &str = "duplicate-ids";
}
