use std::time::Instant;

use chrono::{NaiveDate, Utc};
use resval_core::{CompanyDirectory, Report, Resolution};

use crate::digest::input_digest;
use crate::progress::{CancelFlag, NoProgress, ProgressObserver};
use crate::types::{ValidateError, ValidateInput, Validator};
use crate::validators::default_validators;

/// Runs validators in a fixed order and folds their findings into a [`Report`].
///
/// Validators share nothing but the read-only input; the order only matters
/// for progress reporting. Any validator error aborts the run.
pub struct Orchestrator {
    validators: Vec<Box<dyn Validator>>,
    today: Option<NaiveDate>,
    cancel: Option<CancelFlag>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::with_validators(default_validators())
    }

    pub fn with_validators(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators, today: None, cancel: None }
    }

    /// Pin the evaluation date instead of reading the clock.
    pub fn pin_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn validator_ids(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.id()).collect()
    }

    pub fn run(&self, records: &[Resolution], companies: Option<&dyn CompanyDirectory>) -> Result<Report, ValidateError> {
        self.run_with_progress(records, companies, &NoProgress)
    }

    pub fn run_with_progress(
        &self,
        records: &[Resolution],
        companies: Option<&dyn CompanyDirectory>,
        progress: &dyn ProgressObserver,
    ) -> Result<Report, ValidateError> {
        let started = Instant::now();
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let total = self.validators.len();

        let span = tracing::info_span!("validation_run", records = records.len(), validators = total, %today);
        let _guard = span.enter();

        let input = ValidateInput { records, today, companies };
        let mut findings = vec![];

        for (i, validator) in self.validators.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                tracing::info!(completed = i, "validation cancelled");
                return Err(ValidateError::Cancelled { completed: i, total });
            }

            let produced = validator.eval(&input).map_err(|e| {
                tracing::error!(validator = validator.id(), error = %e, "validator failed; aborting run");
                e
            })?;
            tracing::debug!(validator = validator.id(), findings = produced.len(), "validator finished");
            findings.extend(produced);

            let percent = ((i + 1) * 100 / total) as u8;
            progress.on_progress(validator.phase(), percent);
        }

        let digest = input_digest(records)?;
        let report = Report::assemble(
            records.len(),
            total,
            findings,
            today,
            digest,
            started.elapsed().as_secs_f64(),
        );
        tracing::info!(
            score = report.success_score,
            errors = report.critical_errors,
            warnings = report.warnings,
            "validation finished"
        );
        Ok(report)
    }
}
