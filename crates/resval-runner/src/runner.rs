use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use resval_artifacts::FsReportStore;
use resval_core::{CompanyDirectory, FindingExport, Report, RunId, StaticDirectory};
use resval_source::{load_company_directory, FileSource, RecordSource};
use resval_source_sqlite::SqliteSource;
use resval_validate::{CancelFlag, Orchestrator, ProgressObserver};

use crate::{doctor::doctor, CompaniesKind, Config, SourceKind};

/// Command-line values that take precedence over `resval.toml`.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub records: Option<PathBuf>,
    pub companies: Option<PathBuf>,
    pub today: Option<NaiveDate>,
}

pub struct Runner {
    pub repo_root: PathBuf,
    pub cfg: Config,
    pub source: Box<dyn RecordSource>,
    pub directory: Option<Box<dyn CompanyDirectory>>,
    pub today: Option<NaiveDate>,
    pub cancel: CancelFlag,
}

fn open_source(kind: SourceKind, path: &Path) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match kind {
        SourceKind::File => Box::new(FileSource::new(path)),
        SourceKind::Sqlite => Box::new(SqliteSource::open_existing(path)?),
    };
    Ok(source)
}

/// Infer the source kind from a path given on the command line.
fn kind_for_path(path: &Path) -> SourceKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some("db") | Some("sqlite") | Some("sqlite3") => SourceKind::Sqlite,
        _ => SourceKind::File,
    }
}

fn open_directory(kind: SourceKind, path: &Path) -> Result<Box<dyn CompanyDirectory>> {
    let directory: Box<dyn CompanyDirectory> = match kind {
        SourceKind::File => Box::new(load_company_directory(path)?),
        SourceKind::Sqlite => Box::new(SqliteSource::open_existing(path)?),
    };
    Ok(directory)
}

/// Companies carried by the record source itself. A source without any
/// company list yields no directory rather than one that rejects everything.
fn directory_from_source(source: &dyn RecordSource) -> Result<Option<Box<dyn CompanyDirectory>>> {
    let companies = source.load_companies().with_context(|| format!("load companies from {}", source.describe()))?;
    if companies.is_empty() {
        tracing::warn!(source = %source.describe(), "record source lists no companies; reference checks disabled");
        return Ok(None);
    }
    let directory: Box<dyn CompanyDirectory> = Box::new(StaticDirectory::new(companies.into_iter().map(|c| c.id)));
    Ok(Some(directory))
}

impl Runner {
    pub fn open(repo_root: PathBuf, overrides: Overrides) -> Result<Self> {
        let cfg_path = Config::config_path(&repo_root);
        let cfg = if cfg_path.exists() { Config::load_from(&cfg_path)? } else { Config::default_for_repo() };

        let (source_kind, source_path) = match &overrides.records {
            Some(p) => (kind_for_path(p), p.clone()),
            None => (cfg.source_kind()?, cfg.source_path(&repo_root)),
        };
        let source = open_source(source_kind, &source_path)
            .with_context(|| format!("open record source {}", source_path.display()))?;

        let directory = match &overrides.companies {
            Some(p) => Some(
                open_directory(kind_for_path(p), p).with_context(|| format!("open company directory {}", p.display()))?,
            ),
            None => match cfg.companies_kind()? {
                CompaniesKind::None => None,
                CompaniesKind::Source => directory_from_source(source.as_ref())?,
                CompaniesKind::File => Some(open_directory(SourceKind::File, &cfg.companies_path(&repo_root))?),
                CompaniesKind::Sqlite => Some(open_directory(SourceKind::Sqlite, &cfg.companies_path(&repo_root))?),
            },
        };

        let today = match overrides.today {
            Some(d) => Some(d),
            None => cfg.pinned_today()?,
        };

        tracing::debug!(source = %source.describe(), directory = directory.is_some(), "runner opened");
        Ok(Self { repo_root, cfg, source, directory, today, cancel: CancelFlag::new() })
    }

    /// Write `.resval/resval.toml` unless it already exists.
    pub fn init_repo(repo_root: &Path) -> Result<PathBuf> {
        let cfg_path = Config::config_path(repo_root);
        if !cfg_path.exists() {
            Config::default_for_repo().save_to(&cfg_path)?;
        }
        Ok(cfg_path)
    }

    pub fn doctor(&self) -> Result<Vec<String>> {
        doctor(self)
    }

    fn orchestrator(&self) -> Orchestrator {
        let orch = Orchestrator::new().with_cancel(self.cancel.clone());
        match self.today {
            Some(d) => orch.pin_today(d),
            None => orch,
        }
    }

    pub fn validate(&self, progress: &dyn ProgressObserver) -> Result<Report> {
        let records = self
            .source
            .load_resolutions()
            .with_context(|| format!("load records from {}", self.source.describe()))?;
        tracing::info!(records = records.len(), source = %self.source.describe(), "records loaded");
        let report = self.orchestrator().run_with_progress(&records, self.directory.as_deref(), progress)?;
        Ok(report)
    }

    pub fn export_finding(&self, report: &Report, finding_id: &str) -> Result<FindingExport> {
        let finding = report
            .finding(finding_id)
            .ok_or_else(|| anyhow!("no finding `{finding_id}` in this report"))?;
        Ok(FindingExport::new(finding.clone(), Utc::now()))
    }

    pub fn report_store(&self) -> FsReportStore {
        let store = FsReportStore::new(self.cfg.artifact_root(&self.repo_root));
        if self.cfg.report.pretty.unwrap_or(true) {
            store
        } else {
            store.compact()
        }
    }

    pub fn save(&self, report: &Report) -> Result<(RunId, PathBuf)> {
        self.report_store().save_run(&self.source.describe(), report)
    }
}
