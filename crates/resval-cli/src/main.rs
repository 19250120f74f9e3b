use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use resval_core::{Category, Finding, FindingKind, Report, ReportQuery, Severity};
use resval_runner::{parse_day, Overrides, Runner};
use resval_source::FileSource;
use resval_source_sqlite::SqliteSource;

#[derive(Parser)]
#[command(name = "resval", version, about = "Resolution integrity validation")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Record file (.json/.yaml) or SQLite database (.db); overrides resval.toml
    #[arg(long)]
    records: Option<PathBuf>,
    /// Company directory file or database; overrides resval.toml
    #[arg(long)]
    companies: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD); defaults to today in UTC
    #[arg(long)]
    today: Option<String>,
}

impl SourceArgs {
    fn overrides(self) -> anyhow::Result<Overrides> {
        Ok(Overrides {
            records: self.records,
            companies: self.companies,
            today: self.today.as_deref().map(parse_day).transpose()?,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create .resval/resval.toml with defaults
    Init,

    /// Check that the configured sources can be read
    Doctor {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Validate all resolutions and print the report
    Validate {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[arg(long)]
        kind: Option<FindingKind>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        severity: Option<Severity>,
        /// Case-insensitive match on finding title or description
        #[arg(long)]
        search: Option<String>,
        /// Group text output by category instead of ranking by severity
        #[arg(long, default_value_t = false)]
        group: bool,
        /// Save the report under the configured artifact root
        #[arg(long, default_value_t = false)]
        save: bool,
        /// Exit with status 2 when the report contains errors
        #[arg(long, default_value_t = false)]
        fail_on_errors: bool,
    },

    /// Validate, then write one finding as a standalone JSON document
    ExportFinding {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        id: String,
        /// Output file; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Seed a SQLite database from a record file
    Import {
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        db: PathBuf,
    },
}

fn print_finding(f: &Finding) {
    println!();
    println!("[{}/{}] {} ({}) - {}", f.severity, f.kind, f.title, f.id, f.category);
    println!("  {}", f.description);
    let ids: Vec<&str> = f.affected_ids.iter().map(|i| i.as_str()).collect();
    println!("  affected: {}", ids.join(", "));
    if let Some(fix) = &f.suggested_fix {
        println!("  fix: {}{}", fix, if f.auto_fixable { " (auto-fixable)" } else { "" });
    }
}

fn print_text(report: &Report, query: &ReportQuery, grouped: bool) {
    println!(
        "Records: {}  Validators: {}  Score: {}%  ({:.2}s, as of {})",
        report.total_records, report.validators_run, report.success_score, report.elapsed_seconds, report.validated_at
    );
    println!(
        "Errors: {}  Warnings: {}  Info: {}  Success: {}",
        report.critical_errors, report.warnings, report.infos, report.successes
    );
    let by_category: Vec<String> =
        report.summary_by_category().iter().map(|(c, n)| format!("{c} {n}")).collect();
    if !by_category.is_empty() {
        println!("By category: {}", by_category.join(", "));
    }
    if report.filter(query).is_empty() {
        println!("No findings.");
        return;
    }
    if grouped {
        for (category, findings) in report.group_by_category() {
            let shown: Vec<&Finding> = findings.into_iter().filter(|f| query.matches(f)).collect();
            if shown.is_empty() {
                continue;
            }
            println!();
            println!("== {category} ==");
            shown.into_iter().for_each(print_finding);
        }
    } else {
        report.ranked().into_iter().filter(|f| query.matches(f)).for_each(print_finding);
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => {
            let path = Runner::init_repo(&repo_root)?;
            println!("Initialized resval config at {}", path.display());
        }
        Command::Doctor { source } => {
            let r = Runner::open(repo_root, source.overrides()?)?;
            for line in r.doctor()? {
                println!("ok  {line}");
            }
        }
        Command::Validate { source, format, kind, category, severity, search, group, save, fail_on_errors } => {
            let r = Runner::open(repo_root, source.overrides()?)?;
            let progress = |phase: &str, percent: u8| tracing::info!(percent, "{phase}");
            let report = r.validate(&progress)?;

            let query = ReportQuery { kind, category, severity, text: search };
            match format {
                Format::Text => print_text(&report, &query, group),
                Format::Json => {
                    // Counts and score always describe the whole run; only the list is filtered.
                    let mut shown = report.clone();
                    shown.findings = report.filter(&query).into_iter().cloned().collect();
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                }
            }

            if save {
                let (run_id, dir) = r.save(&report)?;
                tracing::info!(run_id = %run_id, dir = %dir.display(), "report saved");
            }
            if fail_on_errors && report.has_errors() {
                std::process::exit(2);
            }
        }
        Command::ExportFinding { source, id, out } => {
            let r = Runner::open(repo_root, source.overrides()?)?;
            let report = r.validate(&resval_validate::NoProgress)?;
            let export = r.export_finding(&report, &id)?;
            match out {
                Some(path) => {
                    resval_artifacts::write_finding_export_to(&path, &export)?;
                    println!("Exported {} to {}", id, path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&export)?),
            }
        }
        Command::Import { from, db } => {
            let target = SqliteSource::open(&db)?;
            let (resolutions, companies) = target.import_from(&FileSource::new(&from))?;
            println!("Imported {resolutions} resolutions and {companies} companies into {}", db.display());
        }
    }

    Ok(())
}
