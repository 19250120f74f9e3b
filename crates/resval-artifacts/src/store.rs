use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use resval_core::{FindingExport, Report, RunId};

use crate::manifest::{ArtifactRecord, ArtifactRole, RunManifest};

pub trait ReportStore: Send + Sync {
    fn create_run_dir(&self, run_id: &RunId) -> Result<PathBuf>;
    fn write_report(&self, run_dir: &Path, report: &Report) -> Result<PathBuf>;
    fn append_worklog(&self, run_dir: &Path, line: &str) -> Result<()>;
    fn write_manifest(&self, run_dir: &Path, manifest: &RunManifest) -> Result<()>;
}

/// Saves reports under `<root>/<run_id>/`.
#[derive(Clone)]
pub struct FsReportStore {
    pub root: PathBuf,
    pub pretty: bool,
}

impl FsReportStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root, pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    fn role_file(role: ArtifactRole) -> &'static str {
        match role {
            ArtifactRole::Report => "report.json",
            ArtifactRole::Worklog => "worklog.md",
        }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty { serde_json::to_vec_pretty(value)? } else { serde_json::to_vec(value)? };
        Ok(bytes)
    }

    /// Save a report and its manifest in a fresh run directory.
    pub fn save_run(&self, source: &str, report: &Report) -> Result<(RunId, PathBuf)> {
        let run_id = RunId::new();
        let run_dir = self.create_run_dir(&run_id)?;
        let report_path = self.write_report(&run_dir, report)?;
        self.append_worklog(
            &run_dir,
            &format!(
                "## Run {} over {} ({} records, score {}%)",
                run_id, source, report.total_records, report.success_score
            ),
        )?;
        let manifest = RunManifest {
            run_id: run_id.to_string(),
            source: source.to_string(),
            saved_at: Utc::now(),
            validated_at: report.validated_at,
            input_digest: report.input_digest.clone(),
            total_records: report.total_records,
            success_score: report.success_score,
            artifacts: vec![
                ArtifactRecord { role: ArtifactRole::Report, path: relative(&run_dir, &report_path) },
                ArtifactRecord {
                    role: ArtifactRole::Worklog,
                    path: Self::role_file(ArtifactRole::Worklog).to_string(),
                },
            ],
        };
        self.write_manifest(&run_dir, &manifest)?;
        Ok((run_id, run_dir))
    }
}

fn relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

impl ReportStore for FsReportStore {
    fn create_run_dir(&self, run_id: &RunId) -> Result<PathBuf> {
        let dir = self.root.join(run_id.as_str());
        std::fs::create_dir_all(&dir).with_context(|| format!("create run dir {}", dir.display()))?;
        Ok(dir)
    }

    fn write_report(&self, run_dir: &Path, report: &Report) -> Result<PathBuf> {
        let path = run_dir.join(Self::role_file(ArtifactRole::Report));
        std::fs::write(&path, self.to_json(report)?).with_context(|| format!("write report {}", path.display()))?;
        Ok(path)
    }

    fn append_worklog(&self, run_dir: &Path, line: &str) -> Result<()> {
        let path = run_dir.join(Self::role_file(ArtifactRole::Worklog));
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{}", line)?;
        Ok(())
    }

    fn write_manifest(&self, run_dir: &Path, manifest: &RunManifest) -> Result<()> {
        let path = run_dir.join("manifest.json");
        let bytes = serde_json::to_vec_pretty(manifest)?;
        std::fs::write(&path, bytes).with_context(|| format!("write manifest {}", path.display()))?;
        Ok(())
    }
}

/// Write a single finding export to an explicit path.
pub fn write_finding_export_to(path: &Path, export: &FindingExport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let bytes = serde_json::to_vec_pretty(export)?;
    std::fs::write(path, bytes).with_context(|| format!("write export {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use resval_core::{Category, Finding, FindingKind, Severity};
    use tempfile::tempdir;

    fn report() -> Report {
        Report::assemble(
            2,
            5,
            vec![Finding::new("missing-number", FindingKind::Error, Category::Data, Severity::Critical, "t", "d")],
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            "digest".into(),
            0.5,
        )
    }

    #[test]
    fn save_run_writes_report_worklog_and_manifest() {
        let dir = tempdir().unwrap();
        let store = FsReportStore::new(dir.path().to_path_buf());
        let (run_id, run_dir) = store.save_run("file:r.json", &report()).unwrap();
        assert!(run_dir.ends_with(run_id.as_str()));
        assert!(run_dir.join("report.json").exists());
        assert!(run_dir.join("worklog.md").exists());

        let manifest: RunManifest =
            serde_json::from_slice(&std::fs::read(run_dir.join("manifest.json")).unwrap()).unwrap();
        assert_eq!(manifest.run_id, run_id.to_string());
        assert_eq!(manifest.input_digest, "digest");
        assert_eq!(manifest.artifacts[0].path, "report.json");

        let back: Report = serde_json::from_slice(&std::fs::read(run_dir.join("report.json")).unwrap()).unwrap();
        assert_eq!(back, report());
    }

    #[test]
    fn finding_export_written_to_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("missing-number.json");
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let export = FindingExport::new(report().findings[0].clone(), at);
        write_finding_export_to(&path, &export).unwrap();
        let back: FindingExport = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, export);
    }
}
