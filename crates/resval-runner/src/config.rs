use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::util::{parse_day, resolve_path};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub companies: CompaniesConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    pub report: ReportConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: String, // "file" | "sqlite"
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompaniesConfig {
    pub kind: String, // "none" | "source" | "file" | "sqlite"
    #[serde(default)]
    pub path: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub today: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    pub artifact_root: String,
    #[serde(default)]
    pub pretty: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompaniesKind {
    None,
    Source,
    File,
    Sqlite,
}

impl Config {
    pub fn default_for_repo() -> Self {
        Self {
            source: SourceConfig { kind: "file".to_string(), path: "resolutions.json".to_string() },
            companies: CompaniesConfig { kind: "source".to_string(), path: String::new() },
            validation: ValidationConfig::default(),
            report: ReportConfig { artifact_root: "~/.resval/reports".to_string(), pretty: Some(true) },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse resval.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn source_kind(&self) -> Result<SourceKind> {
        match self.source.kind.as_str() {
            "file" => Ok(SourceKind::File),
            "sqlite" => Ok(SourceKind::Sqlite),
            other => Err(anyhow!("unknown source kind `{other}` (expected file | sqlite)")),
        }
    }

    pub fn companies_kind(&self) -> Result<CompaniesKind> {
        match self.companies.kind.as_str() {
            "none" => Ok(CompaniesKind::None),
            "source" => Ok(CompaniesKind::Source),
            "file" => Ok(CompaniesKind::File),
            "sqlite" => Ok(CompaniesKind::Sqlite),
            other => Err(anyhow!("unknown companies kind `{other}` (expected none | source | file | sqlite)")),
        }
    }

    pub fn pinned_today(&self) -> Result<Option<NaiveDate>> {
        self.validation.today.as_deref().filter(|s| !s.trim().is_empty()).map(parse_day).transpose()
    }

    pub fn source_path(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.source.path)
    }

    pub fn companies_path(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.companies.path)
    }

    pub fn artifact_root(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.report.artifact_root)
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".resval").join("resval.toml")
    }
}
