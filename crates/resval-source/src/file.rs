use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use resval_core::{Company, CompanyId, Resolution, StaticDirectory};
use serde::Deserialize;
use thiserror::Error;

use crate::traits::RecordSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported record file format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A record file is either a bare list of resolutions or a bundle that also
/// lists the known companies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<Resolution>),
    Bundle {
        resolutions: Vec<Resolution>,
        #[serde(default)]
        companies: Vec<Company>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompanyDocument {
    Ids(Vec<CompanyId>),
    List(Vec<Company>),
    Bundle { companies: Vec<Company> },
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let doc = match format {
        FileFormat::Json => serde_json::from_str(&s).with_context(|| format!("parse json {}", path.display()))?,
        FileFormat::Yaml => serde_yaml::from_str(&s).with_context(|| format!("parse yaml {}", path.display()))?,
    };
    Ok(doc)
}

/// Record source reading a JSON or YAML file on every load.
#[derive(Clone, Debug)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<(Vec<Resolution>, Vec<Company>)> {
        let doc: RecordDocument = parse(&self.path)?;
        Ok(match doc {
            RecordDocument::List(resolutions) => (resolutions, vec![]),
            RecordDocument::Bundle { resolutions, companies } => (resolutions, companies),
        })
    }
}

impl RecordSource for FileSource {
    fn load_resolutions(&self) -> Result<Vec<Resolution>> {
        let (resolutions, _) = self.load()?;
        tracing::debug!(path = %self.path.display(), count = resolutions.len(), "loaded resolutions");
        Ok(resolutions)
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        Ok(self.load()?.1)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Load a company directory from a file holding company ids, company
/// objects or a `{ companies: [...] }` bundle.
pub fn load_company_directory(path: &Path) -> Result<StaticDirectory> {
    let doc: CompanyDocument = parse(path)?;
    let ids: Vec<CompanyId> = match doc {
        CompanyDocument::Ids(ids) => ids,
        CompanyDocument::List(companies) | CompanyDocument::Bundle { companies } => {
            companies.into_iter().map(|c| c.id).collect()
        }
    };
    Ok(StaticDirectory::new(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use resval_core::CompanyDirectory;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn test_bare_json_list() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "r.json", r#"[{"id":"1","number":"R-0001-2025"},{"id":"2"}]"#);
        let src = FileSource::new(&p);
        let rs = src.load_resolutions().unwrap();
        assert_eq!(rs.len(), 2);
        assert!(src.load_companies().unwrap().is_empty());
    }

    #[test]
    fn test_yaml_bundle_with_companies() {
        let tmp = tempfile::tempdir().unwrap();
        let body = "resolutions:\n  - id: a\n    companyId: c1\n    vigencyStart: 2025-01-01\ncompanies:\n  - id: c1\n    name: Transportes Uno\n";
        let p = write(tmp.path(), "r.yml", body);
        let src = FileSource::new(&p);
        assert_eq!(src.load_resolutions().unwrap()[0].company().unwrap().as_str(), "c1");
        assert_eq!(src.load_companies().unwrap()[0].name.as_deref(), Some("Transportes Uno"));
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "r.csv", "id\n1\n");
        let err = FileSource::new(&p).load_resolutions().unwrap_err();
        assert!(err.to_string().contains("unsupported record file format"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "r.json", "[{\"number\": 1}]");
        assert!(FileSource::new(&p).load_resolutions().is_err());
    }

    #[test]
    fn test_company_directory_shapes() {
        let tmp = tempfile::tempdir().unwrap();
        let ids = write(tmp.path(), "ids.json", r#"["c1","c2"]"#);
        let objs = write(tmp.path(), "objs.json", r#"[{"id":"c3"}]"#);
        let bundle = write(tmp.path(), "bundle.yaml", "companies:\n  - id: c4\n");
        assert_eq!(load_company_directory(&ids).unwrap().len(), 2);
        assert!(load_company_directory(&objs).unwrap().exists(&CompanyId::from_str("c3")).unwrap());
        assert!(load_company_directory(&bundle).unwrap().exists(&CompanyId::from_str("c4")).unwrap());
    }
}
