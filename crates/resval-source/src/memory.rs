use std::collections::HashMap;
use std::sync::Mutex;

use resval_core::{Company, CompanyDirectory, CompanyId, DirectoryError, Resolution, ResolutionId};

use crate::traits::RecordSource;

/// In-memory record source and company directory. Not durable; meant for
/// tests and for embedding the engine behind another loader.
#[derive(Default)]
pub struct InMemorySource {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    resolutions: Vec<Resolution>,
    companies: HashMap<CompanyId, Company>,
    directory_offline: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(resolutions: Vec<Resolution>, companies: Vec<Company>) -> Self {
        let src = Self::new();
        {
            let mut inner = src.inner.lock().unwrap();
            inner.resolutions = resolutions;
            inner.companies = companies.into_iter().map(|c| (c.id.clone(), c)).collect();
        }
        src
    }

    /// Appends; duplicates are kept so they can be reported.
    pub fn insert_resolution(&self, resolution: Resolution) {
        self.inner.lock().unwrap().resolutions.push(resolution);
    }

    pub fn remove_resolution(&self, id: &ResolutionId) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.resolutions.len();
        inner.resolutions.retain(|r| &r.id != id);
        before - inner.resolutions.len()
    }

    pub fn insert_company(&self, company: Company) {
        self.inner.lock().unwrap().companies.insert(company.id.clone(), company);
    }

    /// Simulate an unreachable directory.
    pub fn set_directory_offline(&self, offline: bool) {
        self.inner.lock().unwrap().directory_offline = offline;
    }
}

impl RecordSource for InMemorySource {
    fn load_resolutions(&self) -> anyhow::Result<Vec<Resolution>> {
        Ok(self.inner.lock().unwrap().resolutions.clone())
    }

    fn load_companies(&self) -> anyhow::Result<Vec<Company>> {
        let inner = self.inner.lock().unwrap();
        let mut out: Vec<Company> = inner.companies.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl CompanyDirectory for InMemorySource {
    fn exists(&self, company_id: &CompanyId) -> Result<bool, DirectoryError> {
        let inner = self.inner.lock().unwrap();
        if inner.directory_offline {
            return Err(DirectoryError::Unavailable("in-memory directory offline".into()));
        }
        Ok(inner.companies.contains_key(company_id))
    }
}
