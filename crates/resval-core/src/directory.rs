use std::collections::HashSet;

use thiserror::Error;

use crate::ids::CompanyId;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("company directory unavailable: {0}")]
    Unavailable(String),
    #[error("company lookup timed out for {0}")]
    Timeout(CompanyId),
}

/// Existence check for companies referenced by resolutions.
///
/// Implementations may block. An `Err` means "no answer", which callers
/// treat as "assume the company exists".
pub trait CompanyDirectory: Send + Sync {
    fn exists(&self, company_id: &CompanyId) -> Result<bool, DirectoryError>;
}

/// Directory backed by a fixed set of known company ids.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    known: HashSet<CompanyId>,
}

impl StaticDirectory {
    pub fn new(known: impl IntoIterator<Item = CompanyId>) -> Self {
        Self { known: known.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl CompanyDirectory for StaticDirectory {
    fn exists(&self, company_id: &CompanyId) -> Result<bool, DirectoryError> {
        Ok(self.known.contains(company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_directory_answers_membership() {
        let dir = StaticDirectory::new(vec![CompanyId::from_str("c1")]);
        assert!(dir.exists(&CompanyId::from_str("c1")).unwrap());
        assert!(!dir.exists(&CompanyId::from_str("c2")).unwrap());
        assert_eq!(dir.len(), 1);
    }
}
