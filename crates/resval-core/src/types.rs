use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ids::*, model::*};

/// A transportation permit record as delivered by the record source.
///
/// Only `id` is mandatory at load time. Everything else is optional so that
/// incomplete records reach the validators and surface as findings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: ResolutionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResolutionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vigency_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vigency_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResolutionStatus>,
}

impl Resolution {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ResolutionId::from_str(id),
            number: None,
            company_id: None,
            parent_id: None,
            vigency_start: None,
            vigency_end: None,
            status: None,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(CompanyId::from_str(company_id));
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(ResolutionId::from_str(parent_id));
        self
    }

    pub fn with_vigency(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.vigency_start = start;
        self.vigency_end = end;
        self
    }

    pub fn with_status(mut self, status: ResolutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The number, unless absent or blank.
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// The owning company, unless absent or blank.
    pub fn company(&self) -> Option<&CompanyId> {
        self.company_id.as_ref().filter(|c| !c.is_blank())
    }

    /// The parent resolution, unless absent or blank.
    pub fn parent(&self) -> Option<&ResolutionId> {
        self.parent_id.as_ref().filter(|p| !p.is_blank())
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(ResolutionStatus::Active)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One reported rule violation. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: FindingKind,
    pub category: Category,
    pub severity: Severity,
    pub affected_ids: Vec<ResolutionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    pub auto_fixable: bool,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        kind: FindingKind,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            kind,
            category,
            severity,
            affected_ids: vec![],
            suggested_fix: None,
            auto_fixable: false,
        }
    }

    pub fn affecting(mut self, ids: Vec<ResolutionId>) -> Self {
        self.affected_ids = ids;
        self
    }

    pub fn suggest(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn auto_fixable(mut self, auto_fixable: bool) -> Self {
        self.auto_fixable = auto_fixable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_read_as_absent() {
        let r = Resolution::new("1").with_number("   ").with_company("").with_parent(" ");
        assert_eq!(r.number(), None);
        assert_eq!(r.company(), None);
        assert_eq!(r.parent(), None);
    }

    #[test]
    fn deserializes_sparse_camel_case_record() {
        let r: Resolution = serde_json::from_str(
            r#"{"id":"7","companyId":"c1","vigencyEnd":"2024-12-31","status":"ACTIVE"}"#,
        )
        .unwrap();
        assert_eq!(r.company().map(|c| c.as_str()), Some("c1"));
        assert_eq!(r.vigency_end, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert!(r.is_active());
        assert!(r.number.is_none());
    }

    #[test]
    fn finding_serializes_with_camel_case_keys() {
        let f = Finding::new("missing-number", FindingKind::Error, Category::Data, Severity::Critical, "t", "d")
            .affecting(vec![ResolutionId::from_str("1")])
            .auto_fixable(true);
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["affectedIds"][0], "1");
        assert_eq!(v["autoFixable"], true);
        assert!(v.get("suggestedFix").is_none());
    }
}
