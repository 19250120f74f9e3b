use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionStatus {
    Active,
    Inactive,
    Suspended,
    Expired,
    Revoked,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FindingKind {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Data,
    Relationships,
    Dates,
    References,
    Consistency,
}

/// Declaration order is rank order: `Critical` sorts first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl FindingKind {
    pub const ALL: [FindingKind; 4] = [Self::Error, Self::Warning, Self::Info, Self::Success];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Data,
        Self::Relationships,
        Self::Dates,
        Self::References,
        Self::Consistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Relationships => "relationships",
            Self::Dates => "dates",
            Self::References => "references",
            Self::Consistency => "consistency",
        }
    }
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown {what} `{value}`")]
pub struct ParseEnumError {
    pub what: &'static str,
    pub value: String,
}

macro_rules! from_str_via_all {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ParseEnumError { what: $what, value: s.to_string() })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

from_str_via_all!(FindingKind, "finding kind");
from_str_via_all!(Category, "category");
from_str_via_all!(Severity, "severity");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranks_critical_first() {
        let mut v = vec![Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        v.sort();
        assert_eq!(v, Severity::ALL.to_vec());
    }

    #[test]
    fn parses_filters_case_insensitively() {
        assert_eq!("ERROR".parse::<FindingKind>().unwrap(), FindingKind::Error);
        assert_eq!(" dates ".parse::<Category>().unwrap(), Category::Dates);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn unknown_status_does_not_fail() {
        let s: ResolutionStatus = serde_json::from_str("\"ARCHIVED\"").unwrap();
        assert_eq!(s, ResolutionStatus::Unknown);
        let s: ResolutionStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(s, ResolutionStatus::Active);
    }
}
