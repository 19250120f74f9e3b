use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ArtifactRole {
    Report,
    Worklog,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub role: ArtifactRole,
    pub path: String,
}

/// Index of everything written for one saved validation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub source: String,
    pub saved_at: DateTime<Utc>,
    pub validated_at: NaiveDate,
    pub input_digest: String,
    pub total_records: usize,
    pub success_score: u8,
    pub artifacts: Vec<ArtifactRecord>,
}
