use resval_core::{Company, Resolution};

/// Where resolutions come from. Failing to load is a run-level failure.
pub trait RecordSource: Send + Sync {
    fn load_resolutions(&self) -> anyhow::Result<Vec<Resolution>>;

    /// Companies known to this source, if it carries any.
    fn load_companies(&self) -> anyhow::Result<Vec<Company>> {
        Ok(vec![])
    }

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}
