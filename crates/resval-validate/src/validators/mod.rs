mod consistency;
mod integrity;
mod references;
mod relationships;
mod temporal;

pub use consistency::ConsistencyValidator;
pub use integrity::IntegrityValidator;
pub use references::ExternalReferenceValidator;
pub use relationships::RelationshipValidator;
pub use temporal::TemporalValidator;

use crate::types::Validator;

/// The five units in run order.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(IntegrityValidator),
        Box::new(RelationshipValidator),
        Box::new(TemporalValidator),
        Box::new(ExternalReferenceValidator),
        Box::new(ConsistencyValidator),
    ]
}

/// "1 resolution" / "3 resolutions".
pub(crate) fn resolutions(n: usize) -> String {
    if n == 1 {
        "1 resolution".to_string()
    } else {
        format!("{n} resolutions")
    }
}
