pub mod cycle;
pub mod digest;
pub mod orchestrator;
pub mod progress;
pub mod types;
pub mod validators;

pub use cycle::find_cycles;
pub use digest::input_digest;
pub use orchestrator::*;
pub use progress::*;
pub use types::*;
pub use validators::*;
