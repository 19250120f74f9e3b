use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Advisory progress side channel, called after each validator.
pub trait ProgressObserver {
    fn on_progress(&self, phase: &str, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: Fn(&str, u8),
{
    fn on_progress(&self, phase: &str, percent: u8) {
        self(phase, percent)
    }
}

#[derive(Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _phase: &str, _percent: u8) {}
}

/// Shared flag checked by the orchestrator at phase boundaries.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
