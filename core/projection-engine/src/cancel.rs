//! FILENAME: core/projection-engine/src/cancel.rs
//! PURPOSE: Cooperative cancellation for long enumerations.
//! CONTEXT: A table over many groups and samples can take a while to stream.
//! The token is cloned into whatever may want to stop it (another thread, a
//! UI handler) and polled by the nested loops and the view builder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
