//! Liveness flag for a mounted surface (form, modal, dashboard).
//!
//! Async work started by a surface captures a clone of its `Liveness` and
//! checks it before touching state, so results that arrive after teardown
//! are dropped instead of applied to a view nobody is looking at.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the surface torn down. Every clone observes it.
    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "liveness_test.rs"]
mod liveness_test;
