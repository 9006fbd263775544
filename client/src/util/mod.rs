//! Utility helpers shared across client state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate surface-lifecycle concerns from form and dashboard
//! logic to improve reuse and testability.

pub mod liveness;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a state mutex, recovering the data if a panicking holder poisoned it.
/// Guards are never held across an await.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
