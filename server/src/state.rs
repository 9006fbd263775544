//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the lead store behind the `LeadStore` trait, so handlers never
//! know whether Postgres or the in-memory store is in use, plus the parsed
//! server configuration.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::LeadStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeadStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>, config: ServerConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
