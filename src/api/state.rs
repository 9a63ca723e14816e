//! Application state for the API server

use crate::{Config, LinkRelay};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the relay instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main LinkRelay instance
    pub relay: Arc<LinkRelay>,

    /// Configuration (for read access, runtime state lives in the relay)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(relay: Arc<LinkRelay>, config: Arc<Config>) -> Self {
        Self { relay, config }
    }
}
