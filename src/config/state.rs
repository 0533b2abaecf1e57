// Application state module
// Read-only state shared by every request handler

use std::sync::Arc;

use super::types::Config;
use crate::upstream::Upstream;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in it is mutated
/// while serving requests.
pub struct AppState {
    pub config: Config,
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        Self { config, upstream }
    }
}
