use std::sync::Arc;

use crate::infrastructure::recognition::RelayService;

/// Shared application state. Request handling is stateless; this only holds
/// the service wiring built at startup.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

impl AppState {
    pub fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }
}
