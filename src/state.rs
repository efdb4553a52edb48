//! Shared application state for all routes.

use crate::gateway::Gateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Each request opens its own session from this gateway.
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(gateway: impl Gateway + 'static) -> Self {
        AppState {
            gateway: Arc::new(gateway),
        }
    }
}
