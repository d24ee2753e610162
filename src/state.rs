use crate::config::Config;
use crate::store::ContactStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub config: Arc<Config>,
}
