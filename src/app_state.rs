use crate::config::Config;
use crate::store::TaskStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub config: Config,
}
