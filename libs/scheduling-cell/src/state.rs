// libs/scheduling-cell/src/state.rs
use std::sync::Arc;

use shared_config::AppConfig;

use crate::ports::{IdentityPort, NotificationPort};
use crate::store::SchedulingStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SchedulingStore>,
    pub identity: Arc<dyn IdentityPort>,
    pub notifier: Arc<dyn NotificationPort>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<SchedulingStore>,
        identity: Arc<dyn IdentityPort>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            config,
            store,
            identity,
            notifier,
        }
    }
}
