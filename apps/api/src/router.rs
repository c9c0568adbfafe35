use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use identity_cell::HttpIdentityService;
use notification_cell::{MailRelayService, NullNotifier};
use scheduling_cell::router::{appointment_request_routes, appointment_routes, time_slot_routes};
use scheduling_cell::{AppState, NotificationPort, SchedulingStore};
use shared_config::AppConfig;

/// Composition root: one store, one identity adapter, one notifier.
pub fn build_state(config: AppConfig) -> AppState {
    let store = Arc::new(SchedulingStore::new());
    let identity = Arc::new(HttpIdentityService::new(&config));

    let notifier: Arc<dyn NotificationPort> = if config.is_mail_configured() {
        Arc::new(MailRelayService::new(&config))
    } else {
        Arc::new(NullNotifier)
    };

    AppState::new(config, store, identity, notifier)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Vet clinic scheduling API is running!" }))
        .nest("/time-slot", time_slot_routes())
        .nest("/appointment-request", appointment_request_routes())
        .nest("/appointment", appointment_routes())
        .with_state(state)
}
