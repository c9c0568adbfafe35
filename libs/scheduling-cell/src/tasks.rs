// libs/scheduling-cell/src/tasks.rs
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::services::AppointmentRequestService;
use crate::state::AppState;

const SWEEP_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Daily sweep that drops PENDING and DECLINED requests older than the
/// configured retention window. The first pass runs at startup.
pub async fn run_expiry_sweep(state: AppState) {
    let service = AppointmentRequestService::new(
        state.store.clone(),
        state.identity.clone(),
        state.notifier.clone(),
    );
    let retention_days = state.config.request_retention_days;

    let mut ticker = interval(SWEEP_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Request expiry sweep running daily, retention {} days",
        retention_days
    );

    loop {
        ticker.tick().await;
        match service.expire_stale(retention_days).await {
            Ok(0) => debug!("Expiry sweep found no stale requests"),
            Ok(count) => info!("Expiry sweep removed {} stale requests", count),
            Err(err) => error!("Expiry sweep failed: {}", err),
        }
    }
}
