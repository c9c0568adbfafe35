// libs/scheduling-cell/src/ports.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_models::identity::{DoctorRef, UserRef};

use crate::models::AppointmentRequestStatus;

/// Lookup of users and doctors in the external identity database. The
/// scheduling workflow only ever asks "does this id exist, and who is it" ;
/// account management stays outside this crate.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    async fn resolve_user(&self, id: uuid::Uuid) -> anyhow::Result<Option<UserRef>>;
    async fn resolve_doctor(&self, id: uuid::Uuid) -> anyhow::Result<Option<DoctorRef>>;
}

/// Outbound client notifications for request lifecycle changes. Failures
/// here must never fail the workflow operation that triggered them.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify_status_change(
        &self,
        recipient: &UserRef,
        status: AppointmentRequestStatus,
    ) -> anyhow::Result<()>;

    async fn notify_reschedule(
        &self,
        recipient: &UserRef,
        suggested_time: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}
