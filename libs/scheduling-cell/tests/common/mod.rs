use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use scheduling_cell::{
    AppointmentRequestStatus, IdentityPort, NotificationPort, SchedulingStore,
};
use shared_models::identity::{DoctorRef, UserRef};

pub struct StubIdentity {
    users: Vec<Uuid>,
    doctors: Vec<Uuid>,
}

impl StubIdentity {
    pub fn knowing(users: Vec<Uuid>, doctors: Vec<Uuid>) -> Arc<Self> {
        Arc::new(Self { users, doctors })
    }
}

#[async_trait]
impl IdentityPort for StubIdentity {
    async fn resolve_user(&self, id: Uuid) -> anyhow::Result<Option<UserRef>> {
        Ok(self.users.contains(&id).then(|| UserRef {
            id,
            email: format!("{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: "Client".to_string(),
        }))
    }

    async fn resolve_doctor(&self, id: Uuid) -> anyhow::Result<Option<DoctorRef>> {
        Ok(self.doctors.contains(&id).then(|| DoctorRef {
            id,
            email: format!("{}@clinic.example", id),
            first_name: "Test".to_string(),
            last_name: "Doctor".to_string(),
            specialty: None,
        }))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub status_changes: Mutex<Vec<(Uuid, AppointmentRequestStatus)>>,
    pub reschedules: Mutex<Vec<(Uuid, DateTime<Utc>)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn notify_status_change(
        &self,
        recipient: &UserRef,
        status: AppointmentRequestStatus,
    ) -> anyhow::Result<()> {
        self.status_changes
            .lock()
            .unwrap()
            .push((recipient.id, status));
        Ok(())
    }

    async fn notify_reschedule(
        &self,
        recipient: &UserRef,
        suggested_time: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.reschedules
            .lock()
            .unwrap()
            .push((recipient.id, suggested_time));
        Ok(())
    }
}

pub fn store() -> Arc<SchedulingStore> {
    Arc::new(SchedulingStore::new())
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
