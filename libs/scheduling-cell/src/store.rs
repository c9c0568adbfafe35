// libs/scheduling-cell/src/store.rs
//
// In-process store for the scheduling state (time slots, appointment
// requests, appointments). Every mutating workflow operation runs inside
// `transaction`, which serializes writers and restores the pre-transaction
// snapshot on error, so a failure partway through a multi-entity change
// leaves no partial state behind.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentRequest, SchedulingError, TimeSlot};

#[derive(Debug, Default, Clone)]
pub struct StoreState {
    slots: HashMap<Uuid, TimeSlot>,
    requests: HashMap<Uuid, AppointmentRequest>,
    appointments: HashMap<Uuid, Appointment>,
}

impl StoreState {
    pub fn slot(&self, id: Uuid) -> Option<TimeSlot> {
        self.slots.get(&id).cloned()
    }

    /// First slot of `doctor_id` whose half-open interval overlaps
    /// `[start_at, end_at)`. Overlap test: existing.start < end AND
    /// existing.end > start.
    pub fn overlapping_slot(
        &self,
        doctor_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Option<TimeSlot> {
        self.slots
            .values()
            .filter(|slot| slot.doctor_id == doctor_id)
            .filter(|slot| exclude_id != Some(slot.id))
            .filter(|slot| slot.start_at < end_at && slot.end_at > start_at)
            .min_by_key(|slot| slot.start_at)
            .cloned()
    }

    /// Slots matching `pred`, ordered by start time ascending.
    pub fn slots_where<F>(&self, pred: F) -> Vec<TimeSlot>
    where
        F: Fn(&TimeSlot) -> bool,
    {
        let mut slots: Vec<TimeSlot> = self.slots.values().filter(|s| pred(s)).cloned().collect();
        slots.sort_by_key(|s| s.start_at);
        slots
    }

    pub fn request(&self, id: Uuid) -> Option<AppointmentRequest> {
        self.requests.get(&id).cloned()
    }

    /// Requests matching `pred`, ordered by creation time ascending.
    pub fn requests_where<F>(&self, pred: F) -> Vec<AppointmentRequest>
    where
        F: Fn(&AppointmentRequest) -> bool,
    {
        let mut requests: Vec<AppointmentRequest> =
            self.requests.values().filter(|r| pred(r)).cloned().collect();
        requests.sort_by_key(|r| r.created_at);
        requests
    }

    pub fn appointment(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.get(&id).cloned()
    }

    /// Appointments matching `pred`, ordered by creation time ascending.
    pub fn appointments_where<F>(&self, pred: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut appointments: Vec<Appointment> =
            self.appointments.values().filter(|a| pred(a)).cloned().collect();
        appointments.sort_by_key(|a| a.created_at);
        appointments
    }
}

/// Transaction handle. Reads go through the `Deref` to [`StoreState`];
/// writes use the `put_*`/`delete_*` methods and only become visible to
/// other callers once the enclosing `transaction` returns `Ok`.
pub struct Tx<'a> {
    state: &'a mut StoreState,
}

impl Deref for Tx<'_> {
    type Target = StoreState;

    fn deref(&self) -> &StoreState {
        self.state
    }
}

impl DerefMut for Tx<'_> {
    fn deref_mut(&mut self) -> &mut StoreState {
        self.state
    }
}

impl Tx<'_> {
    pub fn put_slot(&mut self, slot: TimeSlot) {
        self.state.slots.insert(slot.id, slot);
    }

    pub fn delete_slot(&mut self, id: Uuid) -> bool {
        self.state.slots.remove(&id).is_some()
    }

    pub fn put_request(&mut self, request: AppointmentRequest) {
        self.state.requests.insert(request.id, request);
    }

    pub fn delete_request(&mut self, id: Uuid) -> bool {
        self.state.requests.remove(&id).is_some()
    }

    /// Bulk delete; returns the number of removed requests.
    pub fn delete_requests_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&AppointmentRequest) -> bool,
    {
        let before = self.state.requests.len();
        self.state.requests.retain(|_, r| !pred(r));
        before - self.state.requests.len()
    }

    pub fn put_appointment(&mut self, appointment: Appointment) {
        self.state.appointments.insert(appointment.id, appointment);
    }

    pub fn delete_appointment(&mut self, id: Uuid) -> bool {
        self.state.appointments.remove(&id).is_some()
    }
}

/// Owner of the scheduling tables. A single mutex serializes writers, which
/// is what makes the check-then-write sequences of the slot invariants
/// atomic relative to concurrent callers: of two simultaneous
/// suggestions/approvals on one slot, exactly one observes it OPEN.
#[derive(Default)]
pub struct SchedulingStore {
    inner: Mutex<StoreState>,
}

impl SchedulingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` atomically: commit on `Ok`, restore the pre-transaction
    /// snapshot on `Err`.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, SchedulingError>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, SchedulingError>,
    {
        let mut guard = self.inner.lock().await;
        let snapshot = guard.clone();
        let mut tx = Tx { state: &mut guard };

        match f(&mut tx) {
            Ok(value) => Ok(value),
            Err(err) => {
                *guard = snapshot;
                Err(err)
            }
        }
    }

    /// Read-only projection against a consistent view of the state.
    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&StoreState) -> T,
    {
        let guard = self.inner.lock().await;
        f(&guard)
    }
}
