// libs/scheduling-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    CreateTimeSlotRequest, SchedulingError, TimeSlot, TimeSlotDetails, TimeSlotStatus,
    UpdateTimeSlotRequest, WorkingDayQuery,
};
use crate::ports::IdentityPort;
use crate::store::SchedulingStore;

/// Hours covered by a standard working day, half-open.
const WORKING_DAY_START_HOUR: u32 = 9;
const WORKING_DAY_END_HOUR: u32 = 17;

/// Manages a doctor's calendar of time slots. All writes keep the
/// no-overlap invariant: at most one slot of a doctor covers any instant.
pub struct TimeSlotService {
    store: Arc<SchedulingStore>,
    identity: Arc<dyn IdentityPort>,
}

impl TimeSlotService {
    pub fn new(store: Arc<SchedulingStore>, identity: Arc<dyn IdentityPort>) -> Self {
        Self { store, identity }
    }

    /// Creates one slot. New slots start out BLOCKED and unavailable; the
    /// doctor opens them explicitly via update.
    pub async fn create_slot(
        &self,
        payload: CreateTimeSlotRequest,
    ) -> Result<TimeSlot, SchedulingError> {
        if payload.end_at <= payload.start_at {
            return Err(SchedulingError::InvalidTime(
                "End time must be after start time".to_string(),
            ));
        }

        self.ensure_doctor(payload.doctor_id).await?;

        let slot = self
            .store
            .transaction(|tx| {
                if tx
                    .overlapping_slot(payload.doctor_id, payload.start_at, payload.end_at, None)
                    .is_some()
                {
                    return Err(SchedulingError::SlotOverlap);
                }

                let slot = TimeSlot {
                    id: Uuid::new_v4(),
                    doctor_id: payload.doctor_id,
                    start_at: payload.start_at,
                    end_at: payload.end_at,
                    status: TimeSlotStatus::Blocked,
                    is_available: false,
                    appointment_id: payload.appointment_id,
                    appointment_request_id: payload.appointment_request_id,
                };
                tx.put_slot(slot.clone());
                Ok(slot)
            })
            .await?;

        info!(
            "Created time slot {} for doctor {} at {}",
            slot.id, slot.doctor_id, slot.start_at
        );
        Ok(slot)
    }

    /// Creates the full set of one-hour slots for a working day
    /// (09:00-17:00 UTC) in a single transaction. If any hour collides
    /// with an existing slot, no slot of the day is created.
    pub async fn create_working_day(
        &self,
        query: WorkingDayQuery,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        self.ensure_doctor(query.doctor_id).await?;

        let mut hours = Vec::new();
        for hour in WORKING_DAY_START_HOUR..WORKING_DAY_END_HOUR {
            let start = query
                .date
                .and_hms_opt(hour, 0, 0)
                .ok_or_else(|| SchedulingError::InvalidTime("Invalid date".to_string()))?
                .and_utc();
            let end = query
                .date
                .and_hms_opt(hour + 1, 0, 0)
                .ok_or_else(|| SchedulingError::InvalidTime("Invalid date".to_string()))?
                .and_utc();
            hours.push((start, end));
        }

        let slots = self
            .store
            .transaction(|tx| {
                let mut created = Vec::with_capacity(hours.len());
                for (start_at, end_at) in &hours {
                    if tx
                        .overlapping_slot(query.doctor_id, *start_at, *end_at, None)
                        .is_some()
                    {
                        return Err(SchedulingError::SlotOverlap);
                    }

                    let slot = TimeSlot {
                        id: Uuid::new_v4(),
                        doctor_id: query.doctor_id,
                        start_at: *start_at,
                        end_at: *end_at,
                        status: TimeSlotStatus::Blocked,
                        is_available: false,
                        appointment_id: None,
                        appointment_request_id: None,
                    };
                    tx.put_slot(slot.clone());
                    created.push(slot);
                }
                Ok(created)
            })
            .await?;

        info!(
            "Created working day of {} slots for doctor {} on {}",
            slots.len(),
            query.doctor_id,
            query.date
        );
        Ok(slots)
    }

    /// Partial update. When either boundary moves, the no-overlap check
    /// runs again against every other slot of the same doctor.
    pub async fn update_slot(
        &self,
        payload: UpdateTimeSlotRequest,
    ) -> Result<TimeSlot, SchedulingError> {
        self.store
            .transaction(|tx| {
                let mut slot = tx
                    .slot(payload.time_slot_id)
                    .ok_or(SchedulingError::SlotNotFound)?;

                let start_at = payload.start_at.unwrap_or(slot.start_at);
                let end_at = payload.end_at.unwrap_or(slot.end_at);
                if end_at <= start_at {
                    return Err(SchedulingError::InvalidTime(
                        "End time must be after start time".to_string(),
                    ));
                }

                let times_changed = start_at != slot.start_at || end_at != slot.end_at;
                if times_changed
                    && tx
                        .overlapping_slot(slot.doctor_id, start_at, end_at, Some(slot.id))
                        .is_some()
                {
                    return Err(SchedulingError::SlotOverlap);
                }

                slot.start_at = start_at;
                slot.end_at = end_at;
                if let Some(status) = payload.status {
                    slot.status = status;
                }
                if let Some(is_available) = payload.is_available {
                    slot.is_available = is_available;
                }
                if let Some(appointment_id) = payload.appointment_id {
                    slot.appointment_id = Some(appointment_id);
                }
                if let Some(request_id) = payload.appointment_request_id {
                    slot.appointment_request_id = Some(request_id);
                }

                tx.put_slot(slot.clone());
                Ok(slot)
            })
            .await
    }

    pub async fn delete_slot(&self, id: Uuid) -> Result<(), SchedulingError> {
        let deleted = self.store.transaction(|tx| Ok(tx.delete_slot(id))).await?;
        if !deleted {
            return Err(SchedulingError::SlotNotFound);
        }
        debug!("Deleted time slot {}", id);
        Ok(())
    }

    pub async fn get_slot(&self, id: Uuid) -> Result<TimeSlot, SchedulingError> {
        self.store
            .read(|state| state.slot(id))
            .await
            .ok_or(SchedulingError::SlotNotFound)
    }

    /// Slot together with the appointment and request it points at.
    pub async fn get_slot_detailed(&self, id: Uuid) -> Result<TimeSlotDetails, SchedulingError> {
        self.store
            .read(|state| {
                let slot = state.slot(id)?;
                let appointment = slot.appointment_id.and_then(|a| state.appointment(a));
                let appointment_request = slot
                    .appointment_request_id
                    .and_then(|r| state.request(r));
                Some(TimeSlotDetails {
                    slot,
                    appointment,
                    appointment_request,
                })
            })
            .await
            .ok_or(SchedulingError::SlotNotFound)
    }

    /// Slots of a doctor overlapping `[from, to)`.
    pub async fn find_overlapping(
        &self,
        doctor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<TimeSlot> {
        self.store
            .read(|state| {
                state.slots_where(|s| {
                    s.doctor_id == doctor_id && s.start_at < to && s.end_at > from
                })
            })
            .await
    }

    /// Slots of a doctor starting inside `[from, to]`. Unlike
    /// [`Self::find_overlapping`], a slot that starts before `from` does
    /// not show up here even when it reaches into the period.
    pub async fn list_by_period(
        &self,
        doctor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<TimeSlot> {
        self.store
            .read(|state| {
                state.slots_where(|s| {
                    s.doctor_id == doctor_id && s.start_at >= from && s.start_at <= to
                })
            })
            .await
    }

    /// Future slots a client could still be booked into.
    pub async fn list_upcoming_available(&self, doctor_id: Uuid) -> Vec<TimeSlot> {
        let now = Utc::now();
        self.store
            .read(|state| {
                state.slots_where(|s| {
                    s.doctor_id == doctor_id
                        && s.is_available
                        && s.status == TimeSlotStatus::Open
                        && s.start_at > now
                })
            })
            .await
    }

    /// All future slots of a doctor regardless of status.
    pub async fn list_upcoming(&self, doctor_id: Uuid) -> Vec<TimeSlot> {
        let now = Utc::now();
        self.store
            .read(|state| state.slots_where(|s| s.doctor_id == doctor_id && s.start_at > now))
            .await
    }

    async fn ensure_doctor(&self, doctor_id: Uuid) -> Result<(), SchedulingError> {
        let doctor = self
            .identity
            .resolve_doctor(doctor_id)
            .await
            .map_err(|e| SchedulingError::Identity(e.to_string()))?;
        if doctor.is_none() {
            return Err(SchedulingError::InvalidDoctor);
        }
        Ok(())
    }
}
