// libs/scheduling-cell/src/services/requests.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentRequest, AppointmentRequestDetails, AppointmentRequestStatus,
    ApproveRequestRequest, AssignDoctorRequest, CancelRequestRequest, CreateAppointmentRequest,
    PageQuery, ProvisionAppointment, SchedulingError, SuggestTimeSlotRequest, TimeSlotStatus,
    UpdateRequestStatusRequest,
};
use crate::ports::{IdentityPort, NotificationPort};
use crate::services::appointments::AppointmentService;
use crate::store::SchedulingStore;

const MIN_REASON_LENGTH: usize = 10;

/// Drives the appointment request lifecycle:
/// PENDING -> RESCHEDULED (slot suggested) -> APPROVED (appointment
/// provisioned), or PENDING -> DECLINED (client cancellation).
///
/// Every transition that touches a slot runs in one store transaction, so a
/// failure in any step leaves both the request and the slot untouched.
/// Notifications go out only after the transaction commits and never fail
/// the operation.
pub struct AppointmentRequestService {
    store: Arc<SchedulingStore>,
    identity: Arc<dyn IdentityPort>,
    notifier: Arc<dyn NotificationPort>,
}

impl AppointmentRequestService {
    pub fn new(
        store: Arc<SchedulingStore>,
        identity: Arc<dyn IdentityPort>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            store,
            identity,
            notifier,
        }
    }

    pub async fn create(
        &self,
        payload: CreateAppointmentRequest,
    ) -> Result<AppointmentRequest, SchedulingError> {
        if payload.preferred_time <= Utc::now() {
            return Err(SchedulingError::InvalidTime(
                "Preferred time must be in the future".to_string(),
            ));
        }
        if payload.reason.trim().len() < MIN_REASON_LENGTH {
            return Err(SchedulingError::Validation(format!(
                "Reason must be at least {} characters long",
                MIN_REASON_LENGTH
            )));
        }

        self.ensure_user(payload.client_id).await?;
        if let Some(doctor_id) = payload.doctor_id {
            self.ensure_doctor(doctor_id).await?;
        }

        let request = self
            .store
            .transaction(|tx| {
                let request = AppointmentRequest {
                    id: Uuid::new_v4(),
                    client_id: payload.client_id,
                    doctor_id: payload.doctor_id,
                    animal_ids: payload.animal_ids.clone().unwrap_or_default(),
                    species: payload.species.clone().unwrap_or_default(),
                    preferred_time: payload.preferred_time,
                    reason: payload.reason.trim().to_string(),
                    suggested_time_slot_id: None,
                    status: AppointmentRequestStatus::Pending,
                    created_at: Utc::now(),
                };
                tx.put_request(request.clone());
                Ok(request)
            })
            .await?;

        info!(
            "Created appointment request {} for client {}",
            request.id, request.client_id
        );
        self.notify_status(request.client_id, request.status).await;
        Ok(request)
    }

    pub async fn assign_doctor(
        &self,
        payload: AssignDoctorRequest,
    ) -> Result<AppointmentRequest, SchedulingError> {
        self.ensure_doctor(payload.doctor_id).await?;

        self.store
            .transaction(|tx| {
                let mut request = tx
                    .request(payload.appointment_request_id)
                    .ok_or(SchedulingError::RequestNotFound)?;
                request.doctor_id = Some(payload.doctor_id);
                tx.put_request(request.clone());
                Ok(request)
            })
            .await
    }

    /// A doctor proposes a concrete slot for a pending request. The slot
    /// moves to BOOKED and the request to RESCHEDULED; the client is asked
    /// to confirm the new time by mail.
    pub async fn suggest_time_slot(
        &self,
        payload: SuggestTimeSlotRequest,
    ) -> Result<AppointmentRequest, SchedulingError> {
        self.ensure_doctor(payload.doctor_id).await?;

        let (request, slot_start) = self
            .store
            .transaction(|tx| {
                let mut request = tx
                    .request(payload.appointment_request_id)
                    .ok_or(SchedulingError::RequestNotFound)?;
                let mut slot = tx
                    .slot(payload.time_slot_id)
                    .ok_or(SchedulingError::SlotNotFound)?;

                if !slot.is_available || slot.status != TimeSlotStatus::Open {
                    return Err(SchedulingError::SlotUnavailable);
                }

                slot.status = TimeSlotStatus::Booked;
                slot.appointment_request_id = Some(request.id);

                request.doctor_id = Some(payload.doctor_id);
                request.suggested_time_slot_id = Some(slot.id);
                request.status = AppointmentRequestStatus::Rescheduled;

                let slot_start = slot.start_at;
                tx.put_slot(slot);
                tx.put_request(request.clone());
                Ok((request, slot_start))
            })
            .await?;

        info!(
            "Suggested slot {} for request {}",
            payload.time_slot_id, request.id
        );
        self.notify_reschedule(request.client_id, slot_start).await;
        Ok(request)
    }

    /// Finalizes a request: reserves the slot for good and provisions the
    /// appointment in the same transaction. A request without an assigned
    /// doctor cannot produce an appointment and the whole step rolls back.
    pub async fn approve(
        &self,
        payload: ApproveRequestRequest,
    ) -> Result<Appointment, SchedulingError> {
        let (appointment, client_id) = self
            .store
            .transaction(|tx| {
                let mut request = tx
                    .request(payload.appointment_request_id)
                    .ok_or(SchedulingError::RequestNotFound)?;
                let mut slot = tx
                    .slot(payload.time_slot_id)
                    .ok_or(SchedulingError::SlotNotFound)?;

                let holdable = slot.status == TimeSlotStatus::Open
                    || slot.status == TimeSlotStatus::Booked;
                if !slot.is_available || !holdable {
                    return Err(SchedulingError::SlotUnavailable);
                }

                request.status = AppointmentRequestStatus::Approved;
                request.suggested_time_slot_id = Some(slot.id);
                tx.put_request(request.clone());

                let appointment = AppointmentService::provision(
                    tx,
                    ProvisionAppointment {
                        client_id: request.client_id,
                        doctor_id: request.doctor_id,
                        time_slot_id: slot.id,
                        animal_ids: request.animal_ids.clone(),
                        procedure_id: None,
                    },
                )
                .ok_or(SchedulingError::ProvisioningFailed)?;

                slot.status = TimeSlotStatus::Blocked;
                slot.is_available = false;
                slot.appointment_id = Some(appointment.id);
                slot.appointment_request_id = Some(request.id);
                tx.put_slot(slot);

                Ok((appointment, request.client_id))
            })
            .await?;

        info!(
            "Approved request {} into appointment {}",
            payload.appointment_request_id, appointment.id
        );
        self.notify_status(client_id, AppointmentRequestStatus::Approved)
            .await;
        Ok(appointment)
    }

    /// Clients may withdraw their own request while it is still pending.
    pub async fn cancel(
        &self,
        payload: CancelRequestRequest,
    ) -> Result<AppointmentRequest, SchedulingError> {
        let request = self
            .store
            .transaction(|tx| {
                let mut request = tx
                    .request(payload.appointment_request_id)
                    .filter(|r| r.client_id == payload.user_id)
                    .ok_or(SchedulingError::AccessDenied)?;

                if request.status != AppointmentRequestStatus::Pending {
                    return Err(SchedulingError::NotCancellable);
                }

                request.status = AppointmentRequestStatus::Declined;
                tx.put_request(request.clone());
                Ok(request)
            })
            .await?;

        self.notify_status(request.client_id, request.status).await;
        Ok(request)
    }

    pub async fn update_status(
        &self,
        payload: UpdateRequestStatusRequest,
    ) -> Result<AppointmentRequest, SchedulingError> {
        let request = self
            .store
            .transaction(|tx| {
                let mut request = tx
                    .request(payload.appointment_request_id)
                    .ok_or(SchedulingError::RequestNotFound)?;
                request.status = payload.new_status;
                tx.put_request(request.clone());
                Ok(request)
            })
            .await?;

        self.notify_status(request.client_id, request.status).await;
        Ok(request)
    }

    /// Deletes PENDING and DECLINED requests older than the retention
    /// window. Returns the number of removed requests.
    pub async fn expire_stale(&self, retention_days: i64) -> Result<usize, SchedulingError> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        self.store
            .transaction(|tx| {
                Ok(tx.delete_requests_where(|r| {
                    matches!(
                        r.status,
                        AppointmentRequestStatus::Pending | AppointmentRequestStatus::Declined
                    ) && r.created_at < cutoff
                }))
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SchedulingError> {
        let deleted = self
            .store
            .transaction(|tx| Ok(tx.delete_request(id)))
            .await?;
        if !deleted {
            return Err(SchedulingError::RequestNotFound);
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<AppointmentRequest, SchedulingError> {
        self.store
            .read(|state| state.request(id))
            .await
            .ok_or(SchedulingError::RequestNotFound)
    }

    pub async fn get_details(
        &self,
        id: Uuid,
    ) -> Result<AppointmentRequestDetails, SchedulingError> {
        self.store
            .read(|state| {
                let request = state.request(id)?;
                let suggested_time_slot =
                    request.suggested_time_slot_id.and_then(|s| state.slot(s));
                Some(AppointmentRequestDetails {
                    request,
                    suggested_time_slot,
                })
            })
            .await
            .ok_or(SchedulingError::RequestNotFound)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Vec<AppointmentRequest> {
        self.store
            .read(|state| state.requests_where(|r| r.client_id == client_id))
            .await
    }

    pub async fn list_by_status(&self, status: AppointmentRequestStatus) -> Vec<AppointmentRequest> {
        self.store
            .read(|state| state.requests_where(|r| r.status == status))
            .await
    }

    pub async fn get_pending_for_doctor(&self, doctor_id: Uuid) -> Vec<AppointmentRequest> {
        self.store
            .read(|state| {
                state.requests_where(|r| {
                    r.doctor_id == Some(doctor_id)
                        && r.status == AppointmentRequestStatus::Pending
                })
            })
            .await
    }

    pub async fn list_paginated(&self, page: PageQuery) -> Vec<AppointmentRequest> {
        let skip = page.skip.unwrap_or(0);
        let take = page.take.unwrap_or(usize::MAX);
        self.store
            .read(|state| {
                state
                    .requests_where(|_| true)
                    .into_iter()
                    .skip(skip)
                    .take(take)
                    .collect()
            })
            .await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), SchedulingError> {
        let user = self
            .identity
            .resolve_user(user_id)
            .await
            .map_err(|e| SchedulingError::Identity(e.to_string()))?;
        if user.is_none() {
            return Err(SchedulingError::InvalidUser);
        }
        Ok(())
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

    async fn notify_status(&self, client_id: Uuid, status: AppointmentRequestStatus) {
        match self.identity.resolve_user(client_id).await {
            Ok(Some(user)) => {
                if let Err(err) = self.notifier.notify_status_change(&user, status).await {
                    warn!(
                        "Failed to notify {} about request status {}: {}",
                        user.email, status, err
                    );
                }
            }
            Ok(None) => warn!("No user {} found for status notification", client_id),
            Err(err) => warn!("Identity lookup failed before notification: {}", err),
        }
    }

    async fn notify_reschedule(&self, client_id: Uuid, suggested_time: chrono::DateTime<Utc>) {
        match self.identity.resolve_user(client_id).await {
            Ok(Some(user)) => {
                if let Err(err) = self.notifier.notify_reschedule(&user, suggested_time).await {
                    warn!(
                        "Failed to notify {} about reschedule: {}",
                        user.email, err
                    );
                }
            }
            Ok(None) => warn!("No user {} found for reschedule notification", client_id),
            Err(err) => warn!("Identity lookup failed before notification: {}", err),
        }
    }
}
