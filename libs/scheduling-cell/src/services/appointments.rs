// libs/scheduling-cell/src/services/appointments.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentDetails, AppointmentStatus, PageQuery, ProvisionAppointment,
    SchedulingError, UpdateAppointmentRequest,
};
use crate::store::{SchedulingStore, Tx};

/// Read and maintenance surface for provisioned appointments. Creation
/// happens exclusively through [`AppointmentService::provision`] inside the
/// approval transaction; there is no standalone create endpoint.
pub struct AppointmentService {
    store: Arc<SchedulingStore>,
}

impl AppointmentService {
    pub fn new(store: Arc<SchedulingStore>) -> Self {
        Self { store }
    }

    /// Builds the appointment inside the caller's transaction. Returns
    /// `None` when the request never got a doctor assigned, which the
    /// caller treats as a failed approval.
    pub fn provision(tx: &mut Tx<'_>, input: ProvisionAppointment) -> Option<Appointment> {
        let doctor_id = input.doctor_id?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: input.client_id,
            doctor_id,
            time_slot_id: input.time_slot_id,
            animal_ids: input.animal_ids,
            procedure_id: input.procedure_id,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        };
        tx.put_appointment(appointment.clone());
        Some(appointment)
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.store
            .read(|state| state.appointment(id))
            .await
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    pub async fn get_details(&self, id: Uuid) -> Result<AppointmentDetails, SchedulingError> {
        self.store
            .read(|state| {
                let appointment = state.appointment(id)?;
                let time_slot = state
                    .slots_where(|s| s.appointment_id == Some(appointment.id))
                    .into_iter()
                    .next();
                Some(AppointmentDetails {
                    appointment,
                    time_slot,
                })
            })
            .await
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Vec<Appointment> {
        self.store
            .read(|state| state.appointments_where(|a| a.client_id == client_id))
            .await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        self.store
            .read(|state| state.appointments_where(|a| a.doctor_id == doctor_id))
            .await
    }

    pub async fn list_paginated(&self, page: PageQuery) -> Vec<Appointment> {
        let skip = page.skip.unwrap_or(0);
        let take = page.take.unwrap_or(usize::MAX);
        self.store
            .read(|state| {
                state
                    .appointments_where(|_| true)
                    .into_iter()
                    .skip(skip)
                    .take(take)
                    .collect()
            })
            .await
    }

    /// Only the animal list, procedure, and status are mutable after
    /// provisioning; the participants and the slot are fixed.
    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        self.store
            .transaction(|tx| {
                let mut appointment = tx
                    .appointment(id)
                    .ok_or(SchedulingError::AppointmentNotFound)?;

                if let Some(animal_ids) = payload.animal_ids.clone() {
                    appointment.animal_ids = animal_ids;
                }
                if let Some(procedure_id) = payload.procedure_id {
                    appointment.procedure_id = Some(procedure_id);
                }
                if let Some(status) = payload.status {
                    appointment.status = status;
                }

                tx.put_appointment(appointment.clone());
                Ok(appointment)
            })
            .await
    }

    /// Removes the appointment and unlinks any slot still pointing at it,
    /// in one transaction.
    pub async fn delete(&self, id: Uuid) -> Result<(), SchedulingError> {
        self.store
            .transaction(|tx| {
                if !tx.delete_appointment(id) {
                    return Err(SchedulingError::AppointmentNotFound);
                }

                let linked = tx.slots_where(|s| s.appointment_id == Some(id));
                for mut slot in linked {
                    slot.appointment_id = None;
                    tx.put_slot(slot);
                }
                Ok(())
            })
            .await?;

        info!("Deleted appointment {}", id);
        Ok(())
    }
}
