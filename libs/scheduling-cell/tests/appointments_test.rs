mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use uuid::Uuid;

use scheduling_cell::services::{AppointmentRequestService, AppointmentService, TimeSlotService};
use scheduling_cell::{
    AppointmentStatus, ApproveRequestRequest, CreateAppointmentRequest, CreateTimeSlotRequest,
    SchedulingError, SchedulingStore, TimeSlotStatus, UpdateAppointmentRequest,
    UpdateTimeSlotRequest,
};

use common::{in_days, store, RecordingNotifier, StubIdentity};

struct Fixture {
    store: Arc<SchedulingStore>,
    appointments: AppointmentService,
    client: Uuid,
    doctor: Uuid,
    appointment: scheduling_cell::Appointment,
    slot_id: Uuid,
}

/// Runs the whole workflow once so every test starts from a real
/// provisioned appointment.
async fn provisioned() -> Fixture {
    let client = Uuid::new_v4();
    let doctor = Uuid::new_v4();
    let store = store();
    let identity = StubIdentity::knowing(vec![client], vec![doctor]);
    let requests =
        AppointmentRequestService::new(store.clone(), identity.clone(), RecordingNotifier::new());
    let slots = TimeSlotService::new(store.clone(), identity);

    let request = requests
        .create(CreateAppointmentRequest {
            client_id: client,
            preferred_time: in_days(3),
            reason: "Annual vaccination appointment".to_string(),
            animal_ids: Some(vec![Uuid::new_v4()]),
            doctor_id: Some(doctor),
            species: None,
        })
        .await
        .unwrap();

    let start_at = in_days(2);
    let slot = slots
        .create_slot(CreateTimeSlotRequest {
            doctor_id: doctor,
            start_at,
            end_at: start_at + Duration::hours(1),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();
    slots
        .update_slot(UpdateTimeSlotRequest {
            time_slot_id: slot.id,
            start_at: None,
            end_at: None,
            status: Some(TimeSlotStatus::Open),
            is_available: Some(true),
            appointment_id: None,
            appointment_request_id: None,
        })
        .await
        .unwrap();

    let appointment = requests
        .approve(ApproveRequestRequest {
            appointment_request_id: request.id,
            time_slot_id: slot.id,
        })
        .await
        .unwrap();

    Fixture {
        appointments: AppointmentService::new(store.clone()),
        store,
        client,
        doctor,
        appointment,
        slot_id: slot.id,
    }
}

#[tokio::test]
async fn details_include_the_reserved_slot() {
    let fx = provisioned().await;

    let details = fx.appointments.get_details(fx.appointment.id).await.unwrap();

    assert_eq!(details.appointment.id, fx.appointment.id);
    let slot = details.time_slot.expect("slot should be linked");
    assert_eq!(slot.id, fx.slot_id);
    assert_eq!(slot.appointment_id, Some(fx.appointment.id));
}

#[tokio::test]
async fn listings_filter_by_participant() {
    let fx = provisioned().await;

    let by_client = fx.appointments.list_by_client(fx.client).await;
    assert_eq!(by_client.len(), 1);

    let by_doctor = fx.appointments.list_by_doctor(fx.doctor).await;
    assert_eq!(by_doctor.len(), 1);

    assert!(fx.appointments.list_by_client(Uuid::new_v4()).await.is_empty());
}

#[tokio::test]
async fn update_touches_only_mutable_fields() {
    let fx = provisioned().await;
    let new_animals = vec![Uuid::new_v4(), Uuid::new_v4()];
    let procedure = Uuid::new_v4();

    let updated = fx
        .appointments
        .update(
            fx.appointment.id,
            UpdateAppointmentRequest {
                animal_ids: Some(new_animals.clone()),
                procedure_id: Some(procedure),
                status: Some(AppointmentStatus::Completed),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.animal_ids, new_animals);
    assert_eq!(updated.procedure_id, Some(procedure));
    assert_eq!(updated.status, AppointmentStatus::Completed);
    assert_eq!(updated.client_id, fx.appointment.client_id);
    assert_eq!(updated.time_slot_id, fx.appointment.time_slot_id);
}

#[tokio::test]
async fn update_missing_appointment_is_not_found() {
    let fx = provisioned().await;

    let result = fx
        .appointments
        .update(
            Uuid::new_v4(),
            UpdateAppointmentRequest {
                animal_ids: None,
                procedure_id: None,
                status: Some(AppointmentStatus::Cancelled),
            },
        )
        .await;

    assert_matches!(result, Err(SchedulingError::AppointmentNotFound));
}

#[tokio::test]
async fn delete_unlinks_the_slot() {
    let fx = provisioned().await;

    fx.appointments.delete(fx.appointment.id).await.unwrap();

    assert_matches!(
        fx.appointments.get(fx.appointment.id).await,
        Err(SchedulingError::AppointmentNotFound)
    );

    let slot = fx
        .store
        .read(|state| state.slot(fx.slot_id))
        .await
        .unwrap();
    assert!(slot.appointment_id.is_none());
}
