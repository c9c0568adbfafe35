// libs/scheduling-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentRequestStatus, ApproveRequestRequest, AssignDoctorRequest, CancelRequestRequest,
    CreateAppointmentRequest,
    CreateTimeSlotRequest, PageQuery, PeriodQuery, SchedulingError, SuggestTimeSlotRequest,
    UpdateAppointmentRequest, UpdateRequestStatusRequest, UpdateTimeSlotRequest, WorkingDayQuery,
};
use crate::services::{AppointmentRequestService, AppointmentService, TimeSlotService};
use crate::state::AppState;

fn request_service(state: &AppState) -> AppointmentRequestService {
    AppointmentRequestService::new(
        state.store.clone(),
        state.identity.clone(),
        state.notifier.clone(),
    )
}

fn slot_service(state: &AppState) -> TimeSlotService {
    TimeSlotService::new(state.store.clone(), state.identity.clone())
}

// ==============================================================================
// TIME SLOT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<AppState>,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = slot_service(&state)
        .create_slot(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::InvalidDoctor => AppError::BadRequest("Invalid doctor id".to_string()),
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::SlotOverlap => {
                AppError::Conflict("Time slot overlaps with an existing one".to_string())
            }
            SchedulingError::Identity(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "time_slot": slot
    })))
}

#[axum::debug_handler]
pub async fn create_working_day(
    State(state): State<AppState>,
    Query(query): Query<WorkingDayQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = slot_service(&state)
        .create_working_day(query)
        .await
        .map_err(|e| match e {
            SchedulingError::InvalidDoctor => AppError::BadRequest("Invalid doctor id".to_string()),
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::SlotOverlap => AppError::Conflict(
                "Working day collides with existing time slots".to_string(),
            ),
            SchedulingError::Identity(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "created": slots.len(),
        "time_slots": slots
    })))
}

#[axum::debug_handler]
pub async fn get_time_slot(
    State(state): State<AppState>,
    Path(time_slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slot = slot_service(&state)
        .get_slot(time_slot_id)
        .await
        .map_err(|e| match e {
            SchedulingError::SlotNotFound => {
                AppError::NotFound("Time slot not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn get_time_slot_detailed(
    State(state): State<AppState>,
    Path(time_slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let details = slot_service(&state)
        .get_slot_detailed(time_slot_id)
        .await
        .map_err(|e| match e {
            SchedulingError::SlotNotFound => {
                AppError::NotFound("Time slot not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(details)))
}

#[axum::debug_handler]
pub async fn get_available_time_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slots = slot_service(&state).list_upcoming_available(doctor_id).await;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn get_upcoming_time_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let slots = slot_service(&state).list_upcoming(doctor_id).await;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn get_time_slots_by_period(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = slot_service(&state)
        .list_by_period(doctor_id, period.from, period.to)
        .await;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn get_overlapping_time_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = slot_service(&state)
        .find_overlapping(doctor_id, period.from, period.to)
        .await;
    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn update_time_slot(
    State(state): State<AppState>,
    Json(payload): Json<UpdateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = slot_service(&state)
        .update_slot(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::SlotNotFound => {
                AppError::NotFound("Time slot not found".to_string())
            }
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::SlotOverlap => {
                AppError::Conflict("Time slot overlaps with an existing one".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "time_slot": slot
    })))
}

#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<AppState>,
    Path(time_slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    slot_service(&state)
        .delete_slot(time_slot_id)
        .await
        .map_err(|e| match e {
            SchedulingError::SlotNotFound => {
                AppError::NotFound("Time slot not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({"success": true})))
}

// ==============================================================================
// APPOINTMENT REQUEST HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request_service(&state)
        .create(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::Validation(msg) => AppError::BadRequest(msg),
            SchedulingError::InvalidUser => AppError::BadRequest("Invalid user id".to_string()),
            SchedulingError::InvalidDoctor => AppError::BadRequest("Invalid doctor id".to_string()),
            SchedulingError::Identity(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment_request": request
    })))
}

#[axum::debug_handler]
pub async fn get_appointment_request(
    State(state): State<AppState>,
    Path(appointment_request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let details = request_service(&state)
        .get_details(appointment_request_id)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::NotFound("Appointment request not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(details)))
}

#[axum::debug_handler]
pub async fn get_client_appointment_requests(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let requests = request_service(&state).list_by_client(client_id).await;
    Ok(Json(json!(requests)))
}

#[axum::debug_handler]
pub async fn get_pending_appointment_requests(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let requests = request_service(&state)
        .get_pending_for_doctor(doctor_id)
        .await;
    Ok(Json(json!(requests)))
}

#[axum::debug_handler]
pub async fn get_appointment_requests_by_status(
    State(state): State<AppState>,
    Path(status): Path<AppointmentRequestStatus>,
) -> Result<Json<Value>, AppError> {
    let requests = request_service(&state).list_by_status(status).await;
    Ok(Json(json!(requests)))
}

#[axum::debug_handler]
pub async fn get_appointment_requests_paginated(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, AppError> {
    let requests = request_service(&state).list_paginated(page).await;
    Ok(Json(json!(requests)))
}

#[axum::debug_handler]
pub async fn assign_doctor(
    State(state): State<AppState>,
    Json(payload): Json<AssignDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request_service(&state)
        .assign_doctor(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::NotFound("Appointment request not found".to_string())
            }
            SchedulingError::InvalidDoctor => AppError::BadRequest("Invalid doctor id".to_string()),
            SchedulingError::Identity(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment_request": request
    })))
}

#[axum::debug_handler]
pub async fn suggest_time_slot(
    State(state): State<AppState>,
    Json(payload): Json<SuggestTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request_service(&state)
        .suggest_time_slot(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::BadRequest("Appointment request not found".to_string())
            }
            SchedulingError::SlotNotFound => {
                AppError::BadRequest("Time slot not found".to_string())
            }
            SchedulingError::SlotUnavailable => {
                AppError::Conflict("Time slot already taken or unavailable".to_string())
            }
            SchedulingError::InvalidDoctor => AppError::BadRequest("Invalid doctor id".to_string()),
            SchedulingError::Identity(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment_request": request
    })))
}

#[axum::debug_handler]
pub async fn approve_appointment_request(
    State(state): State<AppState>,
    Json(payload): Json<ApproveRequestRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = request_service(&state)
        .approve(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::BadRequest("Appointment request not found".to_string())
            }
            SchedulingError::SlotNotFound => {
                AppError::BadRequest("Time slot not found".to_string())
            }
            SchedulingError::SlotUnavailable => {
                AppError::Conflict("Time slot already taken or unavailable".to_string())
            }
            SchedulingError::ProvisioningFailed => {
                AppError::BadRequest("Can not create appointment".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment_request(
    State(state): State<AppState>,
    Json(payload): Json<CancelRequestRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request_service(&state)
        .cancel(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::AccessDenied => {
                AppError::BadRequest("Invalid request or access denied".to_string())
            }
            SchedulingError::NotCancellable => {
                AppError::BadRequest("Only pending request can be cancelled".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment_request": request
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_request_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRequestStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request_service(&state)
        .update_status(payload)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::NotFound("Appointment request not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment_request": request
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment_request(
    State(state): State<AppState>,
    Path(appointment_request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    request_service(&state)
        .delete(appointment_request_id)
        .await
        .map_err(|e| match e {
            SchedulingError::RequestNotFound => {
                AppError::NotFound("Appointment request not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({"success": true})))
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let details = AppointmentService::new(state.store.clone())
        .get_details(appointment_id)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(details)))
}

#[axum::debug_handler]
pub async fn get_client_appointments(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentService::new(state.store.clone())
        .list_by_client(client_id)
        .await;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentService::new(state.store.clone())
        .list_by_doctor(doctor_id)
        .await;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointments_paginated(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentService::new(state.store.clone())
        .list_paginated(page)
        .await;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = AppointmentService::new(state.store.clone())
        .update(appointment_id, payload)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    AppointmentService::new(state.store.clone())
        .delete(appointment_id)
        .await
        .map_err(|e| match e {
            SchedulingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({"success": true})))
}
