// libs/scheduling-cell/src/router.rs
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn time_slot_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_time_slot))
        .route("/", patch(handlers::update_time_slot))
        .route("/working-day", post(handlers::create_working_day))
        .route("/{time_slot_id}", get(handlers::get_time_slot))
        .route("/{time_slot_id}", delete(handlers::delete_time_slot))
        .route("/{time_slot_id}/detailed", get(handlers::get_time_slot_detailed))
        .route("/doctor/{doctor_id}/available", get(handlers::get_available_time_slots))
        .route("/doctor/{doctor_id}/upcoming", get(handlers::get_upcoming_time_slots))
        .route("/doctor/{doctor_id}/overlapping", get(handlers::get_overlapping_time_slots))
        .route("/doctor/{doctor_id}/period", get(handlers::get_time_slots_by_period))
}

pub fn appointment_request_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_appointment_request))
        .route("/paginated", get(handlers::get_appointment_requests_paginated))
        .route("/status/{status}", get(handlers::get_appointment_requests_by_status))
        .route("/assign-doctor", patch(handlers::assign_doctor))
        .route("/suggest-time-slot", patch(handlers::suggest_time_slot))
        .route("/approve", post(handlers::approve_appointment_request))
        .route("/cancel", patch(handlers::cancel_appointment_request))
        .route("/status", patch(handlers::update_appointment_request_status))
        .route("/{appointment_request_id}", get(handlers::get_appointment_request))
        .route("/{appointment_request_id}", delete(handlers::delete_appointment_request))
        .route("/client/{client_id}", get(handlers::get_client_appointment_requests))
        .route("/doctor/{doctor_id}/pending", get(handlers::get_pending_appointment_requests))
}

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/paginated", get(handlers::get_appointments_paginated))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", patch(handlers::update_appointment))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .route("/client/{client_id}", get(handlers::get_client_appointments))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_appointments))
}
