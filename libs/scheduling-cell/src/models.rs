// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING ENTITIES
// ==============================================================================

/// A bookable interval of a doctor's calendar. Intervals are half-open
/// `[start_at, end_at)`; no two slots of one doctor may overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: TimeSlotStatus,
    pub is_available: bool,
    pub appointment_id: Option<Uuid>,
    pub appointment_request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeSlotStatus {
    Open,
    Booked,
    Blocked,
}

impl fmt::Display for TimeSlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlotStatus::Open => write!(f, "OPEN"),
            TimeSlotStatus::Booked => write!(f, "BOOKED"),
            TimeSlotStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// A client-initiated intent to be scheduled. Progresses through the
/// status lifecycle before an appointment is provisioned from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub animal_ids: Vec<Uuid>,
    pub species: Vec<Species>,
    pub preferred_time: DateTime<Utc>,
    pub reason: String,
    pub suggested_time_slot_id: Option<Uuid>,
    pub status: AppointmentRequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentRequestStatus {
    Pending,
    Rescheduled,
    Approved,
    Declined,
}

impl fmt::Display for AppointmentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentRequestStatus::Pending => write!(f, "PENDING"),
            AppointmentRequestStatus::Rescheduled => write!(f, "RESCHEDULED"),
            AppointmentRequestStatus::Approved => write!(f, "APPROVED"),
            AppointmentRequestStatus::Declined => write!(f, "DECLINED"),
        }
    }
}

/// Terminal artifact of request approval. Participants are fixed at
/// creation; only the animal list, procedure, and status may change later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub doctor_id: Uuid,
    pub time_slot_id: Uuid,
    pub animal_ids: Vec<Uuid>,
    pub procedure_id: Option<Uuid>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rodent,
    Reptile,
    Other,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSlotRequest {
    pub doctor_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub appointment_id: Option<Uuid>,
    pub appointment_request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDayQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeSlotRequest {
    pub time_slot_id: Uuid,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: Option<TimeSlotStatus>,
    pub is_available: Option<bool>,
    pub appointment_id: Option<Uuid>,
    pub appointment_request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotDetails {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub appointment: Option<Appointment>,
    pub appointment_request: Option<AppointmentRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_id: Uuid,
    pub preferred_time: DateTime<Utc>,
    pub reason: String,
    pub animal_ids: Option<Vec<Uuid>>,
    pub doctor_id: Option<Uuid>,
    pub species: Option<Vec<Species>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestStatusRequest {
    pub appointment_request_id: Uuid,
    pub new_status: AppointmentRequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDoctorRequest {
    pub appointment_request_id: Uuid,
    pub doctor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTimeSlotRequest {
    pub appointment_request_id: Uuid,
    pub time_slot_id: Uuid,
    pub doctor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestRequest {
    pub appointment_request_id: Uuid,
    pub time_slot_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequestRequest {
    pub appointment_request_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequestDetails {
    #[serde(flatten)]
    pub request: AppointmentRequest,
    pub suggested_time_slot: Option<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub animal_ids: Option<Vec<Uuid>>,
    pub procedure_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub time_slot: Option<TimeSlot>,
}

/// Input to appointment provisioning; assembled by the approval step from
/// the approved request and the reserved slot.
#[derive(Debug, Clone)]
pub struct ProvisionAppointment {
    pub client_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub time_slot_id: Uuid,
    pub animal_ids: Vec<Uuid>,
    pub procedure_id: Option<Uuid>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Time slot not found")]
    SlotNotFound,

    #[error("Appointment request not found")]
    RequestNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Invalid doctor id")]
    InvalidDoctor,

    #[error("Invalid user id")]
    InvalidUser,

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Time slot overlaps with an existing one")]
    SlotOverlap,

    #[error("Time slot already taken or unavailable")]
    SlotUnavailable,

    #[error("Invalid request or access denied")]
    AccessDenied,

    #[error("Only pending request can be cancelled")]
    NotCancellable,

    #[error("Can not create appointment")]
    ProvisioningFailed,

    #[error("Identity lookup failed: {0}")]
    Identity(String),
}
