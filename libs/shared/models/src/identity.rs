use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Projection of a clinic client as returned by the identity service.
/// Carries just enough to address notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Projection of a doctor account from the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}
