// libs/identity-cell/src/services.rs
use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use scheduling_cell::IdentityPort;
use shared_config::AppConfig;
use shared_database::PostgrestClient;
use shared_models::identity::{DoctorRef, UserRef};

/// Identity lookups against the external user database. A lookup for an
/// unknown id returns `Ok(None)`; transport and auth failures surface as
/// errors.
pub struct HttpIdentityService {
    client: PostgrestClient,
}

impl HttpIdentityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: PostgrestClient::new(config),
        }
    }

    pub fn with_client(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityPort for HttpIdentityService {
    async fn resolve_user(&self, id: Uuid) -> anyhow::Result<Option<UserRef>> {
        let rows: Vec<UserRef> = self
            .client
            .request(
                Method::GET,
                &format!("/rest/v1/users?id=eq.{}&select=*", id),
                None,
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn resolve_doctor(&self, id: Uuid) -> anyhow::Result<Option<DoctorRef>> {
        let rows: Vec<DoctorRef> = self
            .client
            .request(
                Method::GET,
                &format!("/rest/v1/doctors?id=eq.{}&select=*", id),
                None,
            )
            .await?;
        Ok(rows.into_iter().next())
    }
}
