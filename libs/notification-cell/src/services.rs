// libs/notification-cell/src/services.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::{AppointmentRequestStatus, NotificationPort};
use shared_config::AppConfig;
use shared_models::identity::UserRef;

/// Sends client mail through the external relay (`POST {MAIL_API_URL}/messages`).
pub struct MailRelayService {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl MailRelayService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        }
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    async fn send(&self, to: &str, subject: &str, text: String) -> Result<()> {
        let url = format!("{}/messages", self.base_url);
        debug!("Sending mail '{}' to {}", subject, to);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "text": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Mail relay error ({}): {}", status, error_text));
        }

        info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}

#[async_trait]
impl NotificationPort for MailRelayService {
    async fn notify_status_change(
        &self,
        recipient: &UserRef,
        status: AppointmentRequestStatus,
    ) -> Result<()> {
        let text = format!(
            "Hello {},\n\nThe status of your appointment request has changed to {}.\n\nYour veterinary clinic",
            recipient.first_name, status
        );
        self.send(&recipient.email, "Appointment request status update", text)
            .await
    }

    async fn notify_reschedule(
        &self,
        recipient: &UserRef,
        suggested_time: DateTime<Utc>,
    ) -> Result<()> {
        let text = format!(
            "Hello {},\n\nYour doctor suggested a new time for your appointment: {}.\nPlease confirm or cancel the request in the app.\n\nYour veterinary clinic",
            recipient.first_name,
            suggested_time.format("%Y-%m-%d %H:%M UTC")
        );
        self.send(&recipient.email, "Appointment request reschedule", text)
            .await
    }
}

/// Drop-in notifier for deployments without a mail relay configured.
/// Logs instead of sending.
pub struct NullNotifier;

#[async_trait]
impl NotificationPort for NullNotifier {
    async fn notify_status_change(
        &self,
        recipient: &UserRef,
        status: AppointmentRequestStatus,
    ) -> Result<()> {
        debug!(
            "Mail relay not configured, skipping status mail ({}) to {}",
            status, recipient.email
        );
        Ok(())
    }

    async fn notify_reschedule(
        &self,
        recipient: &UserRef,
        suggested_time: DateTime<Utc>,
    ) -> Result<()> {
        debug!(
            "Mail relay not configured, skipping reschedule mail ({}) to {}",
            suggested_time, recipient.email
        );
        Ok(())
    }
}
