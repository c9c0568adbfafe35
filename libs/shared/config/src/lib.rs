use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub identity_api_url: String,
    pub identity_api_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub listen_port: u16,
    pub request_retention_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            identity_api_url: env::var("IDENTITY_API_URL")
                .unwrap_or_else(|_| {
                    warn!("IDENTITY_API_URL not set, using empty value");
                    String::new()
                }),
            identity_api_key: env::var("IDENTITY_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("IDENTITY_API_KEY not set, using empty value");
                    String::new()
                }),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, using empty value");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_KEY not set, using empty value");
                    String::new()
                }),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@pawslot.clinic".to_string()),
            listen_port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(3000),
            request_retention_days: env::var("REQUEST_RETENTION_DAYS")
                .ok()
                .and_then(|days| days.parse().ok())
                .unwrap_or(7),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.identity_api_url.is_empty() && !self.identity_api_key.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty()
    }
}
