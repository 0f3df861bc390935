use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub payment_currency: String,
    pub notify_webhook_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            payment_key_id: env::var("PAYMENT_KEY_ID").unwrap_or_else(|_| {
                warn!("PAYMENT_KEY_ID not set, using empty value");
                String::new()
            }),
            payment_key_secret: env::var("PAYMENT_KEY_SECRET").unwrap_or_else(|_| {
                warn!("PAYMENT_KEY_SECRET not set, using empty value");
                String::new()
            }),
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_payments_configured(&self) -> bool {
        !self.payment_key_id.is_empty() && !self.payment_key_secret.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            payment_key_id: String::new(),
            payment_key_secret: String::new(),
            payment_currency: "INR".to_string(),
            notify_webhook_url: None,
        }
    }
}
