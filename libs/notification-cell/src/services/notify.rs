use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::records::Notification;
use shared_store::{AppState, ClinicStore};

use crate::models::WebhookPayload;

/// Fire-and-forget notification sink. Delivery problems are logged and
/// swallowed; a failed notification must never fail the operation that
/// triggered it.
#[derive(Clone)]
pub struct NotificationService {
    store: ClinicStore,
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl NotificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            webhook_url: state.config.notify_webhook_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn notify(&self, user_id: Uuid, title: &str, message: &str) -> Notification {
        let notification = self
            .store
            .insert_notification(Notification {
                id: Uuid::new_v4(),
                user_id,
                title: title.to_string(),
                message: message.to_string(),
                is_read: false,
                created_at: Utc::now(),
            })
            .await;

        if let Some(url) = &self.webhook_url {
            let payload = WebhookPayload { user_id, title, message };
            match self.client.post(url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("notification webhook delivered for user {}", user_id);
                }
                Ok(response) => {
                    warn!("notification webhook returned {}", response.status());
                }
                Err(e) => {
                    warn!("notification webhook failed: {}", e);
                }
            }
        }

        notification
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.store.notifications_for_user(user_id).await
    }

    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, AppError> {
        let owned = self
            .store
            .notifications_for_user(user_id)
            .await
            .iter()
            .any(|n| n.id == notification_id);
        if !owned {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        self.store
            .mark_notification_read(notification_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
