use serde::Serialize;
use uuid::Uuid;

/// Body POSTed to the optional notification webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub message: &'a str,
}
