use crate::domain::message::Message;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

pub use crate::domain::message::{CreateMessageRequest, UpdateMessageRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            organization_id: message.organization_id,
            title: message.title,
            content: message.content,
            is_active: message.is_active,
            updated_at: message.updated_at,
        }
    }
}
