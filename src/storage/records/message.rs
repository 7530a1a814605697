use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct Message {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub updated_at: Option<OffsetDateTime>,
}

impl From<Message> for crate::domain::message::Message {
    fn from(record: Message) -> Self {
        Self {
            id: record.id,
            organization_id: record.organization_id,
            title: record.title,
            content: record.content,
            is_active: record.is_active,
            updated_at: record.updated_at,
        }
    }
}
