use crate::domain::message::{Message, NewMessage};
use crate::error::Result;
use crate::storage::MessageRepository;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Process-local message store, used when no database is configured.
///
/// Cloning shares the underlying map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<DashMap<Uuid, Message>>,
}

impl InMemoryMessageRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a message as-is, keeping its id. Handy for seeding state.
    pub fn insert(&self, message: Message) {
        self.messages.insert(message.id, message);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Message> {
        self.messages.get(&id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|entry| entry.organization_id == organization_id)
            .map(|entry| entry.value().clone())
            .collect();
        // v7 ids sort by creation time
        messages.sort_by_key(|m| m.id);
        Ok(messages)
    }

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Message>> {
        Ok(self
            .messages
            .get(&id)
            .filter(|entry| entry.organization_id == organization_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_title(&self, organization_id: Uuid, title: &str) -> Result<Option<Message>> {
        Ok(self
            .messages
            .iter()
            .find(|entry| entry.organization_id == organization_id && entry.title == title)
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, message: NewMessage) -> Result<Message> {
        let message = message.with_id(Uuid::now_v7());
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn update(&self, message: &Message) -> Result<()> {
        if let Some(mut stored) = self.messages.get_mut(&message.id) {
            if stored.organization_id == message.organization_id {
                *stored = message.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<bool> {
        Ok(self.messages.remove_if(&id, |_, stored| stored.organization_id == organization_id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
