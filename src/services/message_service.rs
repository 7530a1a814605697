use crate::domain::message::{
    CONTENT_LENGTH_ERROR, CreateMessageRequest, Message, NewMessage, TITLE_LENGTH_ERROR, UpdateMessageRequest,
    is_valid_content, is_valid_title,
};
use crate::domain::outcome::{Outcome, ValidationErrors};
use crate::error::Result;
use crate::storage::MessageRepository;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

const MESSAGE_NOT_FOUND: &str = "Message not found";
const TITLE_NOT_UNIQUE: &str = "Title must be unique per organization";
const ORGANIZATION_REQUIRED: &str = "OrganizationId is required";

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) operations_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("missive-server");
        Self {
            operations_total: meter
                .u64_counter("missive_message_operations_total")
                .with_description("Message operations by outcome")
                .build(),
        }
    }

    fn record<T>(&self, operation: &'static str, outcome: &Outcome<T>) {
        self.operations_total
            .add(1, &[KeyValue::new("operation", operation), KeyValue::new("outcome", outcome.name())]);
    }
}

/// Business rules for messages: field validation, per-organization title
/// uniqueness and the inactive-message guard. Holds no state of its own.
#[derive(Clone, Debug)]
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
    metrics: Metrics,
}

impl MessageService {
    #[must_use]
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo, metrics: Metrics::new() }
    }

    /// Lists every message belonging to an organization.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the repository fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, organization_id),
        fields(organization_id = %organization_id)
    )]
    pub async fn get_all_messages(&self, organization_id: Uuid) -> Result<Outcome<Vec<Message>>> {
        let outcome = if organization_id.is_nil() {
            Outcome::validation("organizationId", ORGANIZATION_REQUIRED)
        } else {
            let messages = self.repo.list_by_organization(organization_id).await?;
            tracing::debug!(count = messages.len(), "Fetched messages");
            Outcome::Created(messages)
        };

        self.metrics.record("get_all", &outcome);
        Ok(outcome)
    }

    /// Fetches a single message.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the repository fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, organization_id, id),
        fields(organization_id = %organization_id, message_id = %id)
    )]
    pub async fn get_message(&self, organization_id: Uuid, id: Uuid) -> Result<Outcome<Message>> {
        let outcome = if organization_id.is_nil() || id.is_nil() {
            Outcome::validation("id", "OrganizationId and MessageId are required")
        } else {
            self.repo
                .find_by_id(organization_id, id)
                .await?
                .map_or_else(|| Outcome::NotFound(MESSAGE_NOT_FOUND.to_string()), Outcome::Created)
        };

        self.metrics.record("get", &outcome);
        Ok(outcome)
    }

    /// Validates and stores a new, active message.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the repository fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, organization_id, request),
        fields(organization_id = %organization_id)
    )]
    pub async fn create_message(
        &self,
        organization_id: Uuid,
        request: CreateMessageRequest,
    ) -> Result<Outcome<Message>> {
        let outcome = self.try_create(organization_id, request).await?;
        self.metrics.record("create", &outcome);
        Ok(outcome)
    }

    async fn try_create(&self, organization_id: Uuid, request: CreateMessageRequest) -> Result<Outcome<Message>> {
        let mut errors = ValidationErrors::new();
        if organization_id.is_nil() {
            errors.add("organizationId", ORGANIZATION_REQUIRED);
        }
        if !is_valid_title(&request.title) {
            errors.add("title", TITLE_LENGTH_ERROR);
        }
        if !is_valid_content(&request.content) {
            errors.add("content", CONTENT_LENGTH_ERROR);
        }
        if !errors.is_empty() {
            return Ok(Outcome::ValidationError(errors));
        }

        if self.repo.find_by_title(organization_id, &request.title).await?.is_some() {
            return Ok(Outcome::Conflict(TITLE_NOT_UNIQUE.to_string()));
        }

        let created = self.repo.create(NewMessage::active(organization_id, request.title, request.content)).await?;
        tracing::info!(message_id = %created.id, "Message created");
        Ok(Outcome::Created(created))
    }

    /// Replaces title, content and active flag of an active message.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the repository fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, organization_id, id, request),
        fields(organization_id = %organization_id, message_id = %id)
    )]
    pub async fn update_message(
        &self,
        organization_id: Uuid,
        id: Uuid,
        request: UpdateMessageRequest,
    ) -> Result<Outcome> {
        let outcome = self.try_update(organization_id, id, request).await?;
        self.metrics.record("update", &outcome);
        Ok(outcome)
    }

    async fn try_update(&self, organization_id: Uuid, id: Uuid, request: UpdateMessageRequest) -> Result<Outcome> {
        let mut errors = ValidationErrors::new();
        if organization_id.is_nil() {
            errors.add("organizationId", ORGANIZATION_REQUIRED);
        }
        if id.is_nil() {
            errors.add("id", "MessageId is required");
        }
        if !is_valid_title(&request.title) {
            errors.add("title", TITLE_LENGTH_ERROR);
        }
        if !is_valid_content(&request.content) {
            errors.add("content", CONTENT_LENGTH_ERROR);
        }
        if !errors.is_empty() {
            return Ok(Outcome::ValidationError(errors));
        }

        let Some(mut message) = self.repo.find_by_id(organization_id, id).await? else {
            return Ok(Outcome::NotFound(MESSAGE_NOT_FOUND.to_string()));
        };

        if !message.is_active {
            return Ok(Outcome::validation("isActive", "Inactive messages cannot be updated"));
        }

        if let Some(existing) = self.repo.find_by_title(organization_id, &request.title).await?
            && existing.id != id
        {
            return Ok(Outcome::Conflict(TITLE_NOT_UNIQUE.to_string()));
        }

        message.apply(request, OffsetDateTime::now_utc());
        self.repo.update(&message).await?;
        tracing::info!(is_active = message.is_active, "Message updated");
        Ok(Outcome::Updated)
    }

    /// Removes an active message.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the repository fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, organization_id, id),
        fields(organization_id = %organization_id, message_id = %id)
    )]
    pub async fn delete_message(&self, organization_id: Uuid, id: Uuid) -> Result<Outcome> {
        let outcome = match self.repo.find_by_id(organization_id, id).await? {
            None => Outcome::NotFound(MESSAGE_NOT_FOUND.to_string()),
            Some(message) if !message.is_active => {
                Outcome::validation("isActive", "Inactive messages cannot be deleted")
            }
            Some(_) => {
                // Existence was checked above; a concurrent delete is not an error here.
                if !self.repo.delete(organization_id, id).await? {
                    tracing::debug!("Message vanished before delete");
                }
                tracing::info!("Message deleted");
                Outcome::Deleted
            }
        };

        self.metrics.record("delete", &outcome);
        Ok(outcome)
    }
}
