use serde::Deserialize;
use std::ops::RangeInclusive;
use time::OffsetDateTime;
use uuid::Uuid;

pub const TITLE_CHARS: RangeInclusive<usize> = 3..=200;
pub const CONTENT_CHARS: RangeInclusive<usize> = 10..=1000;

pub const TITLE_LENGTH_ERROR: &str = "Title must be between 3 and 200 characters";
pub const CONTENT_LENGTH_ERROR: &str = "Content must be between 10 and 1000 characters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub updated_at: Option<OffsetDateTime>,
}

impl Message {
    /// Applies an accepted update and stamps `updated_at`.
    ///
    /// `id` and `organization_id` are never touched.
    pub fn apply(&mut self, request: UpdateMessageRequest, now: OffsetDateTime) {
        self.title = request.title;
        self.content = request.content;
        self.is_active = request.is_active;
        self.updated_at = Some(now);
    }
}

/// A message that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_active: bool,
}

impl NewMessage {
    #[must_use]
    pub const fn active(organization_id: Uuid, title: String, content: String) -> Self {
        Self { organization_id, title, content, is_active: true }
    }

    #[must_use]
    pub fn with_id(self, id: Uuid) -> Message {
        Message {
            id,
            organization_id: self.organization_id,
            title: self.title,
            content: self.content,
            is_active: self.is_active,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Default for UpdateMessageRequest {
    fn default() -> Self {
        Self { title: String::new(), content: String::new(), is_active: true }
    }
}

const fn default_active() -> bool {
    true
}

fn within(value: &str, bounds: &RangeInclusive<usize>) -> bool {
    !value.trim().is_empty() && bounds.contains(&value.chars().count())
}

/// Title is non-blank and between 3 and 200 characters.
#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    within(title, &TITLE_CHARS)
}

/// Content is non-blank and between 10 and 1000 characters.
#[must_use]
pub fn is_valid_content(content: &str) -> bool {
    within(content, &CONTENT_CHARS)
}
