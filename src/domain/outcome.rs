use serde::Serialize;
use std::collections::BTreeMap;

/// Field-level validation failures, keyed by the camelCase field name.
///
/// Checks are appended independently so a caller sees every problem at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map holding a single message for a single field.
    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_default().push(message.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// The closed set of results a message operation can produce.
///
/// Storage failures are not part of this set; they travel on the `Err` side of
/// `crate::error::Result` and end up as a 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Created(T),
    Updated,
    Deleted,
    NotFound(String),
    Conflict(String),
    ValidationError(ValidationErrors),
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::ValidationError(_) => "validation_error",
        }
    }

    pub(crate) fn validation(field: &str, message: &str) -> Self {
        Self::ValidationError(ValidationErrors::single(field, message))
    }
}
