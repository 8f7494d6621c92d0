//! Form validation
//!
//! Validators return either the cleaned value or a [`ValidationErrors`]
//! listing every offending field, independent of how the errors are later
//! rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Maximum username length
pub const USERNAME_MAX_LEN: usize = 150;

/// Message reported when analysis text is empty
pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to analyze.";

/// One problem with one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field error found while validating a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages for a single field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(value)` when no errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::InvalidInput(errors.to_string())
    }
}

/// Validate analysis text, returning it trimmed
pub fn validate_analysis_text(text: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let trimmed = text.trim();

    if trimmed.is_empty() {
        errors.add("text", EMPTY_TEXT_MESSAGE);
    }

    errors.into_result(trimmed.to_string())
}

/// Validate a username, returning it trimmed
///
/// Required, at most [`USERNAME_MAX_LEN`] characters, and limited to
/// letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let trimmed = username.trim();

    if trimmed.is_empty() {
        errors.add("username", "This field is required.");
        return Err(errors);
    }

    if trimmed.chars().count() > USERNAME_MAX_LEN {
        errors.add(
            "username",
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                USERNAME_MAX_LEN,
                trimmed.chars().count()
            ),
        );
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    errors.into_result(trimmed.to_string())
}
