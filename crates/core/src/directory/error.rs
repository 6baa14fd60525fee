//! Directory validation errors.

use rewards_shared::AppError;
use thiserror::Error;

/// Single-field directory failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Phone does not normalize to 7-15 digits.
    #[error("Please enter a valid phone number.")]
    InvalidPhone,

    /// Unknown keypad key.
    #[error("Unknown keypad key: {0}")]
    InvalidKey(String),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Every problem found in a submitted form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", .0.join(" "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    /// Records a problem.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Individual messages.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}
