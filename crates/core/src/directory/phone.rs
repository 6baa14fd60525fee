//! Phone numbers as lookup keys.
//!
//! A phone number is stored and compared as its digits only.

use serde::{Deserialize, Serialize};

use super::error::DirectoryError;

/// Fewest digits accepted.
pub const MIN_PHONE_DIGITS: usize = 7;

/// Most digits accepted.
pub const MAX_PHONE_DIGITS: usize = 15;

/// Keeps the ASCII digits of `raw`, dropping everything else.
///
/// Idempotent: normalizing a digit string returns it unchanged.
///
/// ```
/// use rewards_core::directory::normalize_phone;
///
/// assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
/// assert_eq!(normalize_phone("5551234567"), "5551234567");
/// ```
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A normalized phone number with 7-15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes `raw` and checks its length.
    pub fn parse(raw: &str) -> Result<Self, DirectoryError> {
        let digits = normalize_phone(raw);
        if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            Ok(Self(digits))
        } else {
            Err(DirectoryError::InvalidPhone)
        }
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number, returning the digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
