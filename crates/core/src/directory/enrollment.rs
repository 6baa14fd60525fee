//! Validation for customer and admin records.
//!
//! Each validator collects every problem with the form instead of stopping
//! at the first, and produces a cleaned value ready for the store. Uniqueness
//! is not checked here; the store's constraints decide that.

use garde::Validate;

use super::error::ValidationErrors;
use super::phone::PhoneNumber;
use crate::auth::AdminRole;

const INVALID_PHONE: &str = "Invalid phone number. Please use digits only.";
const NAME_REQUIRED: &str = "Name is required.";
const INVALID_EMAIL: &str = "Please provide a valid email address.";
const USERNAME_REQUIRED: &str = "Username is required.";
const PASSWORD_REQUIRED: &str = "Password is required.";

#[derive(Validate)]
struct EmailAddress {
    #[garde(email)]
    value: String,
}

/// Trims an optional email; blank becomes `None`, otherwise the syntax must be valid.
fn clean_email(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = raw.map(str::trim).filter(|e| !e.is_empty())?;
    let candidate = EmailAddress {
        value: trimmed.to_string(),
    };
    if candidate.validate().is_err() {
        errors.push(INVALID_EMAIL);
        return None;
    }
    Some(candidate.value)
}

/// A validated customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    /// Normalized phone.
    pub phone: PhoneNumber,
    /// Trimmed display name.
    pub name: String,
    /// Email, `None` when left blank.
    pub email: Option<String>,
}

impl CustomerDraft {
    /// Validates kiosk or back-office input.
    ///
    /// ```
    /// use rewards_core::directory::CustomerDraft;
    ///
    /// let draft = CustomerDraft::validate("555-123-4567", " Jane ", Some("")).unwrap();
    /// assert_eq!(draft.phone.as_str(), "5551234567");
    /// assert_eq!(draft.name, "Jane");
    /// assert_eq!(draft.email, None);
    /// ```
    pub fn validate(phone: &str, name: &str, email: Option<&str>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let phone = PhoneNumber::parse(phone)
            .map_err(|_| errors.push(INVALID_PHONE))
            .ok();

        let name = name.trim();
        if name.is_empty() {
            errors.push(NAME_REQUIRED);
        }

        let email = clean_email(email, &mut errors);

        match phone {
            Some(phone) if errors.is_empty() => Ok(Self {
                phone,
                name: name.to_string(),
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated new admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDraft {
    /// Trimmed username.
    pub username: String,
    /// Plaintext password, hashed by the caller.
    pub password: String,
    /// Role, coerced to `Cashier` unless exactly `superadmin`.
    pub role: AdminRole,
}

impl AdminDraft {
    /// Validates a new admin account.
    pub fn validate(username: &str, password: &str, role: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username = username.trim();
        if username.is_empty() {
            errors.push(USERNAME_REQUIRED);
        }
        if password.is_empty() {
            errors.push(PASSWORD_REQUIRED);
        }

        errors.into_result(Self {
            username: username.to_string(),
            password: password.to_string(),
            role: AdminRole::parse_lenient(role),
        })
    }
}

/// Validated changes to an existing admin. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminChanges {
    /// New username.
    pub username: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
    /// New role.
    pub role: Option<AdminRole>,
}

impl AdminChanges {
    /// Validates a partial update.
    ///
    /// A blank username is an error; a blank password means "keep the current one".
    pub fn validate(
        username: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username = username.map(str::trim);
        if username == Some("") {
            errors.push(USERNAME_REQUIRED);
        }

        errors.into_result(Self {
            username: username.map(str::to_string),
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
            role: role.map(AdminRole::parse_lenient),
        })
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.role.is_none()
    }
}
