//! Customer and admin directory rules.
//!
//! Pure input handling for everything that identifies a person: phone
//! normalization, the kiosk keypad buffer, enrollment and admin-account
//! validation, and search terms.

pub mod enrollment;
pub mod error;
pub mod keypad;
pub mod phone;
pub mod search;

pub use enrollment::{AdminChanges, AdminDraft, CustomerDraft};
pub use error::{DirectoryError, ValidationErrors};
pub use keypad::{KeypadKey, KeypadOutcome, PhoneKeypad};
pub use phone::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS, PhoneNumber, normalize_phone};
pub use search::SearchTerm;
