//! On-screen numeric keypad used by the kiosk.

use serde::{Deserialize, Serialize};

use super::error::DirectoryError;
use super::phone::{MAX_PHONE_DIGITS, normalize_phone};

/// Shown while nothing has been typed.
pub const EMPTY_DISPLAY: &str = "•••••••••";

/// A keypad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypadKey {
    /// A digit 0-9.
    Digit(u8),
    /// Empty the buffer.
    Clear,
    /// Submit the buffer for lookup.
    Submit,
}

impl std::str::FromStr for KeypadKey {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "submit" => Ok(Self::Submit),
            key => match key.as_bytes() {
                [d @ b'0'..=b'9'] => Ok(Self::Digit(d - b'0')),
                _ => Err(DirectoryError::InvalidKey(s.to_string())),
            },
        }
    }
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadOutcome {
    /// The buffer changed, or a digit was ignored because it is full.
    Edited,
    /// The buffer was submitted; carries the digits.
    Submitted(String),
}

/// Digit buffer behind the kiosk keypad.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneKeypad {
    buffer: String,
}

impl PhoneKeypad {
    /// Creates an empty keypad.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a keypad from a client-held buffer.
    ///
    /// Non-digits are dropped and the result is capped at 15 digits.
    #[must_use]
    pub fn from_buffer(buffer: &str) -> Self {
        let mut digits = normalize_phone(buffer);
        digits.truncate(MAX_PHONE_DIGITS);
        Self { buffer: digits }
    }

    /// Applies one key press.
    pub fn press(&mut self, key: KeypadKey) -> KeypadOutcome {
        match key {
            KeypadKey::Digit(d) => {
                if self.buffer.len() < MAX_PHONE_DIGITS {
                    self.buffer.push(char::from(b'0' + d.min(9)));
                }
                KeypadOutcome::Edited
            }
            KeypadKey::Clear => {
                self.buffer.clear();
                KeypadOutcome::Edited
            }
            KeypadKey::Submit => KeypadOutcome::Submitted(self.buffer.clone()),
        }
    }

    /// Current digits.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// What the kiosk screen shows.
    #[must_use]
    pub fn display(&self) -> &str {
        if self.buffer.is_empty() {
            EMPTY_DISPLAY
        } else {
            &self.buffer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", KeypadKey::Digit(0))]
    #[case("7", KeypadKey::Digit(7))]
    #[case("clear", KeypadKey::Clear)]
    #[case("SUBMIT", KeypadKey::Submit)]
    fn test_key_parse(#[case] raw: &str, #[case] key: KeypadKey) {
        assert_eq!(raw.parse::<KeypadKey>().unwrap(), key);
    }

    #[rstest]
    #[case("10")]
    #[case("x")]
    #[case("")]
    fn test_key_parse_rejects(#[case] raw: &str) {
        assert!(raw.parse::<KeypadKey>().is_err());
    }

    #[test]
    fn test_digits_append_until_full() {
        let mut keypad = PhoneKeypad::new();
        for _ in 0..20 {
            keypad.press(KeypadKey::Digit(5));
        }
        assert_eq!(keypad.buffer().len(), 15);
    }

    #[test]
    fn test_clear_and_display() {
        let mut keypad = PhoneKeypad::from_buffer("555");
        assert_eq!(keypad.display(), "555");

        keypad.press(KeypadKey::Clear);
        assert_eq!(keypad.buffer(), "");
        assert_eq!(keypad.display(), EMPTY_DISPLAY);
    }

    #[test]
    fn test_submit_returns_buffer() {
        let mut keypad = PhoneKeypad::from_buffer("555-1234");
        assert_eq!(
            keypad.press(KeypadKey::Submit),
            KeypadOutcome::Submitted("5551234".to_string())
        );
        // Submitting leaves the buffer intact
        assert_eq!(keypad.buffer(), "5551234");
    }

    #[test]
    fn test_from_buffer_caps_length() {
        let keypad = PhoneKeypad::from_buffer("12345678901234567890");
        assert_eq!(keypad.buffer(), "123456789012345");
    }
}
