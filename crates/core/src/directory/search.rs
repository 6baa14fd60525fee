//! Free-text customer search terms.

/// A trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trims `raw`; blank input yields `None` (no search, no result).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// The trimmed term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
