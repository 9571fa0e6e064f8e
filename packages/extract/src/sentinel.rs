//! Sentinel text detection.
//!
//! The registry has no dedicated status signal for a bad provider id or an
//! institution without locations — it announces both with fixed English
//! phrases in the page body. Detection runs on the raw body before any
//! other extraction is attempted.

/// Phrase rendered when the provider id does not exist. The registry
/// returns its search page instead of a 404.
const NOT_FOUND_SENTINEL: &str = "The Provider ID entered is invalid - please try another.";

/// Phrase rendered in place of the location listing when the institution
/// has no registered locations.
const NO_LOCATIONS_SENTINEL: &str = "No locations were found for the selected institution.";

/// Classification of an institution details page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The provider id is unknown; nothing can be extracted.
    NotFound,
    /// The institution exists but has no location listing. Everything else
    /// extracts normally.
    NoLocations,
    /// A regular details page.
    Normal,
}

impl PageStatus {
    /// Classifies a raw page body. [`PageStatus::NotFound`] takes
    /// precedence over [`PageStatus::NoLocations`].
    #[must_use]
    pub fn detect(body: &str) -> Self {
        if body.contains(NOT_FOUND_SENTINEL) {
            Self::NotFound
        } else if body.contains(NO_LOCATIONS_SENTINEL) {
            Self::NoLocations
        } else {
            Self::Normal
        }
    }
}
