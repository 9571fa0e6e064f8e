#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extraction engine for the CRICOS registry's postback-driven pages.
//!
//! The registry renders an institution's full profile on one logical page
//! whose location listing is paginated server-side: moving between pages
//! and resolving a location's identifier both happen by re-submitting the
//! page's form with hidden `__EVENTTARGET` / `__EVENTARGUMENT` fields.
//! The [`institution::InstitutionImporter`] drives that state machine and
//! assembles a [`cricos_models::Institution`]; the remaining modules are
//! its parsing primitives:
//!
//! - [`sentinel`] — classifies a page body as not-found / no-locations /
//!   normal before anything else runs
//! - [`fields`] — tolerant scalar field reads from the details section
//! - [`table`] — row and cell helpers plus the header/footer row window
//! - [`postback`] — sets the two hidden fields and submits the page form
//! - [`locations`] — pagination engine and location identifier resolver
//! - [`contacts`] — the two-variant contact officer parser
//! - [`contact_directory`] — the simpler per-state contact directory
//!   importer

pub mod contact_directory;
pub mod contacts;
pub mod fields;
pub mod institution;
pub mod locations;
pub mod postback;
pub mod sentinel;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

use scraper::Selector;

/// Errors that can occur while extracting records.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The session layer failed (permanent HTTP error or retries
    /// exhausted).
    #[error(transparent)]
    Session(#[from] cricos_session::SessionError),

    /// A URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The page did not have the structure the extractor relies on.
    #[error("parse error: {message}")]
    Parse {
        /// Description of what was missing or malformed.
        message: String,
    },
}

/// Parses a CSS selector string, returning an [`ExtractError`] on failure.
pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Parse {
        message: format!("invalid CSS selector '{css}': {e}"),
    })
}
