#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk-import orchestration for the CRICOS registry.
//!
//! One [`cricos_session::HttpSession`] is created per provider id because
//! the registry keeps per-session view state: every postback within an
//! extraction must be strictly ordered, so concurrency only exists
//! *across* provider ids, bounded by the caller's `concurrency` setting.

use cricos_extract::ExtractError;
use cricos_extract::contact_directory::ContactImporter;
use cricos_extract::institution::InstitutionImporter;
use cricos_models::{Contact, Institution};
use cricos_session::{HttpSession, SessionError};
use cricos_store::StoreError;
use futures::StreamExt;

/// Errors surfaced by the import pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The HTTP session could not be created or a request failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Persisting or reading records failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Imports a single institution on a fresh session. `Ok(None)` means the
/// registry does not know the provider id.
///
/// # Errors
///
/// Returns [`IngestError`] when the session cannot be built or the
/// extraction fails.
pub async fn import_institution(provider_id: u32) -> Result<Option<Institution>, IngestError> {
    let session = HttpSession::new()?;
    Ok(InstitutionImporter::new(&session, provider_id).run().await?)
}

/// Imports every provider id in `from..=to`, at most `concurrency`
/// extractions in flight at once (each on its own session). Unknown ids
/// and failed extractions are logged and skipped; the result is sorted by
/// provider id.
pub async fn import_institutions(from: u32, to: u32, concurrency: usize) -> Vec<Institution> {
    let imported: Vec<Option<Institution>> = futures::stream::iter(from..=to)
        .map(|provider_id| async move {
            match import_institution(provider_id).await {
                Ok(institution) => institution,
                Err(e) => {
                    log::error!("provider {provider_id}: import failed: {e}");
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut institutions: Vec<Institution> = imported.into_iter().flatten().collect();
    institutions.sort_by_key(|institution| institution.provider_id);

    log::info!(
        "imported {} of {} provider ids",
        institutions.len(),
        to.saturating_sub(from) + 1
    );
    institutions
}

/// Imports the per-state contact directory on a fresh session.
///
/// # Errors
///
/// Returns [`IngestError`] when the session cannot be built or a page
/// fetch fails permanently.
pub async fn import_contacts() -> Result<Vec<Contact>, IngestError> {
    let session = HttpSession::new()?;
    Ok(ContactImporter::new(&session).run().await?)
}
