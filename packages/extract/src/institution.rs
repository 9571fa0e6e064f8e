//! Institution record builder.
//!
//! Drives one full extraction against an owned page cursor: fetch, gate on
//! the sentinels, read the scalar fields, walk the location listing, parse
//! the contact panels, assemble. Everything runs strictly in order because
//! each postback's effect depends on the server state the previous one
//! produced.

use cricos_models::Institution;
use cricos_session::PostbackClient;
use scraper::Html;
use url::Url;

use crate::sentinel::PageStatus;
use crate::{ExtractError, contacts, fields, locations};

/// Base URL of the single-page institution details view.
pub const INSTITUTION_URL: &str =
    "http://cricos.education.gov.au/Institution/InstitutionDetailsOnePage.aspx";

/// Imports one institution by provider id.
pub struct InstitutionImporter<'a, C: PostbackClient> {
    client: &'a C,
    provider_id: u32,
}

impl<'a, C: PostbackClient> InstitutionImporter<'a, C> {
    #[must_use]
    pub const fn new(client: &'a C, provider_id: u32) -> Self {
        Self {
            client,
            provider_id,
        }
    }

    /// Runs the extraction. Returns `Ok(None)` when the registry reports
    /// the provider id as unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when a request fails permanently, the
    /// retry budget is exhausted, or the page lacks its postback form
    /// while more pages remain to be walked.
    pub async fn run(&self) -> Result<Option<Institution>, ExtractError> {
        let url = self.url()?;
        let mut page = self.client.fetch(&url).await?;

        let status = PageStatus::detect(&page.body);
        if status == PageStatus::NotFound {
            log::info!("provider {} not found", self.provider_id);
            return Ok(None);
        }

        // Scalars and contact panels come straight off the fetched page;
        // the parsed document must not outlive it across postbacks.
        let (provider_code, trading_name, name, institution_type, total_capacity, website, postal_address) = {
            let document = Html::parse_document(&page.body);
            (
                fields::provider_code(&document),
                fields::trading_name(&document),
                fields::name(&document),
                fields::institution_type(&document),
                fields::total_capacity(&document),
                fields::website(&document),
                fields::postal_address(&document),
            )
        };

        let locations = if status == PageStatus::NoLocations {
            None
        } else {
            Some(locations::collect_locations(self.client, &mut page).await?)
        };

        let contact_officers = {
            let document = Html::parse_document(&page.body);
            contacts::contact_officers(&document)
        };

        log::info!(
            "provider {}: {} locations, {} contact officers",
            self.provider_id,
            locations.as_ref().map_or(0, Vec::len),
            contact_officers.len()
        );

        Ok(Some(Institution {
            provider_id: self.provider_id,
            provider_code,
            trading_name,
            name,
            institution_type,
            total_capacity,
            website,
            postal_address,
            locations,
            contact_officers,
        }))
    }

    fn url(&self) -> Result<Url, ExtractError> {
        Ok(Url::parse(&format!(
            "{INSTITUTION_URL}?ProviderID={}",
            self.provider_id
        ))?)
    }
}
