//! Per-state contact directory importer.
//!
//! The registry publishes course-sector contacts (school, vocational,
//! higher education) on one static page per state or territory. Unlike the
//! institution view there is no postback state to drive: each page is a
//! plain fetch, and each contact block is a labelled table.

use cricos_models::{Address, Contact};
use cricos_session::PostbackClient;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{ExtractError, table};

/// Base URL of the contact directory view.
pub const CONTACT_URL: &str = "http://cricos.education.gov.au/Contacts/CRICOSContacts.aspx";

/// State and territory codes the directory is published for.
pub const STATE_CODES: [&str; 8] = ["ACT", "NSW", "NT", "QLD", "SA", "TAS", "VIC", "WA"];

/// Id prefix shared by every contact block `<div>` on a directory page.
const PANEL_ID_PREFIX: &str = "contactList_pnl";

/// Imports the full contact directory, state by state.
pub struct ContactImporter<'a, C: PostbackClient> {
    client: &'a C,
}

impl<'a, C: PostbackClient> ContactImporter<'a, C> {
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetches every state page and concatenates the contacts in state
    /// order, then document order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when a page fetch fails permanently.
    pub async fn run(&self) -> Result<Vec<Contact>, ExtractError> {
        let mut contacts = Vec::new();
        for state in STATE_CODES {
            let page = self.client.fetch(&url_for(state)?).await?;
            let found = {
                let document = Html::parse_document(&page.body);
                contacts_of(&document)
            };
            log::info!("{state}: {} directory contacts", found.len());
            contacts.extend(found);
        }
        Ok(contacts)
    }
}

fn url_for(state: &str) -> Result<Url, ExtractError> {
    Ok(Url::parse(&format!("{CONTACT_URL}?State={state}"))?)
}

fn contacts_of(document: &Html) -> Vec<Contact> {
    let Ok(panel_selector) = Selector::parse(&format!("div[id^=\"{PANEL_ID_PREFIX}\"]")) else {
        return Vec::new();
    };
    let Ok(table_selector) = Selector::parse("table") else {
        return Vec::new();
    };

    document
        .select(&panel_selector)
        .filter_map(|panel| panel.select(&table_selector).next())
        .map(contact_of)
        .collect()
}

/// Builds one contact from a labelled table: label in the first cell,
/// value in the second. Unknown labels are ignored so layout drift does
/// not break the import.
fn contact_of(table_el: ElementRef<'_>) -> Contact {
    let mut contact = Contact {
        course_type: None,
        name: None,
        organisation: None,
        address: None,
        phone: None,
        fax: None,
        email: None,
    };

    for row in table::rows(table_el) {
        let Some(label) = table::cell_text(row, 0) else {
            continue;
        };
        let Some(value_cell) = table::cells(row).get(1).copied() else {
            continue;
        };

        match label.trim_end_matches(':').to_lowercase().as_str() {
            "course type" => contact.course_type = table::text_of(value_cell),
            "contact name" | "name" => contact.name = table::text_of(value_cell),
            "organisation" => contact.organisation = table::text_of(value_cell),
            "postal address" => contact.address = parse_address(table::text_lines(value_cell)),
            "phone" => contact.phone = table::text_of(value_cell),
            "fax" => contact.fax = table::text_of(value_cell),
            "email" => contact.email = table::text_of(value_cell),
            _ => {}
        }
    }
    contact
}

/// Splits the address block's lines into a structured [`Address`]. The
/// final line carries "CITY STATE POSTCODE"; anything before it is the
/// street or box lines.
fn parse_address(lines: Vec<String>) -> Option<Address> {
    if lines.is_empty() {
        return None;
    }

    let pattern = Regex::new(r"^(.+?)\s+([A-Z]{2,3})\s+([0-9]{4})$").ok()?;
    let (city, state, postcode) = match lines.last().and_then(|last| pattern.captures(last)) {
        Some(captures) => (
            Some(captures[1].to_owned()),
            Some(captures[2].to_owned()),
            Some(captures[3].to_owned()),
        ),
        None => (None, None, None),
    };

    // Lines ahead of the city line are the box or street lines.
    let leading = if city.is_some() {
        &lines[..lines.len() - 1]
    } else {
        &lines[..]
    };

    Some(Address {
        line1: leading.first().cloned(),
        line2: leading.get(1).cloned(),
        city,
        state,
        postcode,
    })
}
